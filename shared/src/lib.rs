// Value objects shared by the engine library, its binary and any downstream consumer
// (notification formatters, reporting layers).
pub mod models;
pub mod utils;
