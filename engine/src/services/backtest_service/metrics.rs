// Running equity and summary statistics over realized trade profits.

/// Cumulative realized profit with its running peak and worst drawdown. The peak starts at
/// zero, so a losing first trade already counts as drawdown.
#[derive(Debug, Clone, Default)]
pub struct EquityTracker {
    total: f64,
    peak: f64,
    max_drawdown: f64,
    curve: Vec<f64>,
}

impl EquityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, profit: f64) {
        self.total += profit;
        self.peak = self.peak.max(self.total);
        self.max_drawdown = self.max_drawdown.max(self.peak - self.total);
        self.curve.push(self.total);
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn into_curve(self) -> Vec<f64> {
        self.curve
    }
}

/// Percentage of closed trades that were wins; 0 when nothing closed.
pub fn win_rate(wins: usize, losses: usize) -> f64 {
    let closed = wins + losses;
    if closed == 0 {
        return 0.0;
    }
    wins as f64 / closed as f64 * 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean profit over its population standard deviation, not annualized.
pub fn sharpe_ratio(profits: &[f64]) -> f64 {
    let std = std_dev(profits);
    if std == 0.0 {
        return 0.0;
    }
    mean(profits) / std
}
