// Entry scoring, confidence and risk classification for the signal engine.
use shared::models::{RiskLevel, Trend};

/// Price within this distance (percent) of SMA50, on the pullback side, counts as a confirmation.
pub const NEAR_SMA50_PCT: f64 = 1.0;
/// An entry is refused when price has run further than this from SMA50.
pub const MAX_ENTRY_DEVIATION_PCT: f64 = 1.5;
pub const MIN_ENTRY_SCORE: u8 = 3;
pub const MAX_ENTRY_SCORE: u8 = 7;
pub const VOLUME_CONFIRMATION_RATIO: f64 = 1.1;
pub const VOLUME_BONUS_RATIO: f64 = 1.2;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

const BASE_CONFIDENCE: i32 = 50;

/// Everything the decision rule reads, computed once per evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarketReading {
    pub trend: Trend,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub price_deviation: f64,
}

impl MarketReading {
    fn rsi_in_neutral_band(&self) -> bool {
        self.rsi.map_or(false, |rsi| rsi > RSI_OVERSOLD && rsi < RSI_OVERBOUGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Confirmation {
    PriceAtSma50,
    RsiHealthy(f64),
    MacdMomentum,
    VolumeAboveAverage(f64),
}

impl Confirmation {
    pub fn weight(&self) -> u8 {
        match self {
            Confirmation::PriceAtSma50 | Confirmation::RsiHealthy(_) | Confirmation::MacdMomentum => 2,
            Confirmation::VolumeAboveAverage(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EntryScore {
    pub confirmations: Vec<Confirmation>,
}

impl EntryScore {
    pub fn total(&self) -> u8 {
        self.confirmations.iter().map(Confirmation::weight).sum()
    }
}

/// Scores an entry in the direction of the trend. Sideways markets are never scored.
pub(crate) fn score_entry(reading: &MarketReading) -> Option<EntryScore> {
    let bullish = match reading.trend {
        Trend::Uptrend => true,
        Trend::Downtrend => false,
        Trend::Sideway => return None,
    };

    let mut confirmations = Vec::new();

    let near_sma50 = if bullish {
        reading.price_deviation <= NEAR_SMA50_PCT
    } else {
        reading.price_deviation >= -NEAR_SMA50_PCT
    };
    if near_sma50 {
        confirmations.push(Confirmation::PriceAtSma50);
    }

    if let Some(rsi) = reading.rsi {
        if reading.rsi_in_neutral_band() {
            confirmations.push(Confirmation::RsiHealthy(rsi));
        }
    }

    if let Some(histogram) = reading.macd_histogram {
        if (bullish && histogram > 0.0) || (!bullish && histogram < 0.0) {
            confirmations.push(Confirmation::MacdMomentum);
        }
    }

    if let Some(ratio) = reading.volume_ratio {
        if ratio > VOLUME_CONFIRMATION_RATIO {
            confirmations.push(Confirmation::VolumeAboveAverage(ratio));
        }
    }

    Some(EntryScore { confirmations })
}

/// True when the score clears the threshold and price has not run away from SMA50.
pub(crate) fn entry_allowed(reading: &MarketReading, score: &EntryScore) -> bool {
    let within_deviation = match reading.trend {
        Trend::Uptrend => reading.price_deviation <= MAX_ENTRY_DEVIATION_PCT,
        Trend::Downtrend => reading.price_deviation >= -MAX_ENTRY_DEVIATION_PCT,
        Trend::Sideway => false,
    };
    within_deviation && score.total() >= MIN_ENTRY_SCORE
}

/// Confidence in [0, 100] for an actionable signal.
pub(crate) fn confidence(reading: &MarketReading) -> u8 {
    let mut confidence = BASE_CONFIDENCE;

    if reading.trend.is_directional() {
        confidence += 20;
    }

    if let Some(rsi) = reading.rsi {
        if reading.trend.is_directional() && reading.rsi_in_neutral_band() {
            confidence += 15;
        } else if rsi < RSI_OVERSOLD || rsi > RSI_OVERBOUGHT {
            confidence -= 10; // overbought or oversold, whatever the direction
        }
    }

    if let (Some(_), Some(histogram)) = (reading.macd_line, reading.macd_histogram) {
        let aligned = match reading.trend {
            Trend::Uptrend => histogram > 0.0,
            Trend::Downtrend => histogram < 0.0,
            Trend::Sideway => false,
        };
        if aligned {
            confidence += 15;
        }
    }

    if reading.volume_ratio.map_or(false, |ratio| ratio > VOLUME_BONUS_RATIO) {
        confidence += 10;
    }

    if reading.price_deviation.abs() < NEAR_SMA50_PCT {
        confidence += 10;
    }

    confidence.clamp(0, 100) as u8
}

pub(crate) fn risk_level(confidence: u8) -> RiskLevel {
    if confidence >= 75 {
        RiskLevel::Low
    } else if confidence >= 50 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
