// Trend classification from the SMA50/SMA200 pair
use shared::models::Trend;
use shared::utils::percent_diff;

/// Relative gap (in percent) between the averages inside which the market counts as sideways.
pub const TREND_DEADBAND_PCT: f64 = 0.1;

pub fn determine_trend(sma50: Option<f64>, sma200: Option<f64>) -> Trend {
    let (Some(sma50), Some(sma200)) = (sma50, sma200) else {
        return Trend::Sideway;
    };

    let diff = percent_diff(sma50, sma200);
    if diff > TREND_DEADBAND_PCT {
        Trend::Uptrend
    } else if diff < -TREND_DEADBAND_PCT {
        Trend::Downtrend
    } else {
        Trend::Sideway
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_average_is_sideway() {
        assert_eq!(determine_trend(None, Some(100.0)), Trend::Sideway);
        assert_eq!(determine_trend(Some(100.0), None), Trend::Sideway);
        assert_eq!(determine_trend(None, None), Trend::Sideway);
    }

    #[test]
    fn test_deadband() {
        assert_eq!(determine_trend(Some(100.2), Some(100.0)), Trend::Uptrend);
        assert_eq!(determine_trend(Some(99.8), Some(100.0)), Trend::Downtrend);
        assert_eq!(determine_trend(Some(100.05), Some(100.0)), Trend::Sideway);
        assert_eq!(determine_trend(Some(99.95), Some(100.0)), Trend::Sideway);
        assert_eq!(determine_trend(Some(100.0), Some(100.0)), Trend::Sideway);
    }

    #[test]
    fn test_scale_invariance() {
        let pairs = [(101.0, 100.0), (99.0, 100.0), (100.05, 100.0), (250.0, 240.0)];
        for (sma50, sma200) in pairs {
            let base = determine_trend(Some(sma50), Some(sma200));
            for scale in [0.001, 0.5, 3.0, 1_000.0, 65_000.0] {
                assert_eq!(
                    determine_trend(Some(sma50 * scale), Some(sma200 * scale)),
                    base,
                    "scale {} changed the trend for ({}, {})",
                    scale,
                    sma50,
                    sma200
                );
            }
        }
    }
}
