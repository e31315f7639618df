// Human-readable rationale attached to signals. Nothing downstream parses these strings.
use super::scoring::{Confirmation, EntryScore, MarketReading, MAX_ENTRY_SCORE, VOLUME_BONUS_RATIO};
use crate::indicators::{Levels, StopLevels};
use shared::models::{Action, Trend};
use shared::utils::{format_optional_price, percent_diff};

fn confirmation_line(confirmation: &Confirmation, bullish: bool) -> String {
    match confirmation {
        Confirmation::PriceAtSma50 if bullish => "Price near support (SMA50)".to_string(),
        Confirmation::PriceAtSma50 => "Price near resistance (SMA50)".to_string(),
        Confirmation::RsiHealthy(rsi) => format!("RSI at {:.1} (healthy)", rsi),
        Confirmation::MacdMomentum if bullish => "MACD showing bullish momentum".to_string(),
        Confirmation::MacdMomentum => "MACD showing bearish momentum".to_string(),
        Confirmation::VolumeAboveAverage(ratio) => format!("Volume at {:.0}% of average", ratio * 100.0),
    }
}

pub(crate) fn entry_pattern(
    action: Action,
    price: f64,
    sma50: f64,
    sma200: f64,
    levels: Option<Levels>,
    score: &EntryScore,
) -> String {
    let bullish = action == Action::Buy;
    let (headline, trend_line) = if bullish {
        ("STRONG BUY SIGNAL", format!("Confirmed UPTREND (SMA50 > SMA200 by {:.2}%)", percent_diff(sma50, sma200)))
    } else {
        ("STRONG SELL SIGNAL", format!("Confirmed DOWNTREND (SMA50 < SMA200 by {:.2}%)", -percent_diff(sma50, sma200)))
    };
    let confirmations = score
        .confirmations
        .iter()
        .map(|c| format!("- {}", confirmation_line(c, bullish)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nTrend: {}\nEntry: {:.2}\nSupport Level: {}\nResistance Level: {}\n\nConfirmation Signals:\n{}",
        headline,
        trend_line,
        price,
        format_optional_price(levels.map(|l| l.support)),
        format_optional_price(levels.map(|l| l.resistance)),
        confirmations
    )
}

pub(crate) fn pending_entry_pattern(trend: Trend, price_deviation: f64, score: &EntryScore) -> String {
    let (label, need) = match trend {
        Trend::Downtrend => ("Downtrend", "Price bounce to SMA50 or stronger confirmation"),
        _ => ("Uptrend", "Price pullback to SMA50 or stronger confirmation"),
    };
    format!(
        "{} detected but waiting for better entry:\n- Price deviation: {:.2}%\n- Current score: {}/{}\n- Need: {}",
        label,
        price_deviation,
        score.total(),
        MAX_ENTRY_SCORE,
        need
    )
}

pub(crate) fn sideways_pattern(sma50: f64, sma200: f64) -> String {
    format!(
        "Sideways market detected:\n- SMA50: {:.2}\n- SMA200: {:.2}\n- Difference: {:.2}%\n- Wait for clear trend confirmation",
        sma50,
        sma200,
        percent_diff(sma50, sma200)
    )
}

/// One line per confirmation behind an actionable signal.
pub(crate) fn entry_reason(action: Action, reading: &MarketReading) -> String {
    let mut reasons = Vec::new();
    let bullish = match action {
        Action::Buy => true,
        Action::Sell => false,
        Action::Wait => return "Waiting for better entry conditions".to_string(),
    };

    if bullish {
        reasons.push("Uptrend confirmed (SMA50 > SMA200)".to_string());
    } else {
        reasons.push("Downtrend confirmed (SMA50 < SMA200)".to_string());
    }
    if let Some(rsi) = reading.rsi {
        if bullish && rsi < 50.0 {
            reasons.push(format!("RSI at {:.1} (not overbought)", rsi));
        } else if !bullish && rsi > 50.0 {
            reasons.push(format!("RSI at {:.1} (not oversold)", rsi));
        }
    }
    if let Some(histogram) = reading.macd_histogram {
        if bullish && histogram > 0.0 {
            reasons.push("MACD bullish momentum".to_string());
        } else if !bullish && histogram < 0.0 {
            reasons.push("MACD bearish momentum".to_string());
        }
    }
    if let Some(ratio) = reading.volume_ratio {
        if ratio > VOLUME_BONUS_RATIO {
            reasons.push(format!("High volume ({:.0}% of average)", ratio * 100.0));
        }
    }
    if bullish && reading.price_deviation < 0.0 {
        reasons.push("Price below SMA50 (support level)".to_string());
    } else if !bullish && reading.price_deviation > 0.0 {
        reasons.push("Price above SMA50 (resistance level)".to_string());
    }

    reasons.iter().map(|r| format!("- {}", r)).collect::<Vec<_>>().join("\n")
}

pub(crate) fn exit_strategy(action: Action, stops: StopLevels, price: f64) -> String {
    let risk = (price - stops.sl).abs();
    let reward = (stops.tp - price).abs();
    let (close_verb, trail) = if action == Action::Buy { ("sell", "+1%") } else { ("cover", "-1%") };

    format!(
        "Risk: {:.2} ({:.2}%)\nReward: {:.2} ({:.2}%)\nRisk/Reward: 1:{:.2}\n\nExit Strategy:\n\
         - Take Profit: {:.2} ({} 50% at TP1, 50% at TP2)\n\
         - Stop Loss: {:.2} (strict, no exceptions)\n\
         - Trailing Stop: Consider trailing stop after {} gain",
        risk,
        risk / price * 100.0,
        reward,
        reward / price * 100.0,
        reward / risk,
        stops.tp,
        close_verb,
        stops.sl,
        trail
    )
}
