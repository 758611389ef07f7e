//! Text formatting for dashboard values
//!
//! Missing data renders as [`PLACEHOLDER`], never as zero.

use crate::core::consensus::{Market, MarketSummary, ValueRange};
use crate::core::kelly::BetSizing;

pub const PLACEHOLDER: &str = "—";

/// Format a market value by its convention: lines to 0.1, prices to whole
/// numbers with an explicit `+` on positive American odds
pub fn format_market_value(market: Market, value: f64) -> String {
    match market {
        Market::SpreadLine => format_signed(value, 1),
        Market::TotalLine => format!("{:.1}", value),
        Market::SpreadHome
        | Market::SpreadAway
        | Market::TotalOver
        | Market::TotalUnder
        | Market::MoneylineHome
        | Market::MoneylineAway => format_american(value),
    }
}

pub fn format_average(summary: &MarketSummary) -> String {
    summary
        .average
        .map(|v| format_market_value(summary.market, v))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_range(summary: &MarketSummary) -> String {
    match summary.range {
        Some(ValueRange { min, max }) => format!(
            "{} to {}",
            format_market_value(summary.market, min),
            format_market_value(summary.market, max)
        ),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format an optional market value
pub fn format_optional(market: Market, value: Option<f64>) -> String {
    value
        .map(|v| format_market_value(market, v))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// American price, rounded, with sign
pub fn format_american(price: f64) -> String {
    let rounded = price.round();
    if rounded > 0.0 {
        format!("+{:.0}", rounded)
    } else {
        format!("{:.0}", rounded)
    }
}

fn format_signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{:.*}", decimals, value)
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Short human summary of a sizing, as shown next to the calculator
pub fn format_stake(sizing: &BetSizing) -> String {
    if sizing.is_bet() {
        format!(
            "{:.2}% of bankroll ({:.2})",
            sizing.percentage, sizing.stake_amount
        )
    } else {
        "Negative expectation, do not bet".to_string()
    }
}

/// Format an optional percentage-style stat stored as a fraction (0.456)
pub fn format_fraction_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v * 100.0))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_stat(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Truncate name to fit display width
pub fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len || max_len == 0 {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
