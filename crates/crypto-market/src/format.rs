//! Human-readable rendering of prices and snapshots
//!
//! Figures are rounded to two places the way a binary float is: the
//! decimal is widened to its nearest `f64`, and that exact value is
//! rounded half to even. A negative input keeps its sign even when it
//! rounds to zero (`-0.001` → `-0.00`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::MarketSnapshot;
use crate::symbol::Symbol;

/// Sign and two-place magnitude of `value`
fn two_places(value: Decimal) -> (bool, Decimal) {
    let exact = value
        .to_f64()
        .and_then(Decimal::from_f64_retain)
        .unwrap_or(value);

    let mut magnitude = exact
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    magnitude.rescale(2);

    (exact.is_sign_negative(), magnitude)
}

fn sign(negative: bool) -> &'static str {
    if negative { "-" } else { "" }
}

/// `1234567.891` → `1,234,567.89`
pub fn format_grouped(value: Decimal) -> String {
    let (negative, magnitude) = two_places(value);
    let digits = magnitude.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    grouped.push_str(sign(negative));
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}

/// `43250.5` → `$43,250.50`
pub fn format_usd(value: Decimal) -> String {
    format!("${}", format_grouped(value))
}

/// `-1.2` → `-1.20%`
pub fn format_percent(value: Decimal) -> String {
    let (negative, magnitude) = two_places(value);
    format!("{}{magnitude}%", sign(negative))
}

/// One-line spot price answer
pub fn format_price_line(symbol: &Symbol, price: Decimal) -> String {
    format!("Current {} price: {}", symbol, format_usd(price))
}

/// Multi-line 24h report, or the failure text unchanged
pub fn format_snapshot(snapshot: &MarketSnapshot) -> String {
    match snapshot {
        MarketSnapshot::Failed { error } => error.clone(),
        MarketSnapshot::Ready(data) => format!(
            "📊 {} Market Data:\n\
             • Price: {}\n\
             • 24h Change: {}\n\
             • 24h High: {}\n\
             • 24h Low: {}\n\
             • 24h Volume: {}",
            data.symbol,
            format_usd(data.price),
            format_percent(data.change_percent),
            format_usd(data.high),
            format_usd(data.low),
            format_grouped(data.volume),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketData;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grouping() {
        assert_eq!(format_grouped(dec!(0)), "0.00");
        assert_eq!(format_grouped(dec!(999.999)), "1,000.00");
        assert_eq!(format_grouped(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_grouped(dec!(100000)), "100,000.00");
        assert_eq!(format_grouped(dec!(-98765.4321)), "-98,765.43");
    }

    #[test]
    fn test_rounding_follows_binary_float() {
        // exact tie in binary, goes to even
        assert_eq!(format_usd(dec!(0.125)), "$0.12");
        assert_eq!(format_usd(dec!(0.375)), "$0.38");
        // stored just below the midpoint
        assert_eq!(format_usd(dec!(2.675)), "$2.67");
        assert_eq!(format_usd(dec!(1.005)), "$1.00");
        // stored just above the midpoint
        assert_eq!(format_grouped(dec!(0.005)), "0.01");
    }

    #[test]
    fn test_negative_zero_keeps_sign() {
        assert_eq!(format_grouped(dec!(-0.001)), "-0.00");
        assert_eq!(format_percent(dec!(-0.001)), "-0.00%");
        assert_eq!(format_percent(dec!(0.001)), "0.00%");
        assert_eq!(format_grouped(dec!(0)), "0.00");
    }

    #[test]
    fn test_price_line() {
        assert_eq!(
            format_price_line(&Symbol::new("BTCUSDT"), dec!(43250.5)),
            "Current BTCUSDT price: $43,250.50"
        );
        assert_eq!(
            format_price_line(&Symbol::new("DOGEUSDT"), dec!(0.38123)),
            "Current DOGEUSDT price: $0.38"
        );
    }

    #[test]
    fn test_percent_has_no_grouping() {
        assert_eq!(format_percent(dec!(-1.2)), "-1.20%");
        assert_eq!(format_percent(dec!(2.5)), "2.50%");
        assert_eq!(format_percent(dec!(1234.5)), "1234.50%");
    }

    #[test]
    fn test_snapshot_report() {
        let snapshot = MarketSnapshot::Ready(MarketData {
            symbol: Symbol::new("ETHUSDT"),
            price: dec!(2500.333),
            change_percent: dec!(-1.2),
            high: dec!(2600),
            low: dec!(2400),
            volume: dec!(15000),
        });

        let expected = "📊 ETHUSDT Market Data:\n\
                        • Price: $2,500.33\n\
                        • 24h Change: -1.20%\n\
                        • 24h High: $2,600.00\n\
                        • 24h Low: $2,400.00\n\
                        • 24h Volume: 15,000.00";
        assert_eq!(format_snapshot(&snapshot), expected);
        assert_eq!(format_snapshot(&snapshot).lines().count(), 6);
    }

    #[test]
    fn test_failed_snapshot_passes_through() {
        let snapshot = MarketSnapshot::failed("Network error: connection refused");
        assert_eq!(format_snapshot(&snapshot), "Network error: connection refused");
    }
}
