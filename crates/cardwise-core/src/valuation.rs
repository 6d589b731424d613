//! Reward valuation
//!
//! Turns a free-form reward rate ("5% cashback", "3x points") and a
//! user-entered purchase amount into a dollar estimate.
//!
//! Only rates containing `<number>%` can be valued. Everything else yields
//! `None`, which means "not enough information" rather than zero. The first
//! percentage in the text wins and no upper bound is applied, so "450%" is
//! taken at face value.
//!
//! Estimates are formatted with Rust's `{:.2}`, which rounds the exact binary
//! value to the nearest cent (ties to even).

use std::sync::OnceLock;

use regex::Regex;

fn percentage_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)%").expect("valid regex"))
}

/// First percentage in a rate string, as a number (e.g., 2.5 for "2.5%")
pub fn extract_percentage(rate: &str) -> Option<f64> {
    percentage_regex()
        .captures(rate)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parse a user-entered amount; `None` unless finite and positive
///
/// Accepts surrounding whitespace, one leading `$` and `,` separators.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    let cleaned: String = text
        .strip_prefix('$')
        .unwrap_or(text)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Dollar value of a reward rate applied to an amount, to two decimals
pub fn estimate_dollar_value(rate: Option<&str>, amount: Option<&str>) -> Option<String> {
    let amount = parse_amount(amount?)?;
    let percentage = extract_percentage(rate?)?;
    let value = amount * percentage / 100.0;
    value.is_finite().then(|| format!("{:.2}", value))
}
