//! Utility helpers shared across the WASM frontend.

use chrono::{DateTime, NaiveDate, Utc};
use unicode_segmentation::UnicodeSegmentation;

/// Current UTC time.  `chrono`'s `wasmbind` feature backs this with JS
/// `Date` in the browser.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Cut `text` to at most `max` grapheme clusters, the ellipsis included.
/// Never splits a cluster (emoji, combining marks).
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.graphemes(true).nth(max).is_none() {
        return text.to_string();
    }
    let head: String = text.graphemes(true).take(max.saturating_sub(1)).collect();
    format!("{}…", head.trim_end())
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Format a money amount such as `"-$1,234.50"`.  Unknown currency codes are
/// rendered as a suffix: `"12.00 CHF"`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}.{:02}", sign, symbol, grouped, frac),
        None => format!("{}{}.{:02} {}", sign, grouped, frac, currency.to_ascii_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5, "USD"), "$1,234.50");
        assert_eq!(format_amount(-0.5, "eur"), "-€0.50");
        assert_eq!(format_amount(1_000_000.0, "GBP"), "£1,000,000.00");
        assert_eq!(format_amount(12.0, "CHF"), "12.00 CHF");
        assert_eq!(format_amount(999.999, "USD"), "$1,000.00");
    }

    #[test]
    fn test_truncate_graphemes() {
        assert_eq!(truncate_graphemes("  short  ", 10), "short");
        assert_eq!(truncate_graphemes("exactly", 7), "exactly");
        assert_eq!(truncate_graphemes("How much did I spend", 9), "How much…");
        // family emoji is a single cluster
        assert_eq!(truncate_graphemes("👨‍👩‍👧 budget", 2), "👨‍👩‍👧…");

        let long = "x".repeat(100);
        assert_eq!(truncate_graphemes(&long, 40).graphemes(true).count(), 40);
    }
}
