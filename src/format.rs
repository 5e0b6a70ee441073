//! Display formatting helpers for back-office rendering and exports.
//!
//! All helpers tolerate missing values and render a zero placeholder rather
//! than erroring, matching how the dashboard panels display them.

use chrono::{DateTime, Utc};

/// Format an amount as Nigerian Naira with two decimals and comma grouping.
pub fn format_currency(amount: Option<f64>) -> String {
    let value = amount.unwrap_or(0.0);
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as i64;
    let grouped = group_thousands(&(cents / 100).to_string());
    format!("{sign}₦{grouped}.{:02}", cents % 100)
}

/// Format a property price as whole naira with comma grouping. Fractional
/// kobo are rounded; prices are stored in whole naira.
pub fn format_price_with_commas(price: Option<f64>) -> String {
    let value = price.unwrap_or(0.0);
    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = group_thousands(&(value.abs().round() as i64).to_string());
    format!("{sign}₦{grouped}")
}

/// Compact form for large numbers: 1.5K, 2.3M, 1.1B.
pub fn format_large_number(num: Option<f64>) -> String {
    let n = num.unwrap_or(0.0);
    if n >= 1_000_000_000.0 {
        format!("{:.1}B", n / 1_000_000_000.0)
    } else if n >= 1_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Short localized date: "Apr 5, 2025". Empty for a missing date.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_groups_and_pads() {
        assert_eq!(format_currency(Some(1_234_567.5)), "₦1,234,567.50");
        assert_eq!(format_currency(Some(0.0)), "₦0.00");
        assert_eq!(format_currency(Some(-25.125)), "-₦25.13");
        assert_eq!(format_currency(None), "₦0.00");
    }

    #[test]
    fn price_is_whole_naira() {
        assert_eq!(format_price_with_commas(Some(25_000_000.0)), "₦25,000,000");
        assert_eq!(format_price_with_commas(Some(999.6)), "₦1,000");
        assert_eq!(format_price_with_commas(None), "₦0");
    }

    #[test]
    fn large_numbers_compact() {
        assert_eq!(format_large_number(Some(532.0)), "532");
        assert_eq!(format_large_number(Some(1_500.0)), "1.5K");
        assert_eq!(format_large_number(Some(2_340_000.0)), "2.3M");
        assert_eq!(format_large_number(Some(1_100_000_000.0)), "1.1B");
        assert_eq!(format_large_number(None), "0");
    }

    #[test]
    fn dates_render_short_form() {
        let date = Utc.with_ymd_and_hms(2025, 4, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)), "Apr 5, 2025");
        assert_eq!(format_date(None), "");
    }
}
