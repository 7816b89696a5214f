//! Display formatting for dates, prices and rates.

use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::profit_rate::ProfitRate;
use chrono::{DateTime, Datelike, NaiveDate};

const MAX_FRACTION_DIGITS: usize = 3;

/// `2024-05-01` → `2024. 5. 1.`; anything unparseable is returned verbatim.
pub fn format_date(date: &str) -> String {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()));

    match parsed {
        Some(d) => format!("{}. {}. {}.", d.year(), d.month(), d.day()),
        None => date.to_string(),
    }
}

/// Thousands-grouped with at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 3 + 1);
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

pub fn format_won(price: Price) -> String {
    format!("{}원", format_number(price.value()))
}

pub fn format_rate(rate: ProfitRate) -> String {
    format!("{}%", format_number(rate.value()))
}
