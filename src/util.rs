// Parsing and number formatting helpers shared by forms, tables and exports.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a form value into `f64` while being forgiving about formatting
/// (surrounding spaces, thousands separators).
///
/// - Rejects values that contain alphabetic characters.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Form dates are expected in `YYYY-MM-DD` format.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus thousands separators (e.g. `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Whole-rupiah amount, e.g. `Rp 1,500,000`.
pub fn format_currency(n: f64) -> String {
    format!("Rp {}", format_number(n, 0))
}
