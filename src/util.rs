// Utility helpers for parsing spreadsheet cells and formatting numbers.
//
// Published sheets are exported with a mix of date styles, thousands
// separators and footnote text; everything forgiving lives here so the rest
// of the code can assume typed values.
use chrono::{Duration, NaiveDate};
use num_format::{Locale, ToFormattedString};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d %B %Y", "%d %b %Y"];

// Spreadsheet day serials count from 1899-12-30; the upper bound is 9999-12-31.
const SERIAL_MAX: i64 = 2_958_465;

/// Lowercase a header and collapse every run of non-alphanumerics to `_`.
///
/// `"Boats arrived - involved in uncontrolled landings"` becomes
/// `boats_arrived_involved_in_uncontrolled_landings`.
pub fn snake_case(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut pending_sep = false;
    for c in header.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Parse a count cell.
///
/// - Blank or missing cells are `None`.
/// - Cells containing letters (`"n/a"`, footnote markers) are `None`.
/// - Thousands separators are stripped; integral decimals like `"12.0"` pass.
/// - Decimals outside the `i64` range are `None` rather than clamped.
pub fn parse_count_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    if v.is_finite() && v.fract() == 0.0 && in_range {
        Some(v as i64)
    } else {
        None
    }
}

/// Parse a date cell in any of the formats the sheet has been published with,
/// or as a spreadsheet serial day number.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    // Datetime exports such as "2024-03-04 00:00:00".
    if let Some((day, _)) = s.split_once([' ', 'T']) {
        if let Ok(d) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Some(d);
        }
    }
    let serial = s.parse::<f64>().ok()?;
    if serial.fract() != 0.0 || serial < 1.0 || serial > SERIAL_MAX as f64 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial as i64))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with `1,234,567.89` style thousands separators.
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative();
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_val: i64 = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = parts.next() {
        res.push('.');
        res.push_str(frac);
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
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
