//! Calendar helpers: the corrected ISO week, month names and date labels.
use crate::error::{CrossingsError, Result};
use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// ISO week number folded so that no week straddles a year boundary.
///
/// January days that ISO places in week 52 or 53 of the previous year belong
/// to week 1; December days that ISO places in week 1 (or 53) of the next
/// year belong to week 52. Every calendar year therefore spans weeks 1..=52.
pub fn corrected_week(date: NaiveDate) -> Result<u32> {
    let iso = date.iso_week().week();
    let week = match (iso, date.month()) {
        (52 | 53, 1) => 1,
        (1 | 53, 12) => 52,
        (w, _) => w,
    };
    if !(1..=52).contains(&week) {
        return Err(CrossingsError::InvalidGrouping { date, week });
    }
    Ok(week)
}

pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
}

/// Three-letter month abbreviation, e.g. `Jan`.
pub fn month_short_name(month: u32) -> Option<&'static str> {
    month_name(month).map(|name| &name[..3])
}

/// `"March 4, 2024"`: full month name, day without padding.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `"March 2024"`.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month.
    date.with_day(1).unwrap_or(date)
}
