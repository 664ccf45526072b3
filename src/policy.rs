//! Null and ratio rules shared by the daily, weekly and monthly tables.
//!
//! A published count of zero means "nothing recorded for that day", so it is
//! blanked in every non-cumulative column. The migrants-per-boat ratio only
//! exists when both counts survive that coercion. Cumulative columns are
//! never blanked.

/// Blank a zero count.
pub fn observed(count: i64) -> Option<i64> {
    if count == 0 {
        None
    } else {
        Some(count)
    }
}

/// Round to the nearest integer, halves away from zero (2.5 -> 3, 0.5 -> 1).
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// The precise and rounded ratio. Both are present or both are absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ratio {
    pub value: Option<f64>,
    pub rounded: Option<i64>,
}

impl Ratio {
    /// Ratio of two counts that have already been through [`observed`].
    pub fn between(migrants: Option<i64>, boats: Option<i64>) -> Self {
        match (migrants, boats) {
            (Some(m), Some(b)) if b != 0 => {
                let value = m as f64 / b as f64;
                Self {
                    value: Some(value),
                    rounded: Some(round_half_away(value)),
                }
            }
            _ => Self::default(),
        }
    }
}
