use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tabled::Tabled;

/// One row of the source sheet, after headers have been snake-cased.
///
/// Every cell is read as text so that blank spacer rows and footnotes
/// survive deserialization and can be filtered by the loader.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub migrants_arrived: Option<String>,
    #[serde(default)]
    pub boats_arrived: Option<String>,
    #[serde(default)]
    pub boats_arrived_involved_in_uncontrolled_landings: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Columns the core ignores but which are carried onto the daily table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassThrough {
    pub uncontrolled_landing_boats: Option<i64>,
    pub notes: Option<String>,
}

/// A single day of the source series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub migrants_arrived: Option<i64>,
    pub boats_arrived: Option<i64>,
    pub extra: PassThrough,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, migrants_arrived: Option<i64>, boats_arrived: Option<i64>) -> Self {
        Self {
            date,
            migrants_arrived,
            boats_arrived,
            extra: PassThrough::default(),
        }
    }

    /// Raw counts with absent treated as zero.
    pub fn counts(&self) -> Counts {
        Counts {
            migrants: self.migrants_arrived.unwrap_or(0),
            boats: self.boats_arrived.unwrap_or(0),
        }
    }
}

/// The two tracked metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Migrants,
    Boats,
}

impl Metric {
    pub const TRACKED: [Metric; 2] = [Metric::Migrants, Metric::Boats];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Migrants => "migrants_arrived",
            Metric::Boats => "boats_arrived",
        }
    }
}

/// Migrant and boat totals, summed or running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub migrants: i64,
    pub boats: i64,
}

impl Counts {
    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Migrants => self.migrants,
            Metric::Boats => self.boats,
        }
    }

    /// Add two totals, or name the first metric whose sum overflows.
    pub fn checked_add(self, other: Counts) -> Result<Counts, Metric> {
        Ok(Counts {
            migrants: self
                .migrants
                .checked_add(other.migrants)
                .ok_or(Metric::Migrants)?,
            boats: self.boats.checked_add(other.boats).ok_or(Metric::Boats)?,
        })
    }
}

/// Sum for one (year, period) pair, before it is shaped into an output row.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAggregate {
    pub year: i32,
    /// Corrected week (1..=52) or month (1..=12).
    pub period: u32,
    /// Earliest date that fell into the group.
    pub first_date: NaiveDate,
    pub migrants_arrived: Option<i64>,
    pub boats_arrived: Option<i64>,
    pub migrants_per_boat: Option<f64>,
    pub cumulative_migrants_arrived: i64,
    pub cumulative_boats_arrived: i64,
    pub migrants_per_boat_round: Option<i64>,
}

impl PeriodAggregate {
    pub fn counts(&self) -> Counts {
        Counts {
            migrants: self.migrants_arrived.unwrap_or(0),
            boats: self.boats_arrived.unwrap_or(0),
        }
    }
}

/// Output rows with a fixed, documented column order. The header is written
/// from this list so that an empty table still names its columns.
pub trait Columns {
    const COLUMNS: &'static [&'static str];
}

pub(crate) fn display_opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

pub(crate) fn display_ratio(value: &Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct NormalizedDailyRecord {
    pub date: NaiveDate,
    pub date_label: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[tabled(display_with = "display_opt")]
    pub migrants_arrived: Option<i64>,
    #[tabled(display_with = "display_opt")]
    pub boats_arrived: Option<i64>,
    #[tabled(display_with = "display_ratio")]
    pub migrants_per_boat: Option<f64>,
    pub cumulative_migrants_arrived: i64,
    pub cumulative_boats_arrived: i64,
    #[tabled(display_with = "display_opt")]
    pub migrants_per_boat_round: Option<i64>,
    #[tabled(skip)]
    pub boats_arrived_involved_in_uncontrolled_landings: Option<i64>,
    #[tabled(skip)]
    pub notes: Option<String>,
}

impl NormalizedDailyRecord {
    pub fn counts(&self) -> Counts {
        Counts {
            migrants: self.migrants_arrived.unwrap_or(0),
            boats: self.boats_arrived.unwrap_or(0),
        }
    }
}

impl Columns for NormalizedDailyRecord {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "date_label",
        "year",
        "month",
        "day",
        "migrants_arrived",
        "boats_arrived",
        "migrants_per_boat",
        "cumulative_migrants_arrived",
        "cumulative_boats_arrived",
        "migrants_per_boat_round",
        "boats_arrived_involved_in_uncontrolled_landings",
        "notes",
    ];
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct WeeklyRow {
    pub week_commencing: NaiveDate,
    pub year: i32,
    pub week: u32,
    #[tabled(display_with = "display_opt")]
    pub migrants_arrived: Option<i64>,
    #[tabled(display_with = "display_opt")]
    pub boats_arrived: Option<i64>,
    #[tabled(display_with = "display_ratio")]
    pub migrants_per_boat: Option<f64>,
    pub cumulative_migrants_arrived: i64,
    pub cumulative_boats_arrived: i64,
    #[tabled(display_with = "display_opt")]
    pub migrants_per_boat_round: Option<i64>,
}

impl Columns for WeeklyRow {
    const COLUMNS: &'static [&'static str] = &[
        "week_commencing",
        "year",
        "week",
        "migrants_arrived",
        "boats_arrived",
        "migrants_per_boat",
        "cumulative_migrants_arrived",
        "cumulative_boats_arrived",
        "migrants_per_boat_round",
    ];
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlyRow {
    pub month_start: NaiveDate,
    pub month_label: String,
    pub year: i32,
    pub month: u32,
    #[tabled(display_with = "display_opt")]
    pub migrants_arrived: Option<i64>,
    #[tabled(display_with = "display_opt")]
    pub boats_arrived: Option<i64>,
    #[tabled(display_with = "display_ratio")]
    pub migrants_per_boat: Option<f64>,
    pub cumulative_migrants_arrived: i64,
    pub cumulative_boats_arrived: i64,
    #[tabled(display_with = "display_opt")]
    pub migrants_per_boat_round: Option<i64>,
}

impl Columns for MonthlyRow {
    const COLUMNS: &'static [&'static str] = &[
        "month_start",
        "month_label",
        "year",
        "month",
        "migrants_arrived",
        "boats_arrived",
        "migrants_per_boat",
        "cumulative_migrants_arrived",
        "cumulative_boats_arrived",
        "migrants_per_boat_round",
    ];
}

/// Whole-year totals. The ratio here is a plain float division of the
/// sums, so a year without boats yields `NaN` or `inf` rather than a blank.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearlyRow {
    pub year: i32,
    pub migrants_arrived: i64,
    pub boats_arrived: i64,
    pub migrants_per_boat: f64,
    pub migrants_per_boat_round: f64,
}

impl Columns for YearlyRow {
    const COLUMNS: &'static [&'static str] = &[
        "year",
        "migrants_arrived",
        "boats_arrived",
        "migrants_per_boat",
        "migrants_per_boat_round",
    ];
}

#[derive(Debug, Serialize, Clone)]
pub struct YearTotal {
    pub year: i32,
    pub migrants_arrived: i64,
    pub boats_arrived: i64,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub source_file: String,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_days: usize,
    pub total_migrants: i64,
    pub total_boats: i64,
    pub years: Vec<YearTotal>,
}
