use crate::calendar::{corrected_week, date_label, first_of_month, month_label};
use crate::error::{CrossingsError, Result};
use crate::policy::{observed, round_half_away, Ratio};
use crate::types::{
    Counts, DailyRecord, Metric, MonthlyRow, NormalizedDailyRecord, PeriodAggregate,
    SummaryStats, WeeklyRow, YearTotal, YearlyRow,
};
use crate::wide::{monthly_cumulative_wide, weekly_cumulative_wide, WideTable};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Every table produced by one run, computed in memory before anything is
/// written.
#[derive(Debug, Clone)]
pub struct ReportTables {
    pub daily: Vec<NormalizedDailyRecord>,
    pub weekly: Vec<WeeklyRow>,
    pub monthly: Vec<MonthlyRow>,
    pub yearly: Vec<YearlyRow>,
    pub weekly_cumulative: WideTable,
    pub monthly_cumulative: WideTable,
}

pub fn build_tables(records: &[DailyRecord]) -> Result<ReportTables> {
    let daily = normalize_daily(records)?;
    let weekly = aggregate_weekly(&daily)?;
    let monthly = aggregate_monthly(&daily)?;
    let yearly = aggregate_yearly(&daily)?;

    let weekly_cumulative = weekly_cumulative_wide(&weekly);
    let monthly_cumulative = monthly_cumulative_wide(&monthly);

    debug!(
        daily = daily.len(),
        weekly = weekly.len(),
        monthly = monthly.len(),
        yearly = yearly.len(),
        "tables built"
    );

    Ok(ReportTables {
        daily,
        weekly: weekly.iter().map(weekly_row).collect(),
        monthly: monthly.iter().map(monthly_row).collect(),
        yearly,
        weekly_cumulative,
        monthly_cumulative,
    })
}

/// Add `add` into `total`. A sum that no longer fits is reported as an
/// invalid count on `date`.
fn accumulate(total: &mut Counts, add: Counts, date: NaiveDate) -> Result<()> {
    *total = total
        .checked_add(add)
        .map_err(|metric| CrossingsError::InvalidCount {
            date,
            column: metric.column(),
            value: add.get(metric),
        })?;
    Ok(())
}

fn validate_daily(records: &[DailyRecord]) -> Result<()> {
    for (row, record) in records.iter().enumerate() {
        let raw = record.counts();
        for metric in Metric::TRACKED {
            let value = raw.get(metric);
            if value < 0 {
                return Err(CrossingsError::InvalidCount {
                    date: record.date,
                    column: metric.column(),
                    value,
                });
            }
        }
        if row == 0 {
            continue;
        }
        let previous = records[row - 1].date;
        if previous == record.date {
            return Err(CrossingsError::InvalidRecord {
                row,
                reason: format!("duplicate date {}", record.date),
            });
        }
        if previous > record.date {
            return Err(CrossingsError::InvalidRecord {
                row,
                reason: format!("{} follows {}; rows must be sorted", record.date, previous),
            });
        }
    }
    Ok(())
}

/// Clean the daily series: running totals per calendar year over the raw
/// counts, zero counts blanked, ratio and label columns derived.
///
/// Output has the same length and order as the input.
pub fn normalize_daily(records: &[DailyRecord]) -> Result<Vec<NormalizedDailyRecord>> {
    validate_daily(records)?;

    let mut out = Vec::with_capacity(records.len());
    let mut running = Counts::default();
    let mut current_year = None;

    for record in records {
        let date = record.date;
        if current_year != Some(date.year()) {
            running = Counts::default();
            current_year = Some(date.year());
        }
        let raw = record.counts();
        accumulate(&mut running, raw, date)?;

        let migrants = observed(raw.migrants);
        let boats = observed(raw.boats);
        let ratio = Ratio::between(migrants, boats);

        out.push(NormalizedDailyRecord {
            date,
            date_label: date_label(date),
            year: date.year(),
            month: date.month(),
            day: date.day(),
            migrants_arrived: migrants,
            boats_arrived: boats,
            migrants_per_boat: ratio.value,
            cumulative_migrants_arrived: running.migrants,
            cumulative_boats_arrived: running.boats,
            migrants_per_boat_round: ratio.rounded,
            boats_arrived_involved_in_uncontrolled_landings: record
                .extra
                .uncontrolled_landing_boats,
            notes: record.extra.notes.clone(),
        });
    }
    Ok(out)
}

/// Group by (year, corrected week).
pub fn aggregate_weekly(daily: &[NormalizedDailyRecord]) -> Result<Vec<PeriodAggregate>> {
    aggregate_by_period(daily, |date| Ok((date.year(), corrected_week(date)?)))
}

/// Group by (year, month).
pub fn aggregate_monthly(daily: &[NormalizedDailyRecord]) -> Result<Vec<PeriodAggregate>> {
    aggregate_by_period(daily, |date| Ok((date.year(), date.month())))
}

/// Sum per key, then rebuild running totals within each year and reapply the
/// null/ratio rules to the sums. Incoming cumulative and ratio columns are
/// ignored.
fn aggregate_by_period<F>(
    daily: &[NormalizedDailyRecord],
    key_fn: F,
) -> Result<Vec<PeriodAggregate>>
where
    F: Fn(NaiveDate) -> Result<(i32, u32)>,
{
    let mut map: BTreeMap<(i32, u32), (NaiveDate, Counts)> = BTreeMap::new();
    for record in daily {
        let key = key_fn(record.date)?;
        let entry = map.entry(key).or_insert((record.date, Counts::default()));
        entry.0 = entry.0.min(record.date);
        accumulate(&mut entry.1, record.counts(), record.date)?;
    }

    let mut out = Vec::with_capacity(map.len());
    let mut running = Counts::default();
    let mut current_year = None;
    for ((year, period), (first_date, sums)) in map {
        if current_year != Some(year) {
            running = Counts::default();
            current_year = Some(year);
        }
        accumulate(&mut running, sums, first_date)?;

        let migrants = observed(sums.migrants);
        let boats = observed(sums.boats);
        let ratio = Ratio::between(migrants, boats);
        out.push(PeriodAggregate {
            year,
            period,
            first_date,
            migrants_arrived: migrants,
            boats_arrived: boats,
            migrants_per_boat: ratio.value,
            cumulative_migrants_arrived: running.migrants,
            cumulative_boats_arrived: running.boats,
            migrants_per_boat_round: ratio.rounded,
        });
    }
    Ok(out)
}

/// Whole-year sums. The ratio is a direct float division of the sums with no
/// zero blanking, so a year with no boats gives `NaN` (or `inf`).
pub fn aggregate_yearly(daily: &[NormalizedDailyRecord]) -> Result<Vec<YearlyRow>> {
    let mut map: BTreeMap<i32, Counts> = BTreeMap::new();
    for record in daily {
        accumulate(map.entry(record.year).or_default(), record.counts(), record.date)?;
    }
    Ok(map
        .into_iter()
        .map(|(year, sums)| {
            let ratio = sums.migrants as f64 / sums.boats as f64;
            YearlyRow {
                year,
                migrants_arrived: sums.migrants,
                boats_arrived: sums.boats,
                migrants_per_boat: ratio,
                migrants_per_boat_round: ratio.round(),
            }
        })
        .collect())
}

pub fn weekly_row(agg: &PeriodAggregate) -> WeeklyRow {
    WeeklyRow {
        week_commencing: agg.first_date,
        year: agg.year,
        week: agg.period,
        migrants_arrived: agg.migrants_arrived,
        boats_arrived: agg.boats_arrived,
        migrants_per_boat: agg.migrants_per_boat,
        cumulative_migrants_arrived: agg.cumulative_migrants_arrived,
        cumulative_boats_arrived: agg.cumulative_boats_arrived,
        migrants_per_boat_round: agg.migrants_per_boat_round,
    }
}

pub fn monthly_row(agg: &PeriodAggregate) -> MonthlyRow {
    let month_start = first_of_month(agg.first_date);
    MonthlyRow {
        month_start,
        month_label: month_label(month_start),
        year: agg.year,
        month: agg.period,
        migrants_arrived: agg.migrants_arrived,
        boats_arrived: agg.boats_arrived,
        migrants_per_boat: agg.migrants_per_boat,
        cumulative_migrants_arrived: agg.cumulative_migrants_arrived,
        cumulative_boats_arrived: agg.cumulative_boats_arrived,
        migrants_per_boat_round: agg.migrants_per_boat_round,
    }
}

pub fn generate_summary(source_file: &str, tables: &ReportTables) -> Result<SummaryStats> {
    let last_date = tables.daily.last().map(|r| r.date);
    let years: Vec<YearTotal> = tables
        .yearly
        .iter()
        .map(|y| YearTotal {
            year: y.year,
            migrants_arrived: y.migrants_arrived,
            boats_arrived: y.boats_arrived,
        })
        .collect();
    let mut total = Counts::default();
    for year in &years {
        let sums = Counts {
            migrants: year.migrants_arrived,
            boats: year.boats_arrived,
        };
        accumulate(&mut total, sums, last_date.unwrap_or_default())?;
    }
    Ok(SummaryStats {
        source_file: source_file.to_string(),
        first_date: tables.daily.first().map(|r| r.date),
        last_date,
        total_days: tables.daily.len(),
        total_migrants: total.migrants,
        total_boats: total.boats,
        years,
    })
}

/// Mean migrants per boat across the whole series, for console output.
pub fn overall_ratio(summary: &SummaryStats) -> Option<i64> {
    Ratio::between(observed(summary.total_migrants), observed(summary.total_boats))
        .value
        .map(round_half_away)
}
