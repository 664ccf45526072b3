//! Pivot of the long weekly/monthly tables into one cumulative column per year.
use crate::calendar::{month_name, month_short_name};
use crate::types::PeriodAggregate;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub period: u32,
    /// Label values, in the same order as [`WideTable::label_columns`].
    pub labels: Vec<String>,
    /// One cell per entry of [`WideTable::years`].
    pub cells: Vec<Option<i64>>,
}

/// Rows keyed by period, one cumulative-migrants column per observed year.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub period_column: &'static str,
    pub label_columns: Vec<&'static str>,
    pub years: Vec<i32>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec![self.period_column.to_string()];
        headers.extend(self.label_columns.iter().map(|c| c.to_string()));
        headers.extend(self.years.iter().map(|y| y.to_string()));
        headers
    }

    /// Rows rendered as text, absent cells as empty strings.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = vec![row.period.to_string()];
                record.extend(row.labels.iter().cloned());
                record.extend(
                    row.cells
                        .iter()
                        .map(|c| c.map(|v| v.to_string()).unwrap_or_default()),
                );
                record
            })
            .collect()
    }

    pub fn cell(&self, period: u32, year: i32) -> Option<i64> {
        let col = self.years.iter().position(|y| *y == year)?;
        self.rows
            .iter()
            .find(|r| r.period == period)
            .and_then(|r| r.cells[col])
    }
}

fn pivot_cumulative<F>(
    aggregates: &[PeriodAggregate],
    period_column: &'static str,
    label_columns: Vec<&'static str>,
    labels: F,
) -> WideTable
where
    F: Fn(u32) -> Vec<String>,
{
    let years: BTreeSet<i32> = aggregates.iter().map(|a| a.year).collect();
    let mut by_period: BTreeMap<u32, BTreeMap<i32, i64>> = BTreeMap::new();
    for agg in aggregates {
        by_period
            .entry(agg.period)
            .or_default()
            .insert(agg.year, agg.cumulative_migrants_arrived);
    }

    let rows = by_period
        .into_iter()
        .map(|(period, by_year)| WideRow {
            period,
            labels: labels(period),
            cells: years.iter().map(|y| by_year.get(y).copied()).collect(),
        })
        .collect();

    WideTable {
        period_column,
        label_columns,
        years: years.into_iter().collect(),
        rows,
    }
}

pub fn weekly_cumulative_wide(weekly: &[PeriodAggregate]) -> WideTable {
    pivot_cumulative(weekly, "week", Vec::new(), |_| Vec::new())
}

/// Monthly pivot, with short and long month names ahead of the year columns.
pub fn monthly_cumulative_wide(monthly: &[PeriodAggregate]) -> WideTable {
    pivot_cumulative(monthly, "month", vec!["month_short", "month_name"], |m| {
        vec![
            month_short_name(m).unwrap_or_default().to_string(),
            month_name(m).unwrap_or_default().to_string(),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{aggregate_monthly, aggregate_weekly, normalize_daily};
    use crate::types::DailyRecord;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> Vec<PeriodAggregate> {
        let records = vec![
            DailyRecord::new(d(2023, 1, 10), Some(100), Some(2)),
            DailyRecord::new(d(2023, 2, 10), Some(50), Some(1)),
            DailyRecord::new(d(2024, 1, 9), Some(20), Some(1)),
            DailyRecord::new(d(2024, 3, 9), Some(0), Some(0)),
        ];
        let daily = normalize_daily(&records).unwrap();
        aggregate_monthly(&daily).unwrap()
    }

    #[test]
    fn monthly_pivot_has_labels_then_years() {
        let wide = monthly_cumulative_wide(&sample());
        assert_eq!(
            wide.headers(),
            vec!["month", "month_short", "month_name", "2023", "2024"]
        );
        assert_eq!(wide.rows.len(), 3);
        assert_eq!(wide.rows[0].labels, vec!["Jan", "January"]);
        assert_eq!(wide.rows[2].labels, vec!["Mar", "March"]);
    }

    #[test]
    fn every_long_pair_is_a_cell_and_nothing_else_is() {
        let monthly = sample();
        let wide = monthly_cumulative_wide(&monthly);
        for agg in &monthly {
            assert_eq!(
                wide.cell(agg.period, agg.year),
                Some(agg.cumulative_migrants_arrived)
            );
        }
        let present = monthly.len();
        let filled: usize = wide
            .rows
            .iter()
            .map(|r| r.cells.iter().filter(|c| c.is_some()).count())
            .sum();
        assert_eq!(filled, present);
        assert_eq!(wide.cell(2, 2024), None);
        assert_eq!(wide.cell(3, 2023), None);
    }

    #[test]
    fn quiet_period_keeps_its_cumulative_cell() {
        let wide = monthly_cumulative_wide(&sample());
        assert_eq!(wide.cell(3, 2024), Some(20));
    }

    #[test]
    fn records_render_absent_cells_empty() {
        let wide = monthly_cumulative_wide(&sample());
        assert_eq!(wide.records()[1], vec!["2", "Feb", "February", "150", ""]);
    }

    #[test]
    fn weekly_pivot_has_no_label_columns() {
        let records = vec![
            DailyRecord::new(d(2025, 12, 30), Some(5), Some(1)),
            DailyRecord::new(d(2026, 1, 1), Some(10), Some(1)),
        ];
        let daily = normalize_daily(&records).unwrap();
        let wide = weekly_cumulative_wide(&aggregate_weekly(&daily).unwrap());
        assert_eq!(wide.headers(), vec!["week", "2025", "2026"]);
        assert_eq!(wide.records(), vec![vec!["1", "", "10"], vec!["52", "5", ""]]);
    }

    #[test]
    fn empty_input_keeps_only_label_columns() {
        let wide = monthly_cumulative_wide(&[]);
        assert_eq!(wide.headers(), vec!["month", "month_short", "month_name"]);
        assert!(wide.records().is_empty());
    }
}
