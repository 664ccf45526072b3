use crate::error::Result;
use crate::reports::ReportTables;
use crate::types::Columns;
use crate::wide::WideTable;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::info;

pub const DAILY_FILE: &str = "small_boats_daily.csv";
pub const WEEKLY_FILE: &str = "small_boats_weekly.csv";
pub const MONTHLY_FILE: &str = "small_boats_monthly.csv";
pub const YEARLY_FILE: &str = "small_boats_yearly.csv";
pub const WEEKLY_CUMULATIVE_FILE: &str = "small_boats_weekly_cumulative.csv";
pub const MONTHLY_CUMULATIVE_FILE: &str = "small_boats_monthly_cumulative.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Write typed rows under the row type's fixed header, so an empty table
/// still names its columns.
pub fn write_csv<T: Serialize + Columns>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    wtr.write_record(T::COLUMNS)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a wide table. The header row is written even when there are no rows.
pub fn write_wide_csv(path: &Path, table: &WideTable) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.headers())?;
    for record in table.records() {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Write the six tables into `out_dir`, returning the paths written in order.
pub fn write_tables(out_dir: &Path, tables: &ReportTables) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let path = |name: &str| out_dir.join(name);

    write_csv(&path(DAILY_FILE), &tables.daily)?;
    write_csv(&path(WEEKLY_FILE), &tables.weekly)?;
    write_csv(&path(MONTHLY_FILE), &tables.monthly)?;
    write_csv(&path(YEARLY_FILE), &tables.yearly)?;
    write_wide_csv(&path(WEEKLY_CUMULATIVE_FILE), &tables.weekly_cumulative)?;
    write_wide_csv(&path(MONTHLY_CUMULATIVE_FILE), &tables.monthly_cumulative)?;

    let written: Vec<PathBuf> = [
        DAILY_FILE,
        WEEKLY_FILE,
        MONTHLY_FILE,
        YEARLY_FILE,
        WEEKLY_CUMULATIVE_FILE,
        MONTHLY_CUMULATIVE_FILE,
    ]
    .iter()
    .map(|name| path(name))
    .collect();
    info!("Wrote {} tables to {}", written.len(), out_dir.display());
    Ok(written)
}

/// Markdown preview of the first `max_rows` rows.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Markdown preview of the last `max_rows` periods of a wide table.
pub fn preview_wide(table: &WideTable, max_rows: usize) {
    let records = table.records();
    if records.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let skip = records.len().saturating_sub(max_rows);
    let mut builder = Builder::default();
    builder.push_record(table.headers());
    for record in records.into_iter().skip(skip) {
        builder.push_record(record);
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
