use crate::error::{CrossingsError, Result};
use crate::types::{DailyRecord, Metric, PassThrough, RawRow};
use crate::util::{parse_count_safe, parse_date_safe, snake_case};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    /// Rows with a blank date cell (spacers, footnotes).
    pub skipped_rows: usize,
    /// Non-blank count cells that could not be read (text, fractions or
    /// out-of-range values) and were treated as absent.
    pub unreadable_counts: usize,
}

/// Find the source sheet in `dir`.
///
/// Only the top level is scanned. When several CSVs are present the
/// lexicographically last name wins, since published files carry their
/// publication date in the name.
pub fn discover_source(dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let is_csv = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if entry.file_type().is_file() && is_csv {
            candidates.push(entry.into_path());
        }
    }
    candidates.sort();
    let Some(chosen) = candidates.pop() else {
        return Err(CrossingsError::NoSourceFile(dir.to_path_buf()));
    };
    if !candidates.is_empty() {
        warn!(
            "{} candidate source files in {}; using {}",
            candidates.len() + 1,
            dir.display(),
            chosen.display()
        );
    }
    Ok(chosen)
}

pub fn load_and_clean(path: &Path) -> Result<(Vec<DailyRecord>, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|source| CrossingsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Reading {}", path.display());
    load_from_reader(file)
}

/// Parse a daily sheet from any reader and return its rows sorted by date.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<DailyRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: StringRecord = rdr.headers()?.iter().map(snake_case).collect();
    for required in ["date", Metric::Migrants.column(), Metric::Boats.column()] {
        if !headers.iter().any(|h| h == required) {
            return Err(CrossingsError::MissingColumn(required.to_string()));
        }
    }
    rdr.set_headers(headers);

    let mut report = LoadReport::default();
    let mut records: Vec<DailyRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        // Data rows start on line 2 of the sheet.
        let line = idx + 2;
        report.total_rows += 1;
        let row = result?;

        let date_cell = row.date.as_deref().map(str::trim).unwrap_or_default();
        if date_cell.is_empty() {
            report.skipped_rows += 1;
            continue;
        }
        let Some(date) = parse_date_safe(Some(date_cell)) else {
            return Err(CrossingsError::InvalidRecord {
                row: line,
                reason: format!("unrecognised date {:?}", date_cell),
            });
        };

        let mut read_count = |column: &str, cell: Option<&str>| {
            let value = parse_count_safe(cell);
            if value.is_none() && cell.is_some_and(|c| !c.trim().is_empty()) {
                warn!("{}: unreadable {} {:?}, treating as absent", date, column, cell);
                report.unreadable_counts += 1;
            }
            value
        };
        let migrants_arrived = read_count(Metric::Migrants.column(), row.migrants_arrived.as_deref());
        let boats_arrived = read_count(Metric::Boats.column(), row.boats_arrived.as_deref());
        let uncontrolled_landing_boats = parse_count_safe(
            row.boats_arrived_involved_in_uncontrolled_landings.as_deref(),
        );

        records.push(DailyRecord {
            date,
            migrants_arrived,
            boats_arrived,
            extra: PassThrough {
                uncontrolled_landing_boats,
                notes: row.notes.filter(|n| !n.trim().is_empty()),
            },
        });
    }

    records.sort_by_key(|r| r.date);
    report.loaded_rows = records.len();
    debug!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "source parsed"
    );
    Ok((records, report))
}
