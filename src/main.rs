// Entry point and high-level CLI flow.
//
// `load` parses and validates the source sheet and prints diagnostics.
// `generate` rebuilds every table, writes them out with a JSON summary and
// prints markdown previews. Nothing is written unless every table builds.
mod bootstrap;
mod config;

use anyhow::Context;
use channel_crossings::output::{self, SUMMARY_FILE};
use channel_crossings::reports::{self, ReportTables};
use channel_crossings::types::DailyRecord;
use channel_crossings::{loader, util};
use clap::Parser;
use config::{Cli, Commands, SourceArgs};
use std::path::{Path, PathBuf};
use tracing::info;

fn resolve_source(args: &SourceArgs) -> anyhow::Result<PathBuf> {
    match &args.file {
        Some(file) => Ok(file.clone()),
        None => loader::discover_source(&args.data_dir)
            .with_context(|| format!("no source sheet in {}", args.data_dir.display())),
    }
}

fn load_source(args: &SourceArgs) -> anyhow::Result<(PathBuf, Vec<DailyRecord>)> {
    let path = resolve_source(args)?;
    let (records, load_report) = loader::load_and_clean(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    println!(
        "Processing dataset... ({} rows read, {} daily records loaded)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.loaded_rows)
    );
    if load_report.skipped_rows > 0 {
        println!(
            "Note: {} rows without a date were skipped.",
            util::format_int(load_report.skipped_rows)
        );
    }
    if load_report.unreadable_counts > 0 {
        println!(
            "Note: {} count cells could not be read and were left blank.",
            util::format_int(load_report.unreadable_counts)
        );
    }
    Ok((path, records))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Handle `load`: parse and validate, print the date range and totals.
fn handle_load(args: &SourceArgs) -> anyhow::Result<()> {
    let (path, records) = load_source(args)?;
    let tables = reports::build_tables(&records).context("source failed validation")?;
    let summary = reports::generate_summary(&file_name(&path), &tables)?;

    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => println!("Dates: {} to {}", first, last),
        _ => println!("Dates: (none)"),
    }
    for year in &summary.years {
        println!(
            "  {}: {} migrants, {} boats",
            year.year,
            util::format_int(year.migrants_arrived),
            util::format_int(year.boats_arrived)
        );
    }
    Ok(())
}

fn print_previews(tables: &ReportTables, rows: usize) {
    println!("Daily (first {} rows)\n", rows);
    output::preview_table_rows(&tables.daily, rows);
    println!("Weekly (first {} rows)\n", rows);
    output::preview_table_rows(&tables.weekly, rows);
    println!("Monthly (first {} rows)\n", rows);
    output::preview_table_rows(&tables.monthly, rows);
    println!("Yearly\n");
    output::preview_table_rows(&tables.yearly, tables.yearly.len());
    println!("Weekly cumulative (last {} weeks)\n", rows);
    output::preview_wide(&tables.weekly_cumulative, rows);
    println!("Monthly cumulative (last {} months)\n", rows);
    output::preview_wide(&tables.monthly_cumulative, rows);
}

/// Handle `generate`: build everything in memory, then write.
fn handle_generate(
    args: &SourceArgs,
    out_dir: &Path,
    preview_rows: usize,
    no_preview: bool,
) -> anyhow::Result<()> {
    let (path, records) = load_source(args)?;
    let tables = reports::build_tables(&records).context("failed to build tables")?;
    let summary = reports::generate_summary(&file_name(&path), &tables)?;

    let written = output::write_tables(out_dir, &tables)
        .with_context(|| format!("failed to write tables to {}", out_dir.display()))?;
    output::write_json(&out_dir.join(SUMMARY_FILE), &summary)
        .context("failed to write summary")?;

    if !no_preview {
        print_previews(&tables, preview_rows);
    }

    for path in &written {
        println!("(exported {})", path.display());
    }
    let ratio = reports::overall_ratio(&summary)
        .map(|r| r.to_string())
        .unwrap_or_default();
    println!(
        "Summary ({}): {} migrants on {} boats, {} per boat",
        SUMMARY_FILE,
        util::format_int(summary.total_migrants),
        util::format_int(summary.total_boats),
        ratio
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bootstrap::setup_logging(&cli.log_level)?;
    info!("channel-crossings v{} starting", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Load { source } => handle_load(source),
        Commands::Generate {
            source,
            out_dir,
            preview_rows,
            no_preview,
        } => handle_generate(source, out_dir, *preview_rows, *no_preview),
    }
}
