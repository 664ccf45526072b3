use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rebuilds daily, weekly, monthly and yearly small-boat crossing tables
/// from the published daily sheet.
#[derive(Parser, Debug)]
#[command(name = "channel-crossings", version)]
pub struct Cli {
    /// Logging level
    #[arg(
        long,
        global = true,
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and validate the source sheet and print diagnostics
    Load {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Rebuild every table and write them to the output directory
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory the tables and summary are written to
        #[arg(long, env = "CROSSINGS_OUTPUT_DIR", default_value = "outputs")]
        out_dir: PathBuf,

        /// Rows shown per table in the console preview
        #[arg(long, default_value_t = 3)]
        preview_rows: usize,

        /// Skip the console previews
        #[arg(long)]
        no_preview: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory scanned for the source CSV
    #[arg(long, env = "CROSSINGS_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Explicit source file; skips discovery
    #[arg(long)]
    pub file: Option<PathBuf>,
}
