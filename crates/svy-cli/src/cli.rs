//! CLI argument definitions for the survey exporter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "svy-export",
    version,
    about = "Survey Dataset Exporter - Convert survey responses to a Stata XML dataset",
    long_about = "Convert a buffered set of survey responses into a strictly-typed,\n\
                  labeled Stata XML dataset: per-column type inference, letter-code\n\
                  and timestamp recoding, and value-label dictionaries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export responses to a Stata XML dataset.
    Export(ExportArgs),

    /// Show the derived fieldmap without writing output.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Path to the survey definition (JSON).
    #[arg(value_name = "SURVEY_JSON")]
    pub survey: PathBuf,

    /// Path to the response set (CSV, one row per respondent).
    #[arg(value_name = "RESPONSES_CSV")]
    pub responses: PathBuf,

    /// Output path for the dataset (default: <RESPONSES_CSV>.xml).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Run the full pipeline and report without writing the dataset.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Path to the survey definition (JSON).
    #[arg(value_name = "SURVEY_JSON")]
    pub survey: PathBuf,

    /// Path to the response set (CSV); its header selects the columns.
    #[arg(value_name = "RESPONSES_CSV")]
    pub responses: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
