//! CLI argument definitions for the play-by-play reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pbp",
    version,
    about = "Reconcile play-by-play events with shift charts",
    long_about = "Reconcile downloaded play-by-play and shift chart payloads into one\n\
                  event table per game, with normalized coordinates, participant roles\n\
                  and the players on the ice for every event."
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

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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
    /// Reconcile every game found in a directory of downloaded payloads.
    Reconcile(ReconcileArgs),
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Directory containing `<game>.pbp.json` and `<game>.shifts.json` files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Roster CSV used to classify skaters and goalies.
    #[arg(long = "roster", value_name = "CSV")]
    pub roster: PathBuf,

    /// Output directory for per-game CSV files (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON file overriding any subset of the reconciliation options.
    #[arg(long = "config", value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Fail on event types outside the canonical taxonomy.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Reconcile and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
