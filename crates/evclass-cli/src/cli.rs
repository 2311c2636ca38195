//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Interactive event classification for tracking data.
///
/// Mark start and end points on an individual's time series and collect
/// them as labeled intervals.
#[derive(Debug, Parser)]
#[command(name = "evclass", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where to read time-series data from.
#[derive(Debug, Clone, Args)]
pub struct SeriesArgs {
    /// JSON Lines series file (overrides `series_path` from config).
    #[arg(long)]
    pub series: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List identities present in the series file.
    Identities {
        #[command(flatten)]
        source: SeriesArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the time series of one identity.
    Series {
        /// The identity to show.
        identity: String,

        #[command(flatten)]
        source: SeriesArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a classification session.
    ///
    /// Reads one command per line (select, click, reset, undo, table, series,
    /// status, help, quit) and prints the interval table after each change.
    Session {
        #[command(flatten)]
        source: SeriesArgs,

        /// Read commands from this file instead of stdin.
        #[arg(long)]
        script: Option<PathBuf>,

        /// Print the final table as JSON.
        #[arg(long)]
        json: bool,

        /// Refuse selections whose end precedes the start.
        #[arg(long)]
        reject_reversed: bool,

        /// Allow selecting identities that have no series data.
        #[arg(long)]
        allow_unknown: bool,
    },
}
