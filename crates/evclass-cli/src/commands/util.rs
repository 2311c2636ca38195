//! Shared utilities for CLI commands.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::TimeDelta;

use evclass_core::{InMemorySeries, Interval};

use crate::cli::SeriesArgs;
use crate::{Config, series_file};

/// Picks the series file from `--series`, falling back to the config.
pub fn resolve_series_path(args: &SeriesArgs, config: &Config) -> Result<PathBuf> {
    match args.series.as_ref().or(config.series_path.as_ref()) {
        Some(path) => Ok(path.clone()),
        None => bail!("no series file given; pass --series or set series_path in the config"),
    }
}

/// Resolves and loads the series file for a command.
pub fn load_series(args: &SeriesArgs, config: &Config) -> Result<InMemorySeries> {
    let path = resolve_series_path(args, config)?;
    series_file::load(&path)
}

/// Formats a signed duration as `1h02m03s`, `2m03s` or `3s`, truncated to whole seconds.
pub fn format_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{sign}{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds:02}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Writes the interval table, one numbered row per interval. Rows whose end
/// precedes their start are marked `[reversed]`.
pub fn write_table<W: Write>(writer: &mut W, intervals: &[Interval]) -> io::Result<()> {
    if intervals.is_empty() {
        return writeln!(writer, "No intervals recorded.");
    }

    writeln!(writer, "Intervals ({}):", intervals.len())?;
    for (index, interval) in intervals.iter().enumerate() {
        let flag = if interval.is_reversed() { " [reversed]" } else { "" };
        writeln!(
            writer,
            "{:>3}. {} {} -> {} ({}){flag}",
            index + 1,
            interval.identity,
            interval.start,
            interval.end,
            format_duration(interval.duration())
        )?;
    }
    Ok(())
}
