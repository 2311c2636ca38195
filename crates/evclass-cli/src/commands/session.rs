//! Interactive classification session.
//!
//! Reads one command per line and applies it to a single session:
//!
//! ```text
//! select R3
//! click 2021-06-01 12:00:00
//! click 1622556000
//! undo
//! ```
//!
//! The interval table is re-rendered after every command that changes it.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use evclass_core::{
    ClickEvent, Command, IdentityId, OrderPolicy, Outcome, SeriesProvider, SessionController,
    SessionOptions,
};

use super::series::write_points;
use super::util::write_table;
use crate::Config;

const HELP: &str = "\
Commands:
  select <identity>  switch to an individual
  click <x>          mark a start or end (epoch seconds or a date/time)
  reset              discard a half-finished selection
  undo               remove the latest interval of the current identity
  table              show all intervals
  series             show the current identity's time series
  status             show identity, pending start and interval count
  help               show this message
  quit               stop reading commands
";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    Apply(Command),
    Table,
    Series,
    Status,
    Help,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
fn parse_directive(line: &str) -> Result<Option<Directive>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    let directive = match (word, rest) {
        ("select", "") => bail!("usage: select <identity>"),
        ("select", id) => Directive::Apply(Command::SelectIdentity(IdentityId::new(id)?)),
        ("click", "") => bail!("usage: click <x>"),
        ("click", x) => {
            let click = x
                .parse::<f64>()
                .map_or_else(|_| ClickEvent::text(x), ClickEvent::at);
            Directive::Apply(Command::ClickAt(click))
        }
        ("reset", "") => Directive::Apply(Command::Reset),
        ("undo", "") => Directive::Apply(Command::UndoLast),
        ("table", "") => Directive::Table,
        ("series", "") => Directive::Series,
        ("status", "") => Directive::Status,
        ("help", "") => Directive::Help,
        ("quit" | "exit", "") => Directive::Quit,
        ("reset" | "undo" | "table" | "series" | "status" | "help" | "quit" | "exit", _) => {
            bail!("{word} takes no arguments")
        }
        _ => bail!("unknown command: {word} (try `help`)"),
    };
    Ok(Some(directive))
}

/// Session options from config, with command-line overrides applied.
pub const fn options(config: &Config, reject_reversed: bool, allow_unknown: bool) -> SessionOptions {
    let mut options = config.session_options();
    if reject_reversed {
        options.order = OrderPolicy::Reject;
    }
    if allow_unknown {
        options.require_known_identity = false;
    }
    options
}

/// Runs the command loop until input ends or `quit`.
///
/// With `json`, per-command feedback is suppressed and only the final table
/// is written, as a JSON array. Lines that are not valid UTF-8 are decoded
/// lossily and handled like any other bad input.
pub fn run<R, W, P>(
    mut reader: R,
    writer: &mut W,
    session: &mut SessionController<P>,
    json: bool,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    P: SeriesProvider,
{
    let mut quiet = io::sink();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .context("failed to read command input")?;
        if read == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let keep_going = if json {
            step(&mut quiet, session, &line)?
        } else {
            step(writer, session, &line)?
        };
        if !keep_going {
            break;
        }
    }

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(session.table())?)?;
    } else {
        writeln!(writer, "Final table:")?;
        write_table(writer, session.table())?;
    }
    Ok(())
}

/// Handles one line. Returns `false` when the loop should stop.
fn step<W: Write, P: SeriesProvider>(
    writer: &mut W,
    session: &mut SessionController<P>,
    line: &str,
) -> Result<bool> {
    let directive = match parse_directive(line) {
        Ok(Some(directive)) => directive,
        Ok(None) => return Ok(true),
        Err(err) => {
            tracing::warn!(%line, error = %err, "ignored unparseable input");
            writeln!(writer, "error: {err}")?;
            return Ok(true);
        }
    };

    match directive {
        Directive::Apply(command) => match session.apply(command) {
            Ok(outcome) => {
                write_outcome(writer, session, &outcome)?;
                if outcome.table_changed() {
                    write_table(writer, session.table())?;
                }
            }
            Err(err) => writeln!(writer, "error: {err}")?,
        },
        Directive::Table => write_table(writer, session.table())?,
        Directive::Series => match session.active_identity() {
            None => writeln!(writer, "No identity selected.")?,
            Some(identity) => {
                let points = session.active_series();
                if points.is_empty() {
                    writeln!(writer, "No points for {identity}.")?;
                } else {
                    write_points(writer, &points)?;
                }
            }
        },
        Directive::Status => write_status(writer, session)?,
        Directive::Help => writer.write_all(HELP.as_bytes())?,
        Directive::Quit => return Ok(false),
    }
    Ok(true)
}

fn write_outcome<W: Write, P: SeriesProvider>(
    writer: &mut W,
    session: &SessionController<P>,
    outcome: &Outcome,
) -> io::Result<()> {
    match outcome {
        Outcome::Selected { identity } => writeln!(
            writer,
            "Selected {identity} ({} points)",
            session.active_series().len()
        ),
        Outcome::StartPending { start } => {
            writeln!(writer, "Start set at {start}; click again to set the end")
        }
        Outcome::Appended(interval) => writeln!(
            writer,
            "Added {} {} -> {}",
            interval.identity, interval.start, interval.end
        ),
        Outcome::Cleared {
            discarded: Some(start),
        } => writeln!(writer, "Discarded pending start {start}"),
        Outcome::Cleared { discarded: None } => writeln!(writer, "Nothing pending"),
        Outcome::Undone(Some(interval)) => writeln!(
            writer,
            "Removed {} {} -> {}",
            interval.identity, interval.start, interval.end
        ),
        Outcome::Undone(None) => match session.active_identity() {
            Some(identity) => writeln!(writer, "Nothing to undo for {identity}"),
            None => writeln!(writer, "Nothing to undo: no identity selected"),
        },
    }
}

fn write_status<W: Write, P: SeriesProvider>(
    writer: &mut W,
    session: &SessionController<P>,
) -> io::Result<()> {
    match session.active_identity() {
        Some(identity) => writeln!(writer, "Identity: {identity}")?,
        None => writeln!(writer, "Identity: none")?,
    }
    match session.pending() {
        Some(start) => writeln!(writer, "Pending start: {start}")?,
        None => writeln!(writer, "Pending start: none")?,
    }
    writeln!(writer, "Intervals: {}", session.table().len())
}
