//! Prints the time series of one identity.

use std::io::Write;

use anyhow::{Result, bail};

use evclass_core::{IdentityId, SeriesProvider, TimeSeriesPoint};

pub fn run<W: Write, P: SeriesProvider>(
    writer: &mut W,
    provider: &P,
    identity: &IdentityId,
    json: bool,
) -> Result<()> {
    if !provider.contains(identity) {
        bail!("identity not found: {identity}");
    }
    let points = provider.series(identity);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&points)?)?;
        return Ok(());
    }

    write_points(writer, &points)?;
    Ok(())
}

/// Writes one `timestamp  value` row per point.
pub fn write_points<W: Write>(writer: &mut W, points: &[TimeSeriesPoint]) -> std::io::Result<()> {
    for point in points {
        writeln!(writer, "{}  {}", point.timestamp, point.value)?;
    }
    Ok(())
}
