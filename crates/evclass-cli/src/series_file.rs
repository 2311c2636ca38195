//! JSON Lines time-series files.
//!
//! One record per line:
//!
//! ```text
//! {"identity": "R3", "timestamp": "2021-06-01T12:00:00Z", "value": 4.2}
//! {"identity": "R3", "timestamp": 1622552400, "value": 3.9}
//! ```
//!
//! Numeric timestamps are seconds since the Unix epoch.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use evclass_core::{IdentityId, InMemorySeries, TimeSeriesPoint, Timestamp};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    identity: IdentityId,
    timestamp: RawTimestamp,
    value: f64,
}

impl RawPoint {
    fn into_point(self) -> Result<TimeSeriesPoint> {
        let timestamp = match self.timestamp {
            RawTimestamp::Seconds(secs) => Timestamp::from_epoch_seconds(secs),
            RawTimestamp::Text(text) => Timestamp::parse(&text),
        }?;
        Ok(TimeSeriesPoint {
            identity: self.identity,
            timestamp,
            value: self.value,
        })
    }
}

/// Loads a series file from disk.
pub fn load(path: &Path) -> Result<InMemorySeries> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let series = read(BufReader::new(file), &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        points = series.point_count(),
        "loaded series file"
    );
    Ok(series)
}

/// Parses JSON Lines records. `origin` names the input in error messages.
pub fn read<R: BufRead>(reader: R, origin: &str) -> Result<InMemorySeries> {
    let mut points = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read {origin}:{line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let point = serde_json::from_str::<RawPoint>(&line)
            .map_err(anyhow::Error::from)
            .and_then(RawPoint::into_point)
            .with_context(|| format!("invalid series record at {origin}:{line_no}"))?;
        points.push(point);
    }
    Ok(InMemorySeries::new(points))
}
