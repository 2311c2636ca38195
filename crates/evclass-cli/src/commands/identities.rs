//! Lists the identities available in a series file.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use evclass_core::SeriesProvider;

#[derive(Debug, Serialize)]
struct IdentitySummary {
    identity: String,
    points: usize,
}

pub fn run<W: Write, P: SeriesProvider>(writer: &mut W, provider: &P, json: bool) -> Result<()> {
    let summaries: Vec<IdentitySummary> = provider
        .identities()
        .into_iter()
        .map(|identity| IdentitySummary {
            points: provider.series(&identity).len(),
            identity: identity.into(),
        })
        .collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summaries)?)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(writer, "No identities found.")?;
        return Ok(());
    }

    for summary in &summaries {
        writeln!(writer, "{} ({} points)", summary.identity, summary.points)?;
    }
    Ok(())
}
