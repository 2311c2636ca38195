//! Per-identity time series supplied by the tracking data source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{IdentityId, Timestamp};

/// One observation of a tracked metric. Read-only to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub identity: IdentityId,
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Source of time series, keyed by identity.
pub trait SeriesProvider {
    /// All identities with data, sorted and without duplicates.
    fn identities(&self) -> Vec<IdentityId>;

    /// Points for one identity, ordered by timestamp. Empty if unknown.
    fn series(&self, identity: &IdentityId) -> Vec<TimeSeriesPoint>;

    /// Whether the provider has any data for `identity`.
    fn contains(&self, identity: &IdentityId) -> bool {
        self.identities().contains(identity)
    }
}

/// Series held in memory, grouped by identity on construction.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeries {
    by_identity: BTreeMap<IdentityId, Vec<TimeSeriesPoint>>,
}

impl InMemorySeries {
    /// Groups points by identity. Within a group, points are stably sorted by timestamp.
    pub fn new(points: impl IntoIterator<Item = TimeSeriesPoint>) -> Self {
        let mut by_identity: BTreeMap<IdentityId, Vec<TimeSeriesPoint>> = BTreeMap::new();
        for point in points {
            by_identity
                .entry(point.identity.clone())
                .or_default()
                .push(point);
        }
        for points in by_identity.values_mut() {
            points.sort_by_key(|p| p.timestamp);
        }
        Self { by_identity }
    }

    /// Total number of points across identities.
    pub fn point_count(&self) -> usize {
        self.by_identity.values().map(Vec::len).sum()
    }
}

impl FromIterator<TimeSeriesPoint> for InMemorySeries {
    fn from_iter<I: IntoIterator<Item = TimeSeriesPoint>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl SeriesProvider for InMemorySeries {
    fn identities(&self) -> Vec<IdentityId> {
        self.by_identity.keys().cloned().collect()
    }

    fn series(&self, identity: &IdentityId) -> Vec<TimeSeriesPoint> {
        self.by_identity.get(identity).cloned().unwrap_or_default()
    }

    fn contains(&self, identity: &IdentityId) -> bool {
        self.by_identity.contains_key(identity)
    }
}
