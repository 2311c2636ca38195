//! Labeled intervals accumulated during a classification session.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::types::{IdentityId, Timestamp};

/// A classified time period for one individual.
///
/// Immutable once stored; the only way out of the store is undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub identity: IdentityId,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    pub const fn new(identity: IdentityId, start: Timestamp, end: Timestamp) -> Self {
        Self {
            identity,
            start,
            end,
        }
    }

    /// Signed length. Negative when the end was clicked before the start.
    pub fn duration(&self) -> TimeDelta {
        self.start.until(self.end)
    }

    /// True when `start` is later than `end`.
    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

/// Insertion-ordered sequence of intervals across all identities.
///
/// Identity is only a field; the store is not partitioned by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalStore {
    intervals: Vec<Interval>,
}

impl IntervalStore {
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Appends at the end.
    pub fn append(&mut self, interval: Interval) {
        tracing::debug!(
            identity = %interval.identity,
            start = %interval.start,
            end = %interval.end,
            position = self.intervals.len(),
            "interval appended"
        );
        self.intervals.push(interval);
    }

    /// Removes the most recently appended interval for `identity`.
    ///
    /// Entries for other identities keep their relative order. Returns
    /// `None` (and changes nothing) when the identity has no entries.
    pub fn undo_last(&mut self, identity: &IdentityId) -> Option<Interval> {
        let Some(index) = self
            .intervals
            .iter()
            .rposition(|interval| &interval.identity == identity)
        else {
            tracing::debug!(%identity, "nothing to undo");
            return None;
        };

        let removed = self.intervals.remove(index);
        tracing::debug!(%identity, position = index, "interval undone");
        Some(removed)
    }

    /// The full table in insertion order, unfiltered.
    pub fn list_all(&self) -> &[Interval] {
        &self.intervals
    }

    /// Entries for one identity, in insertion order.
    pub fn for_identity<'a>(
        &'a self,
        identity: &'a IdentityId,
    ) -> impl Iterator<Item = &'a Interval> + 'a {
        self.intervals
            .iter()
            .filter(move |interval| &interval.identity == identity)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
