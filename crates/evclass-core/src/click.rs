//! Pairing of consecutive plot clicks into start/end spans.
//!
//! The pending selection is a two-state machine. Transitions are pure
//! functions on [`PendingSelection`]; [`ClickBuffer`] is the owning wrapper
//! a session holds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, TimestampError};

/// The x-coordinate of a click as delivered by the plot surface.
///
/// Numeric axes report a number, date axes usually report formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XPosition {
    Number(f64),
    Text(String),
}

impl fmt::Display for XPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A click on the time-series plot. Only the x-position is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub x: XPosition,
}

impl ClickEvent {
    /// A click at a numeric x-coordinate (epoch seconds).
    pub const fn at(x: f64) -> Self {
        Self {
            x: XPosition::Number(x),
        }
    }

    /// A click carrying raw text from the plot surface.
    pub fn text(x: impl Into<String>) -> Self {
        Self {
            x: XPosition::Text(x.into()),
        }
    }

    /// Interprets the x-position as a timestamp.
    pub fn timestamp(&self) -> Result<Timestamp, TimestampError> {
        match &self.x {
            XPosition::Number(x) => Timestamp::from_epoch_seconds(*x),
            XPosition::Text(s) => Timestamp::parse(s),
        }
    }
}

/// A start/end pair produced by two clicks, not yet attributed to an identity.
///
/// `start` may be later than `end`; no ordering is imposed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Result of feeding one click to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was stored as the start of a new selection.
    Pending { start: Timestamp },
    /// The click completed the pending selection.
    Completed(Span),
}

/// At most one buffered click awaiting its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingSelection {
    #[default]
    Empty,
    StartSet(Timestamp),
}

impl PendingSelection {
    /// Next state after a click at `ts`, plus what the click produced.
    #[must_use]
    pub const fn on_click(self, ts: Timestamp) -> (Self, ClickOutcome) {
        match self {
            Self::Empty => (Self::StartSet(ts), ClickOutcome::Pending { start: ts }),
            Self::StartSet(start) => (
                Self::Empty,
                ClickOutcome::Completed(Span { start, end: ts }),
            ),
        }
    }

    /// Next state after an explicit reset. Always empty.
    #[must_use]
    pub const fn reset(self) -> Self {
        Self::Empty
    }

    /// The buffered start, if any.
    pub const fn start(self) -> Option<Timestamp> {
        match self {
            Self::Empty => None,
            Self::StartSet(start) => Some(start),
        }
    }
}

/// Owns the pending selection for one session.
#[derive(Debug, Default)]
pub struct ClickBuffer {
    state: PendingSelection,
}

impl ClickBuffer {
    pub const fn new() -> Self {
        Self {
            state: PendingSelection::Empty,
        }
    }

    /// Feeds one click. Clicks must arrive one at a time, in order.
    pub fn on_click(&mut self, ts: Timestamp) -> ClickOutcome {
        let (next, outcome) = self.state.on_click(ts);
        self.state = next;
        match outcome {
            ClickOutcome::Pending { start } => tracing::debug!(%start, "selection start set"),
            ClickOutcome::Completed(span) => {
                tracing::debug!(start = %span.start, end = %span.end, "selection completed");
            }
        }
        outcome
    }

    /// Drops the pending start, returning it. No-op when nothing is pending.
    pub fn reset(&mut self) -> Option<Timestamp> {
        let discarded = self.state.start();
        self.state = self.state.reset();
        if let Some(start) = discarded {
            tracing::debug!(%start, "pending selection discarded");
        }
        discarded
    }

    /// Current state of the buffer.
    pub const fn state(&self) -> PendingSelection {
        self.state
    }

    /// The pending start timestamp, if the first click has been seen.
    pub const fn pending(&self) -> Option<Timestamp> {
        self.state.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: f64) -> Timestamp {
        Timestamp::from_epoch_seconds(secs).unwrap()
    }

    #[test]
    fn first_click_sets_start() {
        let mut buffer = ClickBuffer::new();
        assert_eq!(
            buffer.on_click(ts(10.0)),
            ClickOutcome::Pending { start: ts(10.0) }
        );
        assert_eq!(buffer.state(), PendingSelection::StartSet(ts(10.0)));
    }

    #[test]
    fn second_click_completes_and_empties() {
        let mut buffer = ClickBuffer::new();
        buffer.on_click(ts(10.0));
        assert_eq!(
            buffer.on_click(ts(20.0)),
            ClickOutcome::Completed(Span {
                start: ts(10.0),
                end: ts(20.0)
            })
        );
        assert_eq!(buffer.pending(), None);
    }

    #[test]
    fn reversed_clicks_are_paired_as_given() {
        let mut buffer = ClickBuffer::new();
        buffer.on_click(ts(30.0));
        let ClickOutcome::Completed(span) = buffer.on_click(ts(5.0)) else {
            panic!("expected a completed span");
        };
        assert_eq!(span.start, ts(30.0));
        assert_eq!(span.end, ts(5.0));
    }

    #[test]
    fn n_clicks_yield_half_as_many_spans_in_order() {
        let mut buffer = ClickBuffer::new();
        let spans: Vec<Span> = (0..7)
            .map(|i| buffer.on_click(ts(f64::from(i))))
            .filter_map(|outcome| match outcome {
                ClickOutcome::Completed(span) => Some(span),
                ClickOutcome::Pending { .. } => None,
            })
            .collect();

        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans.iter().map(|s| (s.start, s.end)).collect::<Vec<_>>(),
            vec![(ts(0.0), ts(1.0)), (ts(2.0), ts(3.0)), (ts(4.0), ts(5.0))]
        );
        assert_eq!(buffer.pending(), Some(ts(6.0)));
    }

    #[test]
    fn reset_discards_pending_start() {
        let mut buffer = ClickBuffer::new();
        buffer.on_click(ts(5.0));
        assert_eq!(buffer.reset(), Some(ts(5.0)));
        assert_eq!(buffer.state(), PendingSelection::Empty);

        // The discarded start is not paired with the next click.
        assert_eq!(
            buffer.on_click(ts(7.0)),
            ClickOutcome::Pending { start: ts(7.0) }
        );
    }

    #[test]
    fn reset_is_idempotent_when_empty() {
        let mut buffer = ClickBuffer::new();
        assert_eq!(buffer.reset(), None);
        assert_eq!(buffer.reset(), None);
        assert_eq!(buffer.state(), PendingSelection::Empty);
    }

    #[test]
    fn pure_transitions_do_not_touch_the_input_state() {
        let state = PendingSelection::StartSet(ts(1.0));
        let (next, _) = state.on_click(ts(2.0));
        assert_eq!(state, PendingSelection::StartSet(ts(1.0)));
        assert_eq!(next, PendingSelection::Empty);
        assert_eq!(state.reset(), PendingSelection::Empty);
    }

    #[test]
    fn click_event_timestamp_conversion() {
        assert_eq!(ClickEvent::at(10.0).timestamp().unwrap(), ts(10.0));
        assert_eq!(
            ClickEvent::text("1970-01-01 00:00:10").timestamp().unwrap(),
            ts(10.0)
        );
        assert!(ClickEvent::text("not a time").timestamp().is_err());
        assert!(ClickEvent::at(f64::NAN).timestamp().is_err());
    }

    #[test]
    fn click_event_deserializes_number_or_text() {
        let numeric: ClickEvent = serde_json::from_str(r#"{"x": 12.5}"#).unwrap();
        assert_eq!(numeric, ClickEvent::at(12.5));
        let text: ClickEvent = serde_json::from_str(r#"{"x": "2021-06-01"}"#).unwrap();
        assert_eq!(text, ClickEvent::text("2021-06-01"));
    }
}
