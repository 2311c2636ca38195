//! Classification session: wires clicks and commands to the buffer, store and selector.
//!
//! A [`SessionController`] owns all mutable state of one operator session.
//! Commands are applied one at a time; each either completes its full
//! transition or fails without changing anything.
//!
//! # Identity binding
//!
//! A completed pair is labeled with the identity active when the *second*
//! click arrives. Switching identity between the two clicks therefore moves
//! the whole selection to the new identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::click::{ClickBuffer, ClickEvent, ClickOutcome};
use crate::selector::IdentitySelector;
use crate::series::{SeriesProvider, TimeSeriesPoint};
use crate::store::{Interval, IntervalStore};
use crate::types::{IdentityId, Timestamp, TimestampError};

/// Errors from a single session command. State is unchanged when one is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// The click's x-position could not be read as a timestamp.
    #[error("malformed click at x={input}: {source}")]
    MalformedClick {
        input: String,
        #[source]
        source: TimestampError,
    },

    /// A click arrived before any identity was selected.
    #[error("no identity selected")]
    NoIdentitySelected,

    /// The identity is not present in the time-series data.
    #[error("unknown identity: {0}")]
    UnknownIdentity(IdentityId),

    /// The completing click precedes the pending start and the session rejects that.
    #[error("interval end {end} precedes start {start}")]
    ReversedInterval { start: Timestamp, end: Timestamp },
}

/// How to treat a pair whose end is earlier than its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Store the pair exactly as clicked.
    #[default]
    Permissive,
    /// Refuse the completing click; the pending start is kept.
    Reject,
}

/// Session behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub order: OrderPolicy,
    /// Refuse to select identities the series provider does not know.
    pub require_known_identity: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            order: OrderPolicy::Permissive,
            require_known_identity: true,
        }
    }
}

/// Operator commands accepted by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectIdentity(IdentityId),
    ClickAt(ClickEvent),
    Reset,
    UndoLast,
}

/// What a successfully applied command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The active identity changed.
    Selected { identity: IdentityId },
    /// First click of a pair registered.
    StartPending { start: Timestamp },
    /// Second click completed a pair; the interval is now in the table.
    Appended(Interval),
    /// Pending selection cleared; carries the dropped start, if there was one.
    Cleared { discarded: Option<Timestamp> },
    /// Undo ran; `None` when the active identity had nothing to remove.
    Undone(Option<Interval>),
}

impl Outcome {
    /// Whether the interval table differs from before the command.
    pub const fn table_changed(&self) -> bool {
        matches!(self, Self::Appended(_) | Self::Undone(Some(_)))
    }
}

/// State of one classification session.
#[derive(Debug)]
pub struct SessionController<P> {
    buffer: ClickBuffer,
    store: IntervalStore,
    selector: IdentitySelector<P>,
    options: SessionOptions,
    revision: u64,
}

impl<P: SeriesProvider> SessionController<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, SessionOptions::default())
    }

    pub const fn with_options(provider: P, options: SessionOptions) -> Self {
        Self {
            buffer: ClickBuffer::new(),
            store: IntervalStore::new(),
            selector: IdentitySelector::new(provider),
            options,
            revision: 0,
        }
    }

    /// Applies one command.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, SessionError> {
        match command {
            Command::SelectIdentity(identity) => self.select_identity(identity),
            Command::ClickAt(click) => self.click_at(&click),
            Command::Reset => Ok(self.reset()),
            Command::UndoLast => Ok(self.undo_last()),
        }
    }

    /// Changes the active identity. Pending clicks are left alone.
    pub fn select_identity(&mut self, identity: IdentityId) -> Result<Outcome, SessionError> {
        if self.options.require_known_identity && !self.selector.is_known(&identity) {
            tracing::warn!(%identity, "rejected unknown identity");
            return Err(SessionError::UnknownIdentity(identity));
        }
        self.selector.select(identity.clone());
        Ok(Outcome::Selected { identity })
    }

    /// Registers a click; every second click appends an interval.
    pub fn click_at(&mut self, click: &ClickEvent) -> Result<Outcome, SessionError> {
        let ts = click.timestamp().map_err(|source| {
            tracing::warn!(x = %click.x, %source, "rejected malformed click");
            SessionError::MalformedClick {
                input: click.x.to_string(),
                source,
            }
        })?;

        let Some(identity) = self.selector.active().cloned() else {
            tracing::warn!(%ts, "click with no identity selected");
            return Err(SessionError::NoIdentitySelected);
        };

        // Validate against the would-be transition before committing it.
        if let (_, ClickOutcome::Completed(span)) = self.buffer.state().on_click(ts) {
            if self.options.order == OrderPolicy::Reject && span.start > span.end {
                tracing::warn!(start = %span.start, end = %span.end, "rejected reversed interval");
                return Err(SessionError::ReversedInterval {
                    start: span.start,
                    end: span.end,
                });
            }
        }

        match self.buffer.on_click(ts) {
            ClickOutcome::Pending { start } => Ok(Outcome::StartPending { start }),
            ClickOutcome::Completed(span) => {
                let interval = Interval::new(identity, span.start, span.end);
                self.store.append(interval.clone());
                self.revision += 1;
                Ok(Outcome::Appended(interval))
            }
        }
    }

    /// Drops the pending start. Never touches stored intervals.
    pub fn reset(&mut self) -> Outcome {
        Outcome::Cleared {
            discarded: self.buffer.reset(),
        }
    }

    /// Removes the latest interval of the active identity, if any.
    ///
    /// With no identity selected there is nothing to match, so this is a no-op.
    pub fn undo_last(&mut self) -> Outcome {
        let removed = self
            .selector
            .active()
            .cloned()
            .and_then(|identity| self.store.undo_last(&identity));
        if removed.is_some() {
            self.revision += 1;
        }
        Outcome::Undone(removed)
    }

    /// The full interval table, all identities, insertion order.
    pub fn table(&self) -> &[Interval] {
        self.store.list_all()
    }

    /// Start of the half-finished selection, if any.
    pub const fn pending(&self) -> Option<Timestamp> {
        self.buffer.pending()
    }

    pub const fn active_identity(&self) -> Option<&IdentityId> {
        self.selector.active()
    }

    pub fn active_series(&self) -> Vec<TimeSeriesPoint> {
        self.selector.active_series()
    }

    /// Bumped on every table change, so views can detect staleness.
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}
