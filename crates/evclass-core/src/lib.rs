//! Core domain logic for event classification.
//!
//! This crate contains the fundamental types and logic for:
//! - Click pairing: turning two consecutive plot clicks into a start/end span
//! - Interval storage: the ordered, identity-labeled table with per-identity undo
//! - Identity selection: which individual's time series is being classified
//! - Sessions: applying operator commands to all of the above

pub mod click;
pub mod selector;
pub mod series;
pub mod session;
pub mod store;
pub mod types;

pub use click::{ClickBuffer, ClickEvent, ClickOutcome, PendingSelection, Span, XPosition};
pub use selector::IdentitySelector;
pub use series::{InMemorySeries, SeriesProvider, TimeSeriesPoint};
pub use session::{Command, OrderPolicy, Outcome, SessionController, SessionError, SessionOptions};
pub use store::{Interval, IntervalStore};
pub use types::{IdentityId, Timestamp, TimestampError, ValidationError};
