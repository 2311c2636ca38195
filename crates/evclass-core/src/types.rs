//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Errors converting a plot coordinate or text into a [`Timestamp`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimestampError {
    /// No input at all.
    #[error("timestamp is empty")]
    Empty,

    /// NaN or infinite coordinate.
    #[error("timestamp must be finite, got {0}")]
    NotFinite(f64),

    /// Finite, but outside the representable calendar range.
    #[error("timestamp out of range: {0} seconds since epoch")]
    OutOfRange(f64),

    /// Text that is neither a number nor a recognized date format.
    #[error("unrecognized timestamp: {0}")]
    Unparseable(String),
}

/// A validated identifier for a tracked individual.
///
/// Identities are opaque: the core never interprets them beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates a new identity after validation. Surrounding whitespace is dropped.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "identity" });
        }
        if trimmed.len() == id.len() {
            Ok(Self(id))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IdentityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentityId> for String {
    fn from(id: IdentityId) -> Self {
        id.0
    }
}

impl FromStr for IdentityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Largest magnitude accepted before handing off to chrono (~285,000 years).
const MAX_EPOCH_MILLIS: f64 = 9.0e15;

/// Naive formats emitted by plot libraries for date axes, interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A point in time on the x-axis of a time-series plot.
///
/// Millisecond precision, always UTC. Finer input is truncated toward the
/// past on every path (numbers, text, serde). Serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DateTime<Utc>", into = "DateTime<Utc>")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Converts a numeric x-coordinate, read as seconds since the Unix epoch.
    ///
    /// The value is snapped to the nearest microsecond to absorb f64 noise
    /// (`1.001 * 1000.0` is just under 1001), then floored to the millisecond.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is floored and bounds-checked before the cast"
    )]
    pub fn from_epoch_seconds(secs: f64) -> Result<Self, TimestampError> {
        if !secs.is_finite() {
            return Err(TimestampError::NotFinite(secs));
        }
        let millis = ((secs * 1_000_000.0).round() / 1000.0).floor();
        if millis.abs() >= MAX_EPOCH_MILLIS {
            return Err(TimestampError::OutOfRange(secs));
        }
        DateTime::from_timestamp_millis(millis as i64)
            .map(Self)
            .ok_or(TimestampError::OutOfRange(secs))
    }

    /// Parses epoch seconds, RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` or a bare date.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }

        if let Ok(secs) = s.parse::<f64>() {
            return Self::from_epoch_seconds(secs);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from(dt.with_timezone(&Utc)));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self::from(naive.and_utc()));
            }
        }

        if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::from(midnight.and_utc()));
        }

        Err(TimestampError::Unparseable(s.to_string()))
    }

    /// Seconds since the Unix epoch, with millisecond resolution.
    #[expect(
        clippy::cast_precision_loss,
        reason = "plot coordinates are f64; sub-millisecond loss is irrelevant"
    )]
    pub fn epoch_seconds(&self) -> f64 {
        self.0.timestamp_millis() as f64 / 1000.0
    }

    /// Signed time from `self` to `later`.
    pub fn until(&self, later: Self) -> TimeDelta {
        later.0.signed_duration_since(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        // Truncate to millisecond precision so equality matches what a plot can express.
        let millis = dt.timestamp_millis();
        Self(DateTime::from_timestamp_millis(millis).unwrap_or(dt))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rejects_empty() {
        assert!(IdentityId::new("").is_err());
        assert!(IdentityId::new("R3").is_ok());
    }

    #[test]
    fn identity_from_str_trims() {
        let id: IdentityId = "  R3 ".parse().unwrap();
        assert_eq!(id.as_str(), "R3");
        assert!("   ".parse::<IdentityId>().is_err());
    }

    #[test]
    fn identity_trimmed_on_every_path() {
        let from_serde: IdentityId = serde_json::from_str("\" R3\t\"").unwrap();
        let from_new = IdentityId::new(" R3").unwrap();
        let from_str: IdentityId = "R3 ".parse().unwrap();
        assert_eq!(from_serde, from_str);
        assert_eq!(from_new, from_str);
        assert!(serde_json::from_str::<IdentityId>("\"  \"").is_err());
    }

    #[test]
    fn identity_serde_roundtrip() {
        let id = IdentityId::new("R3").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"R3\"");
        let parsed: IdentityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn identity_serde_rejects_empty() {
        let result: Result<IdentityId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn timestamp_from_epoch_seconds() {
        let ts = Timestamp::from_epoch_seconds(10.0).unwrap();
        assert_eq!(ts.to_string(), "1970-01-01T00:00:10.000Z");
        assert_eq!(ts.epoch_seconds().to_bits(), 10.0_f64.to_bits());
    }

    #[test]
    fn timestamp_rejects_non_finite_and_huge() {
        assert_eq!(
            Timestamp::from_epoch_seconds(f64::NAN).unwrap_err().to_string(),
            "timestamp must be finite, got NaN"
        );
        assert!(matches!(
            Timestamp::from_epoch_seconds(f64::INFINITY),
            Err(TimestampError::NotFinite(_))
        ));
        assert!(matches!(
            Timestamp::from_epoch_seconds(1e300),
            Err(TimestampError::OutOfRange(_))
        ));
    }

    #[test]
    fn timestamp_parses_plot_formats() {
        let expected = Timestamp::parse("2021-06-01T12:30:00Z").unwrap();
        assert_eq!(Timestamp::parse("2021-06-01 12:30:00").unwrap(), expected);
        assert_eq!(Timestamp::parse("2021-06-01T12:30:00").unwrap(), expected);
        assert_eq!(
            Timestamp::parse("2021-06-01T14:30:00+02:00").unwrap(),
            expected
        );
        assert_eq!(
            Timestamp::parse(&expected.epoch_seconds().to_string()).unwrap(),
            expected
        );
        assert_eq!(
            Timestamp::parse("2021-06-01").unwrap().to_string(),
            "2021-06-01T00:00:00.000Z"
        );
    }

    #[test]
    fn timestamp_parse_errors() {
        assert_eq!(Timestamp::parse("  "), Err(TimestampError::Empty));
        assert!(matches!(
            Timestamp::parse("yesterday"),
            Err(TimestampError::Unparseable(_))
        ));
        assert!(matches!(
            Timestamp::parse("nan"),
            Err(TimestampError::NotFinite(_))
        ));
    }

    #[test]
    fn timestamp_until_is_signed() {
        let a = Timestamp::from_epoch_seconds(10.0).unwrap();
        let b = Timestamp::from_epoch_seconds(25.5).unwrap();
        assert_eq!(a.until(b), TimeDelta::milliseconds(15_500));
        assert_eq!(b.until(a), TimeDelta::milliseconds(-15_500));
    }

    #[test]
    fn sub_millisecond_input_truncates_the_same_everywhere() {
        let text = "2021-06-01T12:00:00.000400Z";
        let parsed = Timestamp::parse(text).unwrap();
        let deserialized: Timestamp = serde_json::from_str(&format!("\"{text}\"")).unwrap();
        assert_eq!(deserialized, parsed);
        assert_eq!(deserialized.to_string(), "2021-06-01T12:00:00.000Z");

        let numeric = Timestamp::from_epoch_seconds(0.0006).unwrap();
        assert_eq!(numeric, Timestamp::parse("1970-01-01T00:00:00.0006Z").unwrap());
        assert_eq!(numeric.to_string(), "1970-01-01T00:00:00.000Z");

        let before_epoch = Timestamp::from_epoch_seconds(-0.0006).unwrap();
        assert_eq!(
            before_epoch,
            Timestamp::parse("1969-12-31T23:59:59.9994Z").unwrap()
        );
        assert_eq!(before_epoch.to_string(), "1969-12-31T23:59:59.999Z");
    }

    #[test]
    fn epoch_seconds_round_trip_at_millisecond_steps() {
        for text in ["1970-01-01T00:00:01.001Z", "2021-06-01T12:00:00.123Z"] {
            let ts = Timestamp::parse(text).unwrap();
            assert_eq!(Timestamp::from_epoch_seconds(ts.epoch_seconds()).unwrap(), ts);
        }
    }

    #[test]
    fn timestamp_serde_is_rfc3339() {
        let ts = Timestamp::from_epoch_seconds(1.5).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }
}
