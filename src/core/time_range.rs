use std::fmt::{Debug, Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{Error, ErrorKind};

/// Closed interval of UTC instants.
///
/// The default value stands for «unset». Bounds are not checked for `start <= end`.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
#[must_use]
pub struct TimeRange {
    /// Inclusive.
    pub start: DateTime<Utc>,

    /// Inclusive.
    pub end: DateTime<Utc>,
}

impl Debug for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("unset");
        }
        write!(
            f,
            "{}..={}",
            self.start.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.end.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )
    }
}

impl TimeRange {
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse the begin and end timestamps in RFC 3339, normalizing them to UTC.
    pub fn parse(start: &str, end: &str) -> Result<Self, Error> {
        const OP: &str = "parse-time-range";

        let start = DateTime::parse_from_rfc3339(start).map_err(|error| {
            Error::new(OP)
                .with_kind(ErrorKind::InvalidArgument)
                .with_message("Invalid begin timestamp")
                .with_source(error)
        })?;
        let end = DateTime::parse_from_rfc3339(end).map_err(|error| {
            Error::new(OP)
                .with_kind(ErrorKind::InvalidArgument)
                .with_message("Invalid end timestamp")
                .with_source(error)
        })?;
        Ok(Self::new(start.to_utc(), end.to_utc()))
    }

    #[must_use]
    pub fn contains(self, other: DateTime<Utc>) -> bool {
        (self.start <= other) && (other <= self.end)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::default()
    }
}
