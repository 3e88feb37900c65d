//! Timestamps and injectable clocks.
//!
//! Every [`Outcome`](crate::Outcome) records when it was produced. The reading
//! comes from a [`Clock`], which defaults to [`SystemClock`] (microsecond
//! resolution wall clock) and can be swapped for a deterministic one in tests.
//!
//! ```
//! use actionpack::clock::{Clock, SystemClock, Timestamp};
//!
//! let before = SystemClock.now();
//! let after = SystemClock.now();
//! assert!(after >= before);
//!
//! // Any closure returning a Timestamp is a clock too
//! let fixed = || Timestamp::from_micros(42);
//! assert_eq!(fixed.now().as_micros(), 42);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};

/// Microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from a raw microsecond count.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// Raw microsecond count since the Unix epoch.
    pub const fn as_micros(self) -> i64 {
        self.0
    }

    /// Convert into a UTC date-time.
    ///
    /// Returns `None` if the value lies outside the range chrono can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_micros())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}us", self.0),
        }
    }
}

/// Source of timestamps for produced outcomes.
pub trait Clock: Send + Sync {
    /// The current reading.
    fn now(&self) -> Timestamp;
}

/// Wall clock with microsecond resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from(Utc::now())
    }
}

impl<F> Clock for F
where
    F: Fn() -> Timestamp + Send + Sync,
{
    fn now(&self) -> Timestamp {
        self()
    }
}
