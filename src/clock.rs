// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! All things time-related.

pub use chrono::{DateTime, Utc};
use chrono::SecondsFormat;

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;

    /// The current time as a record timestamp.
    ///
    /// See [`timestamp()`] for the format.
    fn timestamp(&self) -> String {
        timestamp(&self.now())
    }
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Formats `datetime` the way the API expects record timestamps: ISO 8601,
/// in UTC, with millisecond precision and a `Z` suffix.
///
/// # Examples
///
/// ```
/// use skypost::clock::{DateTime, Utc, timestamp};
/// let datetime = DateTime::parse_from_rfc3339("2025-05-23T10:13:00.123456-07:00")
///     .unwrap()
///     .with_timezone(&Utc);
/// assert_eq!(timestamp(&datetime), "2025-05-23T17:13:00.123Z");
/// ```
pub fn timestamp(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}
