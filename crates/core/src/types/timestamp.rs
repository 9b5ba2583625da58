//! Traffic timestamps and their Indonesian display formats.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Offset of Western Indonesia Time (WIB, UTC+7) in seconds.
pub const WIB_OFFSET_SECONDS: i32 = 7 * 60 * 60;

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Error parsing a backend timestamp.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid timestamp: {0}")]
pub struct TimestampError(pub String);

/// Wall-clock timestamp of a traffic record.
///
/// Naive backend values are kept as they are. Values carrying an offset are
/// converted to WIB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap a wall-clock date and time.
    #[must_use]
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Parse a backend timestamp.
    ///
    /// Accepts RFC 3339 (`2023-11-01T01:00:00Z`), naive ISO 8601 with optional
    /// fractional seconds (`2023-11-01T08:00:00.000`), the same with a space
    /// separator, and bare dates (midnight).
    ///
    /// # Errors
    ///
    /// Returns `TimestampError` if none of the formats match.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        let raw = raw.trim();

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self(to_wib(with_offset)));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self(naive));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
            .ok_or_else(|| TimestampError(raw.to_string()))
    }

    /// The underlying wall-clock value.
    #[must_use]
    pub const fn naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date of the record.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// Long Indonesian date, e.g. `1 November 2023`.
    #[must_use]
    pub fn long_date_id(&self) -> String {
        long_date_id(self.0.date())
    }

    /// Time of day as `HH:MM:SS`.
    #[must_use]
    pub fn time_of_day(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Format a date in the long Indonesian form, e.g. `17 Agustus 2023`.
#[must_use]
pub fn long_date_id(date: NaiveDate) -> String {
    let month = MONTHS_ID
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{} {} {}", date.day(), month, date.year())
}

fn to_wib(value: DateTime<FixedOffset>) -> NaiveDateTime {
    FixedOffset::east_opt(WIB_OFFSET_SECONDS).map_or_else(
        || value.naive_utc(),
        |wib| value.with_timezone(&wib).naive_local(),
    )
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
