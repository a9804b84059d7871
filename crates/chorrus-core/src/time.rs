use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Timestamps without an offset, as emitted by the backend for naive columns.
const NAIVE_DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");

/// Point in time reported by the backend (`created_at`, `completed_at`).
///
/// Accepts RFC 3339 as well as offset-less timestamps, which are taken as UTC.
/// Always serializes as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub OffsetDateTime);

impl Timestamp {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(datetime) = OffsetDateTime::parse(s, &Rfc3339) {
            return Ok(Self(datetime));
        }
        PrimitiveDateTime::parse(s, NAIVE_DATETIME_FORMAT)
            .map(|naive| Self(naive.assume_utc()))
            .map_err(|e| CoreError::invalid_date_time(format!("'{s}': {e}")))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timestamp::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Calendar date of a chore (`YYYY-MM-DD` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(pub Date);

impl DueDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn inner(&self) -> &Date {
        &self.0
    }

    /// Whether the chore was due strictly before `today`.
    pub fn is_before(&self, today: Date) -> bool {
        self.0 < today
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(DATE_FORMAT).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for DueDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Date::parse(s.trim(), DATE_FORMAT)
            .map(Self)
            .map_err(|e| CoreError::invalid_date(format!("'{s}': {e}")))
    }
}

impl Serialize for DueDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DueDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
