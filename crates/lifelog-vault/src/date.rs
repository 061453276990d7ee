//! Calendar date keys for diary entries.
//!
//! Entries are keyed by their date in canonical `YYYY-MM-DD` form. Because
//! the form is zero-padded, lexicographic order of the stored text equals
//! chronological order, which the range scans rely on.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::VaultError;

/// `strftime` pattern of the canonical key.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of `YYYY-MM-DD`.
const DATE_LEN: usize = 10;

/// Years that fit the four-digit key. `chrono` formats anything outside
/// this range with a sign or a fifth digit.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// A calendar date used as an entry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryDate(NaiveDate);

impl EntryDate {
    /// Build a date from its components.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidDate`] if the components do not form a
    /// real calendar date (e.g. February 30th) or the year is outside
    /// `0..=9999`.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, VaultError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| VaultError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
            .and_then(Self::try_from)
    }

    /// Year component.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month component (1–12).
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day-of-month component (1–31).
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// The underlying `chrono` date.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl TryFrom<NaiveDate> for EntryDate {
    type Error = VaultError;

    /// # Errors
    ///
    /// Returns [`VaultError::InvalidDate`] if the year has no four-digit
    /// `YYYY-MM-DD` form.
    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        if YEAR_RANGE.contains(&date.year()) {
            Ok(Self(date))
        } else {
            Err(VaultError::InvalidDate(date.to_string()))
        }
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for EntryDate {
    type Err = VaultError;

    /// Parse strictly: exactly `YYYY-MM-DD`, zero-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DATE_LEN {
            return Err(VaultError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| VaultError::InvalidDate(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl ToSql for EntryDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for EntryDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: VaultError| FromSqlError::Other(Box::new(e)))
    }
}

/// `LIKE` pattern matching every date key of one month, e.g. `2024-03-%`.
pub(crate) fn month_pattern(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}-%")
}
