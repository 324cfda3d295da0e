//! French-locale date normalization.
//!
//! Profile pages render the registration date as `"15 mars 2022"`. This module
//! turns that text into a [`CalendarDate`], whose canonical rendering is the
//! zero-padded `MM/DD/YYYY` form written to the CSV snapshot.

use crate::error::DateError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical textual rendering of a [`CalendarDate`].
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y";

/// French month names in calendar order; index + 1 is the month number.
const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// A validated calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date, rejecting combinations that do not exist (31 April, 29 February 2023...).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(CalendarDate)
            .ok_or(DateError::InvalidDate { year, month, day })
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

/// Parses the canonical `MM/DD/YYYY` rendering back.
impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), CANONICAL_FORMAT)
            .map(CalendarDate)
            .map_err(|_| DateError::Malformed(s.to_string()))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Look up a French month name, ignoring case. Returns the month number (1-12).
pub fn french_month(name: &str) -> Option<u32> {
    let lowered = name.to_lowercase();
    FRENCH_MONTHS
        .iter()
        .position(|m| *m == lowered)
        .map(|idx| idx as u32 + 1)
}

/// Normalize `"<day> <month name> <year>"` into a [`CalendarDate`].
///
/// # Errors
///
/// - [`DateError::Malformed`] if the text is not exactly three tokens or the
///   day/year are not numbers
/// - [`DateError::UnknownMonth`] if the month name is not French
/// - [`DateError::InvalidDate`] if the day does not exist in that month
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_french_date("15 mars 2022")?.to_string(), "03/15/2022");
/// ```
pub fn parse_french_date(text: &str) -> Result<CalendarDate, DateError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let &[day, month_name, year] = tokens.as_slice() else {
        return Err(DateError::Malformed(text.to_string()));
    };

    let month =
        french_month(month_name).ok_or_else(|| DateError::UnknownMonth(month_name.to_string()))?;

    // The site writes the first of the month as an ordinal ("1er mai 2021").
    let day = day.strip_suffix("er").unwrap_or(day);
    let day: u32 = day.parse().map_err(|_| DateError::Malformed(text.to_string()))?;
    let year: i32 = year.parse().map_err(|_| DateError::Malformed(text.to_string()))?;

    CalendarDate::from_ymd(year, month, day)
}
