//! Calendar date handling for ledger entries.
//!
//! The wallet API exchanges dates as `MM.DD.YYYY` strings. Historical data is
//! inconsistently padded (`5.3.2025` vs `05.03.2025`) and entry forms produce
//! ISO `YYYY-MM-DD`, so parsing accepts all three and everything is written
//! back in the canonical zero-padded dotted form.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar date held as explicit year/month/day integers.
///
/// Weekday derivation is proleptic-Gregorian arithmetic on those integers and
/// never consults the system clock or timezone, so the same date yields the
/// same weekday everywhere.
///
/// ```
/// # use wallet_sync::model::TxDate;
/// # use std::str::FromStr;
/// let date = TxDate::from_str("5.30.2025").unwrap();
/// assert_eq!(date.to_string(), "05.30.2025");
/// assert_eq!(date.weekday().to_string(), "Fri");
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TxDate {
    year: i32,
    month: u32,
    day: u32,
}

impl TxDate {
    /// Creates a date, validating it against the Gregorian calendar.
    pub fn new(year: i32, month: u32, day: u32) -> crate::Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            bail!("{year:04}-{month:02}-{day:02} is not a valid calendar date");
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_month(&self) -> u32 {
        self.day
    }

    /// The weekday this date falls on.
    pub fn weekday(&self) -> Weekday {
        // new() guarantees the components form a real date
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .unwrap_or(NaiveDate::MIN);
        date.weekday().into()
    }
}

impl FromStr for TxDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month, day) = if s.contains('-') {
            // ISO form: YYYY-MM-DD
            let mut parts = s.splitn(3, '-');
            let year = parts.next().unwrap_or_default();
            let month = parts.next().unwrap_or_default();
            let day = parts.next().unwrap_or_default();
            (year, month, day)
        } else {
            // Dotted form: MM.DD.YYYY, with or without zero padding
            let mut parts = s.splitn(3, '.');
            let month = parts.next().unwrap_or_default();
            let day = parts.next().unwrap_or_default();
            let year = parts.next().unwrap_or_default();
            (year, month, day)
        };

        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in date '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month in date '{s}'"))?;
        let day: u32 = day
            .parse()
            .with_context(|| format!("Invalid day in date '{s}'"))?;
        TxDate::new(year, month, day)
    }
}

impl Display for TxDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.month, self.day, self.year)
    }
}

impl Serialize for TxDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TxDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TxDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A day of the week, serialized as its three-letter abbreviation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

serde_plain::derive_display_from_serialize!(Weekday);
serde_plain::derive_fromstr_from_deserialize!(Weekday);

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}
