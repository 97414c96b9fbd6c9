// Calendar day type - the primary key for stored images
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of the persistence key. Locale independent.
const KEY_FORMAT: &str = "%Y-%m-%d";

/// Format of the human-readable label, e.g. "Tue Jan 02 2024".
const LABEL_FORMAT: &str = "%a %b %d %Y";

/// A calendar day with no time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The day an instant falls on, in the instant's own timezone.
    /// Any two instants on the same calendar day map to the same `Day`.
    pub fn containing<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self(instant.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Canonical storage key (`YYYY-MM-DD`).
    pub fn key(&self) -> String {
        self.0.format(KEY_FORMAT).to_string()
    }

    pub fn label(&self) -> String {
        self.0.format(LABEL_FORMAT).to_string()
    }

    /// The day before. Saturates at the earliest representable date.
    pub fn previous(&self) -> Self {
        self.0.pred_opt().map(Self).unwrap_or(*self)
    }

    /// The day after. Saturates at the latest representable date.
    pub fn next(&self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(*self)
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, KEY_FORMAT).map(Self)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
