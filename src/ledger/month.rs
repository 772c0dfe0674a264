use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Calendar month key rendered as `yyyy-mm`.
///
/// Ordering is chronological, which keeps monthly series sorted without
/// relying on string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Long label used by month pickers, e.g. `January 2024`.
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    /// Compact chart axis label, e.g. `Jan 24`.
    pub fn short_label(&self) -> String {
        self.first_day().format("%b %y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::validation(format!("`{value}` is not a yyyy-mm month"));
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_zero_padded_key() {
        let month: YearMonth = "2024-01".parse().expect("valid month");
        assert_eq!(month.to_string(), "2024-01");
        assert_eq!(month.label(), "January 2024");
        assert_eq!(month.short_label(), "Jan 24");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["2024-13", "2024-1", "24-01", "2024/01", "all", ""] {
            assert!(raw.parse::<YearMonth>().is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn orders_chronologically() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = YearMonth::new(2024, 1).unwrap();
        assert!(dec < jan);
        assert!(jan.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
    }
}
