use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A calendar month, written `YYYY-MM` in documents and ledger keys.
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a month key, rejecting months outside 1..=12 and years chrono can't represent.
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(0..=9999).contains(&year) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::InvalidMonthKey(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
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

    /// January through December of `year`, in order.
    pub fn months_of_year(year: i32) -> Result<Vec<MonthKey>, CoreError> {
        (1..=12).map(|m| MonthKey::new(year, m)).collect()
    }

    /// The month before this one, crossing year boundaries.
    pub fn previous(&self) -> Option<MonthKey> {
        if self.month == 1 {
            MonthKey::new(self.year - 1, 12).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (y, m) = trimmed
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidMonthKey(s.to_string()))?;
        if y.len() != 4
            || m.is_empty()
            || m.len() > 2
            || !y.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(CoreError::InvalidMonthKey(s.to_string()));
        }
        let year: i32 = y
            .parse()
            .map_err(|_| CoreError::InvalidMonthKey(s.to_string()))?;
        let month: u32 = m
            .parse()
            .map_err(|_| CoreError::InvalidMonthKey(s.to_string()))?;
        MonthKey::new(year, month).map_err(|_| CoreError::InvalidMonthKey(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
