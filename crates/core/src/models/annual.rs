use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Absolute total-asset snapshots: year (`"2025"`) → month (`"03"`) → value.
///
/// Unlike [`TrendLedger`](super::trend::TrendLedger) these are balances,
/// not deltas, and the two are never reconciled against each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualTrend {
    pub years: BTreeMap<String, BTreeMap<String, u64>>,
}

impl AnnualTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document key for a year.
    pub fn year_key(year: i32) -> String {
        format!("{year:04}")
    }

    /// Document key for a month (two digits).
    pub fn month_key(month: u32) -> String {
        format!("{month:02}")
    }

    pub fn get(&self, year: i32, month: u32) -> Option<u64> {
        self.years
            .get(&Self::year_key(year))
            .and_then(|months| months.get(&Self::month_key(month)))
            .copied()
    }

    pub fn insert(&mut self, year: i32, month: u32, value: u64) {
        self.years
            .entry(Self::year_key(year))
            .or_default()
            .insert(Self::month_key(month), value);
    }

    /// Remove a snapshot; drops the year entry once it is empty.
    pub fn remove(&mut self, year: i32, month: u32) -> Option<u64> {
        let year_key = Self::year_key(year);
        let months = self.years.get_mut(&year_key)?;
        let removed = months.remove(&Self::month_key(month));
        if months.is_empty() {
            self.years.remove(&year_key);
        }
        removed
    }
}
