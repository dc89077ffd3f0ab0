use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::month::MonthKey;

/// Per-asset sparse month → signed delta mapping.
///
/// Keyed by the product's display name. A missing month means no change
/// that month; zero is never stored, so "set to 0" and "never entered"
/// are the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendLedger {
    entries: BTreeMap<String, BTreeMap<MonthKey, i64>>,
}

impl TrendLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded delta for `(name, month)`, 0 when absent.
    pub fn delta(&self, name: &str, month: MonthKey) -> i64 {
        self.entries
            .get(name)
            .and_then(|months| months.get(&month))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite the delta for `(name, month)`. Zero removes the entry.
    pub fn set(&mut self, name: &str, month: MonthKey, value: i64) {
        if value == 0 {
            if let Some(months) = self.entries.get_mut(name) {
                months.remove(&month);
                if months.is_empty() {
                    self.entries.remove(name);
                }
            }
            return;
        }
        self.entries
            .entry(name.to_string())
            .or_default()
            .insert(month, value);
    }

    /// All recorded months for one asset, chronologically.
    pub fn months_for(&self, name: &str) -> Option<&BTreeMap<MonthKey, i64>> {
        self.entries.get(name)
    }

    /// Asset names that have at least one non-zero delta, including orphans.
    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Move every delta recorded under `from` to `to`, adding onto any
    /// deltas `to` already has. Returns the number of months moved.
    pub fn rename_asset(&mut self, from: &str, to: &str) -> usize {
        if from == to {
            return 0;
        }
        let Some(moved) = self.entries.remove(from) else {
            return 0;
        };
        let count = moved.len();
        for (month, value) in moved {
            let merged = self.delta(to, month).saturating_add(value);
            self.set(to, month, merged);
        }
        count
    }

    /// Number of stored (non-zero) month entries across all assets.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One asset row of the yearly trend table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRow {
    pub key: super::order::RowKey,

    /// Delta per month of the table (0 where nothing was entered).
    pub deltas: Vec<i64>,

    /// Running sum of `deltas` up to and including each month.
    pub balances: Vec<i64>,
}

/// The monthly trend table for one calendar year.
///
/// The core computes it; a frontend only renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendTable {
    pub year: i32,

    /// January through December.
    pub months: Vec<MonthKey>,

    /// Rows in display order.
    pub rows: Vec<TrendRow>,

    /// Cross-asset delta per month.
    pub totals: Vec<i64>,

    /// `totals[i] - totals[i - 1]`; `None` for the first month.
    pub changes: Vec<Option<i64>>,
}
