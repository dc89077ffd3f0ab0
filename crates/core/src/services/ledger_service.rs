use tracing::debug;

use crate::errors::CoreError;
use crate::input;
use crate::models::month::MonthKey;
use crate::models::state::AppState;
use crate::models::trend::{TrendLedger, TrendRow, TrendTable};

use super::asset_service::AssetService;
use super::order_service;

/// Derives monthly totals, month-over-month changes, and running balances
/// from the sparse delta ledger.
///
/// Totals only count assets whose name is currently on the roster; entries
/// left behind by a renamed or deleted product stay in the ledger but no
/// longer contribute.
pub struct LedgerService {
    asset_service: AssetService,
}

impl LedgerService {
    pub fn new() -> Self {
        Self {
            asset_service: AssetService::new(),
        }
    }

    /// Overwrite the delta for `(asset_name, month)`.
    pub fn set_delta(&self, ledger: &mut TrendLedger, asset_name: &str, month: MonthKey, value: i64) {
        debug!(asset = asset_name, %month, value, "set trend delta");
        ledger.set(asset_name, month, value);
    }

    /// Normalize field text and store it. Returns the stored value.
    pub fn set_delta_text(
        &self,
        ledger: &mut TrendLedger,
        asset_name: &str,
        month: MonthKey,
        text: &str,
    ) -> i64 {
        let value = input::parse_signed(text);
        self.set_delta(ledger, asset_name, month, value);
        value
    }

    /// Sum of `delta(name, month)` over `live_names`.
    pub fn monthly_total(&self, ledger: &TrendLedger, live_names: &[String], month: MonthKey) -> i64 {
        live_names
            .iter()
            .fold(0i64, |acc, name| acc.saturating_add(ledger.delta(name, month)))
    }

    /// `monthly_total(months[index]) - monthly_total(months[index - 1])`.
    ///
    /// `None` means "no prior value": the first month, or an index outside
    /// `months`. A genuine zero change is `Some(0)`.
    pub fn month_over_month_change(
        &self,
        ledger: &TrendLedger,
        live_names: &[String],
        months: &[MonthKey],
        index: usize,
    ) -> Option<i64> {
        if index == 0 || index >= months.len() {
            return None;
        }
        let current = self.monthly_total(ledger, live_names, months[index]);
        let previous = self.monthly_total(ledger, live_names, months[index - 1]);
        Some(current.saturating_sub(previous))
    }

    /// Sum of one asset's deltas from January of `month`'s year through `month`.
    pub fn running_balance(&self, ledger: &TrendLedger, asset_name: &str, month: MonthKey) -> i64 {
        ledger
            .months_for(asset_name)
            .map(|months| {
                months
                    .iter()
                    .filter(|(m, _)| m.year() == month.year() && **m <= month)
                    .fold(0i64, |acc, (_, v)| acc.saturating_add(*v))
            })
            .unwrap_or(0)
    }

    /// Build the twelve-month table for `year`, rows in reconciled display order.
    pub fn trend_table(&self, state: &AppState, year: i32) -> Result<TrendTable, CoreError> {
        let months = MonthKey::months_of_year(year)?;
        let live_names = self.asset_service.live_names(&state.assets);
        let live_keys = self.asset_service.row_keys(&state.assets);
        let order = order_service::reconcile_order(&live_keys, &state.row_order);

        let rows = order
            .into_iter()
            .map(|key| {
                let deltas: Vec<i64> = months.iter().map(|m| state.trend.delta(&key.name, *m)).collect();
                let balances = deltas
                    .iter()
                    .scan(0i64, |acc, d| {
                        *acc = acc.saturating_add(*d);
                        Some(*acc)
                    })
                    .collect();
                TrendRow { key, deltas, balances }
            })
            .collect();

        let totals: Vec<i64> = months
            .iter()
            .map(|m| self.monthly_total(&state.trend, &live_names, *m))
            .collect();
        let changes = (0..months.len())
            .map(|i| self.month_over_month_change(&state.trend, &live_names, &months, i))
            .collect();

        Ok(TrendTable {
            year,
            months,
            rows,
            totals,
            changes,
        })
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
