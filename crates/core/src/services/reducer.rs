//! The single place where [`AppState`] changes.
//!
//! `apply` either performs the whole action or returns an error with the
//! state untouched.

use tracing::debug;

use crate::errors::CoreError;
use crate::models::action::Action;
use crate::models::category::Category;
use crate::models::order::RowKey;
use crate::models::state::AppState;

use super::annual_service::AnnualService;
use super::asset_service::AssetService;
use super::ledger_service::LedgerService;
use super::order_service;
use super::plan_service::PlanService;

pub fn apply(state: &mut AppState, action: Action) -> Result<(), CoreError> {
    debug!(kind = ?action.kind(), "applying action");

    let assets = AssetService::new();
    let ledger = LedgerService::new();
    let plan = PlanService::new();
    let annual = AnnualService::new();

    match action {
        Action::AddProduct { category, product } => {
            assets.add_product(&mut state.assets, category, product);
        }
        Action::UpdateProduct {
            category,
            id,
            mut patch,
        } => {
            let name = patch.name.take();
            assets.update_product(&mut state.assets, category, &id, patch)?;
            if let Some(name) = name {
                rename_product(state, category, &id, name, false)?;
            }
        }
        Action::RenameProduct {
            category,
            id,
            name,
            migrate_trend,
        } => rename_product(state, category, &id, name, migrate_trend)?,
        Action::SetMemo { category, id, memo } => {
            assets.set_memo(&mut state.assets, category, &id, memo)?;
        }
        Action::DeleteProduct { category, id } => {
            let removed = assets.delete_product(&mut state.assets, category, &id)?;
            debug!(product = %removed.id, name = %removed.name, "product deleted");
        }
        Action::SetDelta {
            asset_name,
            month,
            value,
        } => ledger.set_delta(&mut state.trend, &asset_name, month, value),
        Action::SetDeltaText {
            asset_name,
            month,
            text,
        } => {
            ledger.set_delta_text(&mut state.trend, &asset_name, month, &text);
        }
        Action::ReorderRows { from, to } => {
            let live = assets.row_keys(&state.assets);
            let mut order = order_service::reconcile_order(&live, &state.row_order);
            order_service::reorder(&mut order, from, to);
            state.row_order = order;
        }
        Action::SetIncome(income) => state.plan.income = income,
        Action::AddPlanItem { list, item } => plan.add_item(&mut state.plan, list, item),
        Action::UpdatePlanItem {
            list,
            id,
            name,
            amount,
        } => plan.update_item(&mut state.plan, list, &id, name, amount)?,
        Action::RemovePlanItem { list, id } => {
            plan.remove_item(&mut state.plan, list, &id)?;
        }
        Action::ReorderPlanItems { list, from, to } => {
            plan.reorder_items(&mut state.plan, list, from, to)
        }
        Action::SetSnapshot { year, month, value } => {
            annual.set_snapshot(&mut state.annual, year, month, value)?
        }
        Action::RemoveSnapshot { year, month } => {
            annual.remove_snapshot(&mut state.annual, year, month)?;
        }
        Action::SetProfile(profile) => state.profile = profile.normalized(),
    }

    Ok(())
}

/// Rename a product, optionally carrying its trend history along.
///
/// History is only moved when no other product still uses the old name;
/// otherwise it stays with that product. The row's position in the stored
/// display order follows the rename unless another product in the same
/// category still owns that row.
fn rename_product(
    state: &mut AppState,
    category: Category,
    id: &str,
    name: String,
    migrate_trend: bool,
) -> Result<(), CoreError> {
    let product = state
        .assets
        .products_mut(category)
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
    let old_name = std::mem::replace(&mut product.name, name.clone());

    if old_name == name {
        return Ok(());
    }

    let row_still_used = state.assets.products(category).iter().any(|p| p.name == old_name);
    if !row_still_used {
        let old_key = RowKey::new(category, old_name.clone());
        let new_key = RowKey::new(category, name.clone());
        for key in state.row_order.iter_mut().filter(|k| **k == old_key) {
            *key = new_key.clone();
        }
    }

    let still_used = state.assets.iter().any(|(_, p)| p.name == old_name);
    if migrate_trend && !old_name.trim().is_empty() && !still_used {
        let moved = state.trend.rename_asset(&old_name, &name);
        debug!(from = %old_name, to = %name, moved, "trend history migrated");
    }

    Ok(())
}
