use serde::{Deserialize, Serialize};

use super::category::Category;
use super::month::MonthKey;
use super::plan::{PlanItem, PlanList};
use super::product::{AssetProduct, ProductId, ProductPatch};
use super::profile::UserProfile;
use super::state::StateSection;

/// Every mutation the application can make to [`AppState`](super::state::AppState).
///
/// Actions carry all their inputs (including freshly generated ids) so that
/// applying one is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Asset roster ────────────────────────────────────────────────
    AddProduct {
        category: Category,
        product: AssetProduct,
    },
    UpdateProduct {
        category: Category,
        id: ProductId,
        patch: ProductPatch,
    },
    /// Rename with optional migration of trend history to the new name.
    /// A name change through `UpdateProduct` is a rename without migration.
    RenameProduct {
        category: Category,
        id: ProductId,
        name: String,
        migrate_trend: bool,
    },
    /// Blank memo clears it.
    SetMemo {
        category: Category,
        id: ProductId,
        memo: Option<String>,
    },
    DeleteProduct {
        category: Category,
        id: ProductId,
    },

    // ── Trend ledger ────────────────────────────────────────────────
    SetDelta {
        asset_name: String,
        month: MonthKey,
        value: i64,
    },
    /// Raw field text; normalized the same way a blurred input field is.
    SetDeltaText {
        asset_name: String,
        month: MonthKey,
        text: String,
    },
    /// Move a trend row, indices into the reconciled display order.
    ReorderRows { from: usize, to: usize },

    // ── Monthly plan ────────────────────────────────────────────────
    SetIncome(u64),
    AddPlanItem { list: PlanList, item: PlanItem },
    UpdatePlanItem {
        list: PlanList,
        id: String,
        name: Option<String>,
        amount: Option<u64>,
    },
    RemovePlanItem { list: PlanList, id: String },
    ReorderPlanItems {
        list: PlanList,
        from: usize,
        to: usize,
    },

    // ── Annual snapshots ────────────────────────────────────────────
    SetSnapshot { year: i32, month: u32, value: u64 },
    RemoveSnapshot { year: i32, month: u32 },

    // ── Profile ─────────────────────────────────────────────────────
    SetProfile(UserProfile),
}

/// Fieldless discriminant of [`Action`], used to key per-action policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    AddProduct,
    UpdateProduct,
    RenameProduct,
    SetMemo,
    DeleteProduct,
    SetDelta,
    ReorderRows,
    SetIncome,
    AddPlanItem,
    UpdatePlanItem,
    RemovePlanItem,
    ReorderPlanItems,
    SetSnapshot,
    RemoveSnapshot,
    SetProfile,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::AddProduct { .. } => ActionKind::AddProduct,
            Action::UpdateProduct { .. } => ActionKind::UpdateProduct,
            Action::RenameProduct { .. } => ActionKind::RenameProduct,
            Action::SetMemo { .. } => ActionKind::SetMemo,
            Action::DeleteProduct { .. } => ActionKind::DeleteProduct,
            Action::SetDelta { .. } | Action::SetDeltaText { .. } => ActionKind::SetDelta,
            Action::ReorderRows { .. } => ActionKind::ReorderRows,
            Action::SetIncome(_) => ActionKind::SetIncome,
            Action::AddPlanItem { .. } => ActionKind::AddPlanItem,
            Action::UpdatePlanItem { .. } => ActionKind::UpdatePlanItem,
            Action::RemovePlanItem { .. } => ActionKind::RemovePlanItem,
            Action::ReorderPlanItems { .. } => ActionKind::ReorderPlanItems,
            Action::SetSnapshot { .. } => ActionKind::SetSnapshot,
            Action::RemoveSnapshot { .. } => ActionKind::RemoveSnapshot,
            Action::SetProfile(_) => ActionKind::SetProfile,
        }
    }
}

impl ActionKind {
    /// State sections an action of this kind can touch, i.e. what a save
    /// right after it has to write.
    pub fn sections(&self) -> &'static [StateSection] {
        match self {
            ActionKind::AddProduct | ActionKind::SetMemo | ActionKind::DeleteProduct => {
                &[StateSection::Assets]
            }
            ActionKind::UpdateProduct => &[StateSection::Assets, StateSection::RowOrder],
            ActionKind::RenameProduct => &[
                StateSection::Assets,
                StateSection::Trend,
                StateSection::RowOrder,
            ],
            ActionKind::SetDelta => &[StateSection::Trend],
            ActionKind::ReorderRows => &[StateSection::RowOrder],
            ActionKind::SetIncome
            | ActionKind::AddPlanItem
            | ActionKind::UpdatePlanItem
            | ActionKind::RemovePlanItem
            | ActionKind::ReorderPlanItems => &[StateSection::Plan],
            ActionKind::SetSnapshot | ActionKind::RemoveSnapshot => &[StateSection::Annual],
            ActionKind::SetProfile => &[StateSection::Profile],
        }
    }
}
