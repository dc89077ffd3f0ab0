pub mod errors;
pub mod input;
pub mod models;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{
    action::{Action, ActionKind},
    category::Category,
    month::MonthKey,
    order::RowKey,
    plan::{PlanItem, PlanList},
    product::{AssetProduct, ProductId, ProductPatch},
    profile::UserProfile,
    session::{AuthState, UserId},
    settings::{RollbackPolicy, Settings, SyncPolicy},
    state::{AppState, StateSection},
    trend::TrendTable,
};
use services::{
    annual_service::AnnualService, asset_service::AssetService, ledger_service::LedgerService,
    order_service, plan_service::PlanService, reducer, sync_service::SyncService,
};
use std::collections::BTreeSet;
use storage::document::{self, UserDocument};
use storage::traits::DocumentStore;
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the Asset Hub core library.
///
/// Owns the whole [`AppState`] for the signed-in user. Every change goes
/// through [`AssetHub::dispatch`] (local only) or [`AssetHub::commit`]
/// (local, then saved); reads are plain borrows.
#[must_use]
pub struct AssetHub {
    state: AppState,
    auth: AuthState,
    asset_service: AssetService,
    ledger_service: LedgerService,
    plan_service: PlanService,
    annual_service: AnnualService,
    sync_service: SyncService,
    /// User whose data is in `state`; `None` for anonymous local edits.
    owner: Option<UserId>,
    /// Sections changed since the last successful save or load.
    pending: BTreeSet<StateSection>,
}

impl std::fmt::Debug for AssetHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetHub")
            .field("auth", &self.auth)
            .field("products", &self.state.assets.len())
            .field("trend_entries", &self.state.trend.entry_count())
            .field("pending", &self.pending)
            .finish()
    }
}

impl Default for AssetHub {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetHub {
    /// Empty state, waiting for the identity provider.
    pub fn new() -> Self {
        Self::build(AppState::default(), AuthState::Resolving)
    }

    /// Start from an existing state, e.g. one rebuilt from an exported document.
    pub fn with_state(state: AppState, auth: AuthState) -> Self {
        Self::build(state, auth)
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Record what the identity provider reports. Switching to another user
    /// or signing out drops the in-memory state; a re-check (`Resolving`)
    /// keeps it.
    pub fn set_auth_state(&mut self, auth: AuthState) {
        match &auth {
            AuthState::Resolving => {}
            AuthState::SignedOut => {
                if self.owner.take().is_some() {
                    self.reset_state();
                }
            }
            AuthState::SignedIn(user) => {
                if self.owner.as_ref().is_some_and(|owner| owner != user) {
                    self.reset_state();
                }
                self.owner = Some(user.clone());
            }
        }
        self.auth = auth;
    }

    #[must_use]
    pub fn auth_state(&self) -> &AuthState {
        &self.auth
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Replace local state with the signed-in user's stored document.
    pub async fn load(&mut self, store: &dyn DocumentStore) -> Result<(), CoreError> {
        let user = self.require_user()?;
        self.state = self.sync_service.load(store, &user).await?;
        self.pending.clear();
        info!(%user, products = self.state.assets.len(), "state loaded");
        Ok(())
    }

    /// Save every section changed since the last save. `Ok(None)` when
    /// nothing is pending; the store is not contacted then.
    pub async fn save(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<Option<UserDocument>, CoreError> {
        self.require_user()?;
        if self.pending.is_empty() {
            return Ok(None);
        }
        let sections: Vec<StateSection> = self.pending.iter().copied().collect();
        self.save_sections(store, &sections).await.map(Some)
    }

    /// Save every section regardless of what changed.
    pub async fn save_all(&mut self, store: &dyn DocumentStore) -> Result<UserDocument, CoreError> {
        self.save_sections(store, &StateSection::ALL).await
    }

    /// Merge-write the given sections. The roster is validated first when
    /// it is among them; a validation failure makes no remote call.
    pub async fn save_sections(
        &mut self,
        store: &dyn DocumentStore,
        sections: &[StateSection],
    ) -> Result<UserDocument, CoreError> {
        self.write_sections(store, sections, false).await
    }

    // ── Actions ─────────────────────────────────────────────────────

    /// Apply an action to local state only.
    pub fn dispatch(&mut self, action: Action) -> Result<(), CoreError> {
        let sections = action.kind().sections();
        reducer::apply(&mut self.state, action)?;
        self.pending.extend(sections.iter().copied());
        Ok(())
    }

    /// Apply an action, then save the sections it touched.
    ///
    /// If the save fails, the action's [`RollbackPolicy`] decides whether
    /// local state is restored or left ahead of the store.
    pub async fn commit(
        &mut self,
        store: &dyn DocumentStore,
        action: Action,
    ) -> Result<UserDocument, CoreError> {
        let kind = action.kind();
        let policy = self.state.settings.sync.policy_for(kind);
        let before = match policy {
            RollbackPolicy::RevertOnFailure => Some((self.state.clone(), self.pending.clone())),
            RollbackPolicy::KeepLocal => None,
        };

        // Deleting never blocks on unnamed drafts; they are held back from the write.
        let hold_back_unnamed = kind == ActionKind::DeleteProduct;

        self.dispatch(action)?;
        match self
            .write_sections(store, kind.sections(), hold_back_unnamed)
            .await
        {
            Ok(document) => Ok(document),
            Err(e) => {
                if let Some((state, pending)) = before {
                    warn!(?kind, error = %e, "save failed, reverting local change");
                    self.state = state;
                    self.pending = pending;
                } else {
                    warn!(?kind, error = %e, "save failed, local change kept");
                }
                Err(e)
            }
        }
    }

    /// True when local state has changes the store hasn't seen.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn pending_sections(&self) -> Vec<StateSection> {
        self.pending.iter().copied().collect()
    }

    // ── Asset roster ────────────────────────────────────────────────

    /// Add an empty product to `category` and return its id.
    pub fn add_product(&mut self, category: Category) -> Result<ProductId, CoreError> {
        let product = AssetProduct::new_empty();
        let id = product.id.clone();
        self.dispatch(Action::AddProduct { category, product })?;
        Ok(id)
    }

    pub fn update_product(
        &mut self,
        category: Category,
        id: &str,
        patch: ProductPatch,
    ) -> Result<(), CoreError> {
        self.dispatch(Action::UpdateProduct {
            category,
            id: id.to_string(),
            patch,
        })
    }

    /// Set the amount from raw field text (non-digits are dropped).
    pub fn set_product_amount_text(
        &mut self,
        category: Category,
        id: &str,
        text: &str,
    ) -> Result<u64, CoreError> {
        let amount = input::parse_amount(text);
        self.update_product(
            category,
            id,
            ProductPatch {
                amount: Some(amount),
                ..ProductPatch::default()
            },
        )?;
        Ok(amount)
    }

    pub fn rename_product(
        &mut self,
        category: Category,
        id: &str,
        name: impl Into<String>,
        migrate_trend: bool,
    ) -> Result<(), CoreError> {
        self.dispatch(Action::RenameProduct {
            category,
            id: id.to_string(),
            name: name.into(),
            migrate_trend,
        })
    }

    pub fn set_memo(
        &mut self,
        category: Category,
        id: &str,
        memo: Option<String>,
    ) -> Result<(), CoreError> {
        self.dispatch(Action::SetMemo {
            category,
            id: id.to_string(),
            memo,
        })
    }

    /// Delete a product and save immediately. Reverts locally if the save
    /// fails (default policy).
    pub async fn delete_product(
        &mut self,
        store: &dyn DocumentStore,
        category: Category,
        id: &str,
    ) -> Result<(), CoreError> {
        self.commit(
            store,
            Action::DeleteProduct {
                category,
                id: id.to_string(),
            },
        )
        .await
        .map(|_| ())
    }

    #[must_use]
    pub fn products(&self, category: Category) -> &[AssetProduct] {
        self.state.assets.products(category)
    }

    #[must_use]
    pub fn get_product(&self, category: Category, id: &str) -> Option<&AssetProduct> {
        self.asset_service.find(&self.state.assets, category, id)
    }

    #[must_use]
    pub fn category_total(&self, category: Category) -> u64 {
        self.asset_service.category_total(&self.state.assets, category)
    }

    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.asset_service.grand_total(&self.state.assets)
    }

    // ── Trend ledger ────────────────────────────────────────────────

    pub fn set_delta(&mut self, asset_name: &str, month: MonthKey, value: i64) -> Result<(), CoreError> {
        self.dispatch(Action::SetDelta {
            asset_name: asset_name.to_string(),
            month,
            value,
        })
    }

    /// Store the normalized value of a delta field's text; returns it.
    pub fn set_delta_text(
        &mut self,
        asset_name: &str,
        month: MonthKey,
        text: &str,
    ) -> Result<i64, CoreError> {
        self.dispatch(Action::SetDeltaText {
            asset_name: asset_name.to_string(),
            month,
            text: text.to_string(),
        })?;
        Ok(self.state.trend.delta(asset_name, month))
    }

    #[must_use]
    pub fn delta(&self, asset_name: &str, month: MonthKey) -> i64 {
        self.state.trend.delta(asset_name, month)
    }

    /// Cross-asset delta for `month`, live names only.
    #[must_use]
    pub fn monthly_total(&self, month: MonthKey) -> i64 {
        let names = self.asset_service.live_names(&self.state.assets);
        self.ledger_service.monthly_total(&self.state.trend, &names, month)
    }

    /// Change of the monthly total against the previous entry of `months`;
    /// `None` for the first entry.
    #[must_use]
    pub fn month_over_month_change(&self, months: &[MonthKey], index: usize) -> Option<i64> {
        let names = self.asset_service.live_names(&self.state.assets);
        self.ledger_service
            .month_over_month_change(&self.state.trend, &names, months, index)
    }

    #[must_use]
    pub fn running_balance(&self, asset_name: &str, month: MonthKey) -> i64 {
        self.ledger_service
            .running_balance(&self.state.trend, asset_name, month)
    }

    pub fn trend_table(&self, year: i32) -> Result<TrendTable, CoreError> {
        self.ledger_service.trend_table(&self.state, year)
    }

    /// Move a row of the trend table.
    pub fn reorder_rows(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.dispatch(Action::ReorderRows { from, to })
    }

    /// Row keys in the order the table shows them.
    #[must_use]
    pub fn display_order(&self) -> Vec<RowKey> {
        let live = self.asset_service.row_keys(&self.state.assets);
        order_service::reconcile_order(&live, &self.state.row_order)
    }

    // ── Monthly plan ────────────────────────────────────────────────

    pub fn set_income(&mut self, income: u64) -> Result<(), CoreError> {
        self.dispatch(Action::SetIncome(income))
    }

    /// Add an item and return its id.
    pub fn add_plan_item(
        &mut self,
        list: PlanList,
        name: impl Into<String>,
        amount: u64,
    ) -> Result<String, CoreError> {
        let item = PlanItem::new(name, amount);
        let id = item.id.clone();
        self.dispatch(Action::AddPlanItem { list, item })?;
        Ok(id)
    }

    pub fn update_plan_item(
        &mut self,
        list: PlanList,
        id: &str,
        name: Option<String>,
        amount: Option<u64>,
    ) -> Result<(), CoreError> {
        self.dispatch(Action::UpdatePlanItem {
            list,
            id: id.to_string(),
            name,
            amount,
        })
    }

    pub fn remove_plan_item(&mut self, list: PlanList, id: &str) -> Result<(), CoreError> {
        self.dispatch(Action::RemovePlanItem {
            list,
            id: id.to_string(),
        })
    }

    pub fn reorder_plan_items(&mut self, list: PlanList, from: usize, to: usize) -> Result<(), CoreError> {
        self.dispatch(Action::ReorderPlanItems { list, from, to })
    }

    #[must_use]
    pub fn plan_total(&self, list: PlanList) -> u64 {
        self.plan_service.list_total(&self.state.plan, list)
    }

    /// Income minus savings commitments, floored at zero.
    #[must_use]
    pub fn available_amount(&self) -> u64 {
        self.plan_service.available_amount(&self.state.plan)
    }

    // ── Annual snapshots ────────────────────────────────────────────

    pub fn set_snapshot(&mut self, year: i32, month: u32, value: u64) -> Result<(), CoreError> {
        self.dispatch(Action::SetSnapshot { year, month, value })
    }

    pub fn remove_snapshot(&mut self, year: i32, month: u32) -> Result<(), CoreError> {
        self.dispatch(Action::RemoveSnapshot { year, month })
    }

    /// Snapshot the current grand total into the month containing `date`.
    pub fn record_current_total(&mut self, date: NaiveDate) -> Result<u64, CoreError> {
        let total = self.grand_total();
        let month = MonthKey::from_date(date);
        self.dispatch(Action::SetSnapshot {
            year: month.year(),
            month: month.month(),
            value: total,
        })?;
        Ok(total)
    }

    #[must_use]
    pub fn annual_row(&self, year: i32) -> Vec<Option<u64>> {
        self.annual_service.year_row(&self.state.annual, year)
    }

    /// Years with at least one snapshot, ascending.
    #[must_use]
    pub fn annual_years(&self) -> Vec<i32> {
        self.annual_service.years(&self.state.annual)
    }

    #[must_use]
    pub fn annual_change(&self, year: i32, month: u32) -> Option<i64> {
        self.annual_service
            .change_from_previous(&self.state.annual, year, month)
    }

    // ── Profile & settings ──────────────────────────────────────────

    pub fn set_profile(&mut self, profile: UserProfile) -> Result<(), CoreError> {
        self.dispatch(Action::SetProfile(profile))
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.state.profile
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn set_sync_policy(&mut self, policy: SyncPolicy) {
        self.state.settings.sync = policy;
        self.pending.insert(StateSection::Settings);
    }

    /// Set the unit shown after formatted amounts. Must not be blank.
    pub fn set_currency_unit(&mut self, unit: &str) -> Result<(), CoreError> {
        let trimmed = unit.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError(
                "Currency unit must not be blank".into(),
            ));
        }
        self.state.settings.currency_unit = trimmed.to_string();
        self.pending.insert(StateSection::Settings);
        Ok(())
    }

    /// `1234567` → `"1,234,567원"` with the configured unit.
    #[must_use]
    pub fn format_amount(&self, value: i64) -> String {
        input::format_with_unit(value, &self.state.settings.currency_unit)
    }

    // ── State access ────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Full state as an unsaved document (for export or debugging).
    pub fn to_document(&self) -> Result<UserDocument, CoreError> {
        UserDocument::from_state(&self.state)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.to_document()?)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize state: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Merge-write `sections`. With `hold_back_unnamed`, unnamed products are
    /// left out of the written roster (and the roster stays pending) rather
    /// than failing validation.
    async fn write_sections(
        &mut self,
        store: &dyn DocumentStore,
        sections: &[StateSection],
        hold_back_unnamed: bool,
    ) -> Result<UserDocument, CoreError> {
        let user = self.require_user()?;
        let writes_roster = sections.contains(&StateSection::Assets);
        let held_back =
            writes_roster && hold_back_unnamed && self.asset_service.has_unnamed(&self.state.assets);
        if writes_roster && !held_back {
            self.asset_service.validate_for_save(&self.state.assets)?;
        }

        let mut fields = document::section_fields(&self.state, sections)?;
        if held_back {
            let named = self.asset_service.named_only(&self.state.assets);
            fields.insert(document::FIELD_ASSETS.into(), document::assets_field(&named)?);
        }

        let written = self.sync_service.merge_write(store, &user, fields).await?;
        for section in sections {
            if !(held_back && *section == StateSection::Assets) {
                self.pending.remove(section);
            }
        }
        Ok(written)
    }

    fn reset_state(&mut self) {
        self.state = AppState::default();
        self.pending.clear();
    }

    fn require_user(&self) -> Result<UserId, CoreError> {
        match &self.auth {
            AuthState::Resolving => Err(CoreError::AuthNotResolved),
            AuthState::SignedOut => Err(CoreError::NotAuthenticated),
            AuthState::SignedIn(user) => Ok(user.clone()),
        }
    }

    fn build(state: AppState, auth: AuthState) -> Self {
        Self {
            owner: auth.user_id().cloned(),
            state,
            auth,
            asset_service: AssetService::new(),
            ledger_service: LedgerService::new(),
            plan_service: PlanService::new(),
            annual_service: AnnualService::new(),
            sync_service: SyncService::new(),
            pending: BTreeSet::new(),
        }
    }
}
