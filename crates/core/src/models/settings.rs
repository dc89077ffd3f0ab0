use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::action::ActionKind;

/// What happens to local state when the save following an action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollbackPolicy {
    /// Local state stays ahead of the store until the next successful save.
    KeepLocal,
    /// Local state is restored to what it was before the action.
    RevertOnFailure,
}

/// Per-action rollback configuration.
///
/// Actions without an explicit entry use [`RollbackPolicy::KeepLocal`].
/// The default only reverts product deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPolicy {
    #[serde(default)]
    pub overrides: BTreeMap<ActionKind, RollbackPolicy>,
}

impl SyncPolicy {
    /// Every action keeps local state on failure.
    pub fn keep_local_everywhere() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    pub fn policy_for(&self, kind: ActionKind) -> RollbackPolicy {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or(RollbackPolicy::KeepLocal)
    }

    pub fn set(&mut self, kind: ActionKind, policy: RollbackPolicy) {
        self.overrides.insert(kind, policy);
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert(ActionKind::DeleteProduct, RollbackPolicy::RevertOnFailure);
        Self { overrides }
    }
}

/// User-configurable settings, stored in the user document under `settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Unit suffix shown after formatted amounts (e.g. "원").
    pub currency_unit: String,

    pub sync: SyncPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_unit: "원".to_string(),
            sync: SyncPolicy::default(),
        }
    }
}
