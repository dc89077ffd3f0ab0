use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::input;

/// One named commitment in the monthly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "input::deserialize_amount")]
    pub amount: u64,
}

impl PlanItem {
    pub fn new(name: impl Into<String>, amount: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            amount,
        }
    }
}

/// Which of the plan's two lists an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanList {
    /// Savings commitments; reduce the available amount.
    Savings,
    /// Discretionary cash; informational only.
    Cash,
}

/// Monthly income plus two independent ordered item lists.
///
/// The available amount is derived on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    #[serde(default, deserialize_with = "input::deserialize_amount")]
    pub income: u64,
    #[serde(default)]
    pub savings: Vec<PlanItem>,
    #[serde(default)]
    pub cash: Vec<PlanItem>,
}

impl MonthlyPlan {
    pub fn list(&self, list: PlanList) -> &Vec<PlanItem> {
        match list {
            PlanList::Savings => &self.savings,
            PlanList::Cash => &self.cash,
        }
    }

    pub fn list_mut(&mut self, list: PlanList) -> &mut Vec<PlanItem> {
        match list {
            PlanList::Savings => &mut self.savings,
            PlanList::Cash => &mut self.cash,
        }
    }
}
