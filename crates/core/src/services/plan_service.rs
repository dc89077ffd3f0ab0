use crate::errors::CoreError;
use crate::models::plan::{MonthlyPlan, PlanItem, PlanList};

use super::order_service;

/// Monthly plan bookkeeping. The available amount is always recomputed.
pub struct PlanService;

impl PlanService {
    pub fn new() -> Self {
        Self
    }

    pub fn list_total(&self, plan: &MonthlyPlan, list: PlanList) -> u64 {
        plan.list(list)
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.amount))
    }

    /// `max(0, income - Σ savings)`. Cash items don't reduce it.
    pub fn available_amount(&self, plan: &MonthlyPlan) -> u64 {
        plan.income
            .saturating_sub(self.list_total(plan, PlanList::Savings))
    }

    pub fn add_item(&self, plan: &mut MonthlyPlan, list: PlanList, item: PlanItem) {
        plan.list_mut(list).push(item);
    }

    pub fn update_item(
        &self,
        plan: &mut MonthlyPlan,
        list: PlanList,
        id: &str,
        name: Option<String>,
        amount: Option<u64>,
    ) -> Result<(), CoreError> {
        let item = plan
            .list_mut(list)
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::ValidationError(format!("Plan item not found: {id}")))?;
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(amount) = amount {
            item.amount = amount;
        }
        Ok(())
    }

    pub fn remove_item(
        &self,
        plan: &mut MonthlyPlan,
        list: PlanList,
        id: &str,
    ) -> Result<PlanItem, CoreError> {
        let items = plan.list_mut(list);
        let idx = items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::ValidationError(format!("Plan item not found: {id}")))?;
        Ok(items.remove(idx))
    }

    pub fn reorder_items(&self, plan: &mut MonthlyPlan, list: PlanList, from: usize, to: usize) {
        order_service::reorder(plan.list_mut(list), from, to);
    }
}

impl Default for PlanService {
    fn default() -> Self {
        Self::new()
    }
}
