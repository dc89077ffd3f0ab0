use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::order::RowKey;
use crate::models::product::{AssetProduct, ProductPatch};
use crate::models::state::AssetBuckets;

/// Manages the product roster and derives category and grand totals.
///
/// Pure business logic, no I/O.
pub struct AssetService;

impl AssetService {
    pub fn new() -> Self {
        Self
    }

    /// Append a product to the end of its category.
    pub fn add_product(&self, buckets: &mut AssetBuckets, category: Category, product: AssetProduct) {
        buckets.products_mut(category).push(product);
    }

    /// Apply a partial update to one product.
    pub fn update_product(
        &self,
        buckets: &mut AssetBuckets,
        category: Category,
        id: &str,
        patch: ProductPatch,
    ) -> Result<(), CoreError> {
        let product = Self::find_mut(buckets, category, id)?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(date) = patch.maturity_date {
            product.maturity_date = date;
        }
        if let Some(amount) = patch.amount {
            product.amount = amount;
        }
        Ok(())
    }

    /// Set the memo; blank text clears it.
    pub fn set_memo(
        &self,
        buckets: &mut AssetBuckets,
        category: Category,
        id: &str,
        memo: Option<String>,
    ) -> Result<(), CoreError> {
        let product = Self::find_mut(buckets, category, id)?;
        product.memo = memo.filter(|m| !m.trim().is_empty());
        Ok(())
    }

    /// Remove a product and return it.
    pub fn delete_product(
        &self,
        buckets: &mut AssetBuckets,
        category: Category,
        id: &str,
    ) -> Result<AssetProduct, CoreError> {
        let products = buckets.products_mut(category);
        let idx = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(products.remove(idx))
    }

    pub fn find<'a>(
        &self,
        buckets: &'a AssetBuckets,
        category: Category,
        id: &str,
    ) -> Option<&'a AssetProduct> {
        buckets.products(category).iter().find(|p| p.id == id)
    }

    /// Sum of amounts in one category.
    pub fn category_total(&self, buckets: &AssetBuckets, category: Category) -> u64 {
        buckets
            .products(category)
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount))
    }

    /// Sum of amounts across every category.
    pub fn grand_total(&self, buckets: &AssetBuckets) -> u64 {
        Category::ALL
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(self.category_total(buckets, *c)))
    }

    /// Every product must have a non-blank name before the roster is saved.
    pub fn validate_for_save(&self, buckets: &AssetBuckets) -> Result<(), CoreError> {
        let unnamed: Vec<String> = buckets
            .iter()
            .filter(|(_, p)| p.has_blank_name())
            .map(|(c, p)| format!("{}/{}", c.key(), p.id))
            .collect();
        if unnamed.is_empty() {
            return Ok(());
        }
        Err(CoreError::ValidationError(format!(
            "Product name is required ({} unnamed: {})",
            unnamed.len(),
            unnamed.join(", ")
        )))
    }

    pub fn has_unnamed(&self, buckets: &AssetBuckets) -> bool {
        buckets.iter().any(|(_, p)| p.has_blank_name())
    }

    /// Copy of the roster without unnamed drafts.
    pub fn named_only(&self, buckets: &AssetBuckets) -> AssetBuckets {
        let mut named = buckets.clone();
        for category in Category::ALL {
            named.products_mut(category).retain(|p| !p.has_blank_name());
        }
        named
    }

    /// Distinct non-blank product names, in roster order. These are the
    /// names that currently count toward trend totals.
    pub fn live_names(&self, buckets: &AssetBuckets) -> Vec<String> {
        let mut seen = HashSet::new();
        buckets
            .iter()
            .filter(|(_, p)| !p.has_blank_name())
            .filter_map(|(_, p)| {
                if seen.insert(p.name.as_str()) {
                    Some(p.name.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Distinct trend-table row keys for the live roster, in roster order.
    pub fn row_keys(&self, buckets: &AssetBuckets) -> Vec<RowKey> {
        let mut seen = HashSet::new();
        buckets
            .iter()
            .filter(|(_, p)| !p.has_blank_name())
            .map(|(c, p)| RowKey::new(c, p.name.clone()))
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    fn find_mut<'a>(
        buckets: &'a mut AssetBuckets,
        category: Category,
        id: &str,
    ) -> Result<&'a mut AssetProduct, CoreError> {
        buckets
            .products_mut(category)
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }
}

impl Default for AssetService {
    fn default() -> Self {
        Self::new()
    }
}
