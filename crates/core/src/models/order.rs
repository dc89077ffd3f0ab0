use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::category::Category;
use crate::errors::CoreError;

/// Identifies one row of the trend table: a category plus a product name.
///
/// Text form is `<categoryKey>:<name>`, e.g. `pension:IRP`. The name may
/// itself contain colons; only the first one separates the parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RowKey {
    pub category: Category,
    pub name: String,
}

impl RowKey {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.category.key(), self.name)
    }
}

impl FromStr for RowKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (category, name) = s
            .split_once(':')
            .ok_or_else(|| CoreError::InvalidRowKey(s.to_string()))?;
        let category =
            Category::from_key(category).ok_or_else(|| CoreError::InvalidRowKey(s.to_string()))?;
        Ok(Self::new(category, name))
    }
}

impl TryFrom<String> for RowKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RowKey> for String {
    fn from(key: RowKey) -> Self {
        key.to_string()
    }
}
