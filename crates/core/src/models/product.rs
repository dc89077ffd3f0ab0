use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::input;

/// Opaque product identifier.
///
/// New products get a UUID v4; identifiers loaded from a stored document
/// are kept verbatim whatever their shape.
pub type ProductId = String;

/// One financial holding inside a category bucket.
///
/// The `name` doubles as the key into the trend ledger, so renaming a
/// product detaches it from its recorded monthly deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProduct {
    pub id: ProductId,

    /// Display name; must be non-blank before the roster can be saved.
    #[serde(default)]
    pub name: String,

    /// Optional maturity date (`YYYY-MM-DD`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub maturity_date: Option<NaiveDate>,

    /// Deposited amount in whole currency units.
    #[serde(default, deserialize_with = "input::deserialize_amount")]
    pub amount: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl AssetProduct {
    /// A freshly added product: empty name, zero amount, fresh id.
    pub fn new_empty() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            maturity_date: None,
            amount: 0,
            memo: None,
        }
    }

    /// Convenience constructor used when building rosters programmatically.
    pub fn named(name: impl Into<String>, amount: u64) -> Self {
        Self {
            name: name.into(),
            amount,
            ..Self::new_empty()
        }
    }

    /// True when the name is empty or whitespace only.
    pub fn has_blank_name(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// Partial update applied by `Action::UpdateProduct`. `None` leaves a field as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the date.
    pub maturity_date: Option<Option<NaiveDate>>,
    pub amount: Option<u64>,
}

/// Unparseable or empty dates load as "no maturity date".
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}
