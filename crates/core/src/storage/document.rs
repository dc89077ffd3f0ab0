use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::input;
use crate::models::annual::AnnualTrend;
use crate::models::category::Category;
use crate::models::month::MonthKey;
use crate::models::order::RowKey;
use crate::models::plan::MonthlyPlan;
use crate::models::product::AssetProduct;
use crate::models::profile::UserProfile;
use crate::models::settings::Settings;
use crate::models::state::{AppState, AssetBuckets, StateSection};
use crate::models::trend::TrendLedger;

// ── Top-level document fields ───────────────────────────────────────

pub const FIELD_ASSETS: &str = "assets";
pub const FIELD_MONTHLY_TREND: &str = "monthlyTrend";
pub const FIELD_ROW_ORDER: &str = "trendRowOrder";
pub const FIELD_MONTHLY_PLAN: &str = "monthlyPlan";
pub const FIELD_ANNUAL_TREND: &str = "annualTrend";
pub const FIELD_SETTINGS: &str = "settings";
pub const FIELD_NAME: &str = "name";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_BIRTH_DATE: &str = "birthDate";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// One user's nested document as the store sees it: a JSON object whose
/// top-level fields are merged independently.
///
/// Fields this crate doesn't know about are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDocument {
    fields: Map<String, Value>,
}

impl UserDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Shallow merge: each incoming top-level field replaces the existing
    /// one wholesale; fields not mentioned stay as they were.
    pub fn merge(&mut self, incoming: Map<String, Value>) {
        for (key, value) in incoming {
            self.fields.insert(key, value);
        }
    }

    /// Stamp `updatedAt`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.fields
            .insert(FIELD_UPDATED_AT.to_string(), Value::String(now.to_rfc3339()));
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.fields
            .get(FIELD_UPDATED_AT)?
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }

    /// Whole state as a document.
    pub fn from_state(state: &AppState) -> Result<Self, CoreError> {
        Ok(Self::from_fields(section_fields(state, &StateSection::ALL)?))
    }

    /// Rebuild application state, tolerating missing and legacy-shaped fields.
    ///
    /// Never fails: anything unreadable falls back to its empty default and
    /// is logged at `warn`.
    pub fn to_state(&self) -> AppState {
        AppState {
            assets: self.read_assets(),
            trend: self.read_trend(),
            row_order: self.read_row_order(),
            plan: self.read_typed::<MonthlyPlan>(FIELD_MONTHLY_PLAN),
            annual: self.read_annual(),
            profile: self.read_profile(),
            settings: self.read_typed::<Settings>(FIELD_SETTINGS),
        }
    }

    // ── Lenient readers ─────────────────────────────────────────────

    fn read_typed<T>(&self, field: &str) -> T
    where
        T: Default + DeserializeOwned,
    {
        match self.fields.get(field) {
            None | Some(Value::Null) => T::default(),
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                warn!(field, error = %e, "unreadable document field, using default");
                T::default()
            }),
        }
    }

    fn read_assets(&self) -> AssetBuckets {
        let mut buckets = AssetBuckets::default();
        let Some(Value::Object(assets)) = self.fields.get(FIELD_ASSETS) else {
            return buckets;
        };

        for category in Category::ALL {
            let Some(Value::Array(items)) = assets.get(category.key()) else {
                continue;
            };
            let products = buckets.products_mut(category);
            for item in items {
                match read_product(item) {
                    Some(product) => products.push(product),
                    None => warn!(category = category.key(), "dropping unreadable product entry"),
                }
            }
        }
        buckets
    }

    fn read_trend(&self) -> TrendLedger {
        let mut ledger = TrendLedger::new();
        let Some(Value::Object(assets)) = self.fields.get(FIELD_MONTHLY_TREND) else {
            return ledger;
        };

        for (name, months) in assets {
            let Value::Object(months) = months else {
                warn!(asset = %name, "trend entry is not an object, skipping");
                continue;
            };
            for (month, value) in months {
                match month.parse::<MonthKey>() {
                    Ok(key) => ledger.set(name, key, input::delta_from_value(value)),
                    Err(_) => warn!(asset = %name, month = %month, "skipping invalid month key"),
                }
            }
        }
        ledger
    }

    fn read_row_order(&self) -> Vec<RowKey> {
        let Some(Value::Array(keys)) = self.fields.get(FIELD_ROW_ORDER) else {
            return Vec::new();
        };
        keys.iter()
            .filter_map(|k| k.as_str())
            .filter_map(|k| match k.parse::<RowKey>() {
                Ok(key) => Some(key),
                Err(_) => {
                    warn!(key = k, "dropping invalid row key");
                    None
                }
            })
            .collect()
    }

    fn read_annual(&self) -> AnnualTrend {
        let mut annual = AnnualTrend::new();
        let Some(Value::Object(years)) = self.fields.get(FIELD_ANNUAL_TREND) else {
            return annual;
        };
        for (year, months) in years {
            let (Ok(year), Value::Object(months)) = (year.parse::<i32>(), months) else {
                continue;
            };
            for (month, value) in months {
                if let Ok(month) = month.parse::<u32>() {
                    if (1..=12).contains(&month) {
                        annual.insert(year, month, input::amount_from_value(value));
                    }
                }
            }
        }
        annual
    }

    fn read_profile(&self) -> UserProfile {
        let text = |field: &str| {
            self.fields
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        UserProfile {
            name: text(FIELD_NAME),
            gender: text(FIELD_GENDER),
            birth_date: text(FIELD_BIRTH_DATE)
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()),
        }
        .normalized()
    }
}

/// Serialize the requested sections into top-level document fields.
///
/// Profile values are written only when non-blank, so an emptied profile
/// field leaves the stored one in place.
pub fn section_fields(
    state: &AppState,
    sections: &[StateSection],
) -> Result<Map<String, Value>, CoreError> {
    let to_value = |v: Result<Value, serde_json::Error>| {
        v.map_err(|e| CoreError::Serialization(format!("Failed to serialize document field: {e}")))
    };

    let mut fields = Map::new();
    for section in sections {
        match section {
            StateSection::Assets => {
                fields.insert(FIELD_ASSETS.into(), assets_field(&state.assets)?);
            }
            StateSection::Trend => {
                fields.insert(
                    FIELD_MONTHLY_TREND.into(),
                    to_value(serde_json::to_value(&state.trend))?,
                );
            }
            StateSection::RowOrder => {
                fields.insert(
                    FIELD_ROW_ORDER.into(),
                    to_value(serde_json::to_value(&state.row_order))?,
                );
            }
            StateSection::Plan => {
                fields.insert(
                    FIELD_MONTHLY_PLAN.into(),
                    to_value(serde_json::to_value(&state.plan))?,
                );
            }
            StateSection::Annual => {
                fields.insert(
                    FIELD_ANNUAL_TREND.into(),
                    to_value(serde_json::to_value(&state.annual))?,
                );
            }
            StateSection::Settings => {
                fields.insert(
                    FIELD_SETTINGS.into(),
                    to_value(serde_json::to_value(&state.settings))?,
                );
            }
            StateSection::Profile => {
                let profile = state.profile.normalized();
                if let Some(name) = profile.name {
                    fields.insert(FIELD_NAME.into(), Value::String(name));
                }
                if let Some(gender) = profile.gender {
                    fields.insert(FIELD_GENDER.into(), Value::String(gender));
                }
                if let Some(date) = profile.birth_date {
                    fields.insert(
                        FIELD_BIRTH_DATE.into(),
                        Value::String(date.format("%Y-%m-%d").to_string()),
                    );
                }
            }
        }
    }
    Ok(fields)
}

/// The `assets` field for a roster.
pub fn assets_field(assets: &AssetBuckets) -> Result<Value, CoreError> {
    serde_json::to_value(assets)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize document field: {e}")))
}

/// One product from a loosely typed entry. Entries without an id get a
/// fresh one; non-objects are rejected.
fn read_product(item: &Value) -> Option<AssetProduct> {
    let Value::Object(obj) = item else {
        return None;
    };
    let mut obj = obj.clone();
    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    obj.insert("id".into(), Value::String(id));
    if matches!(obj.get("name"), Some(Value::Null)) {
        obj.remove("name");
    }
    if matches!(obj.get("memo"), Some(Value::String(m)) if m.trim().is_empty()) {
        obj.remove("memo");
    }
    serde_json::from_value(Value::Object(obj)).ok()
}
