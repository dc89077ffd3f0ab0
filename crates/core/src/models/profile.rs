use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional personal details stored alongside the asset data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl UserProfile {
    /// Copy with blank strings dropped and names trimmed; only what's left gets written.
    pub fn normalized(&self) -> Self {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            name: clean(&self.name),
            gender: clean(&self.gender),
            birth_date: self.birth_date,
        }
    }
}
