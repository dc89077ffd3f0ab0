use serde::{Deserialize, Serialize};

/// The fixed set of buckets a product can live in.
///
/// Serialized with the document keys used by the stored user document
/// (`depositSavings`, `trustISA`, ...), so a `Category` round-trips through
/// the same strings that appear as field names under `assets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// 예금/적금
    #[serde(rename = "depositSavings")]
    DepositSavings,
    /// 신탁/ISA
    #[serde(rename = "trustISA")]
    TrustIsa,
    /// 보험/공제
    #[serde(rename = "insurance")]
    Insurance,
    /// 퇴직연금
    #[serde(rename = "pension")]
    Pension,
    /// 투자
    #[serde(rename = "investment")]
    Investment,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::DepositSavings,
        Category::TrustIsa,
        Category::Insurance,
        Category::Pension,
        Category::Investment,
    ];

    /// Field name used in the stored document.
    pub fn key(&self) -> &'static str {
        match self {
            Category::DepositSavings => "depositSavings",
            Category::TrustIsa => "trustISA",
            Category::Insurance => "insurance",
            Category::Pension => "pension",
            Category::Investment => "investment",
        }
    }

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::DepositSavings => "예금/적금",
            Category::TrustIsa => "신탁/ISA",
            Category::Insurance => "보험/공제",
            Category::Pension => "퇴직연금",
            Category::Investment => "투자",
        }
    }

    /// Look up a category by its document key.
    pub fn from_key(key: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
