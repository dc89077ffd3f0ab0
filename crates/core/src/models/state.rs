use serde::{Deserialize, Serialize};

use super::annual::AnnualTrend;
use super::category::Category;
use super::order::RowKey;
use super::plan::MonthlyPlan;
use super::product::AssetProduct;
use super::profile::UserProfile;
use super::settings::Settings;
use super::trend::TrendLedger;

/// Products grouped by category. Totals are always derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBuckets {
    #[serde(rename = "depositSavings", default)]
    pub deposit_savings: Vec<AssetProduct>,
    #[serde(rename = "trustISA", default)]
    pub trust_isa: Vec<AssetProduct>,
    #[serde(default)]
    pub insurance: Vec<AssetProduct>,
    #[serde(default)]
    pub pension: Vec<AssetProduct>,
    #[serde(default)]
    pub investment: Vec<AssetProduct>,
}

impl AssetBuckets {
    pub fn products(&self, category: Category) -> &Vec<AssetProduct> {
        match category {
            Category::DepositSavings => &self.deposit_savings,
            Category::TrustIsa => &self.trust_isa,
            Category::Insurance => &self.insurance,
            Category::Pension => &self.pension,
            Category::Investment => &self.investment,
        }
    }

    pub fn products_mut(&mut self, category: Category) -> &mut Vec<AssetProduct> {
        match category {
            Category::DepositSavings => &mut self.deposit_savings,
            Category::TrustIsa => &mut self.trust_isa,
            Category::Insurance => &mut self.insurance,
            Category::Pension => &mut self.pension,
            Category::Investment => &mut self.investment,
        }
    }

    /// Every product with its category, in category display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &AssetProduct)> {
        Category::ALL
            .into_iter()
            .flat_map(move |c| self.products(c).iter().map(move |p| (c, p)))
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.products(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The independently persisted parts of [`AppState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateSection {
    Assets,
    Trend,
    RowOrder,
    Plan,
    Annual,
    Profile,
    Settings,
}

impl StateSection {
    pub const ALL: [StateSection; 7] = [
        StateSection::Assets,
        StateSection::Trend,
        StateSection::RowOrder,
        StateSection::Plan,
        StateSection::Annual,
        StateSection::Profile,
        StateSection::Settings,
    ];
}

/// Everything one user owns. Owned by a single `AssetHub`; everything but
/// `settings` changes only through `services::reducer::apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub assets: AssetBuckets,
    pub trend: TrendLedger,
    pub row_order: Vec<RowKey>,
    pub plan: MonthlyPlan,
    pub annual: AnnualTrend,
    pub profile: UserProfile,
    pub settings: Settings,
}
