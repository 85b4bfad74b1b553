use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CostCategory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BudgetType {
    #[default]
    Actual,
    Baseline,
    Target,
}

impl BudgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Actual => "Actual",
            Self::Baseline => "Baseline",
            Self::Target => "Target",
        }
    }

    /// Blank and unrecognized values both mean Actual.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Self::Baseline,
            "target" => Self::Target,
            _ => Self::Actual,
        }
    }
}

impl From<String> for BudgetType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<BudgetType> for String {
    fn from(b: BudgetType) -> Self {
        b.as_str().to_string()
    }
}

impl std::fmt::Display for BudgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized spend line. All amounts are EUR; impact fields are signed
/// (negative = saving, positive = cost increase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRecord {
    /// Format: "YYYY-MM" (month granularity; day components are discarded on import)
    pub date: String,
    pub cost_category: CostCategory,
    #[serde(default)]
    pub sub_category: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub ordered_by: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub cost_center: String,
    #[serde(default)]
    pub po_number: String,
    #[serde(default)]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub budget_type: BudgetType,
    #[serde(default)]
    pub price_impact: Decimal,
    #[serde(default)]
    pub volume_impact: Decimal,
    #[serde(default)]
    pub insourcing_savings: Decimal,
    #[serde(default)]
    pub notes: String,
    /// Position cache, recomputed on every collection mutation. Never persisted.
    #[serde(skip)]
    pub record_index: usize,
}

impl Default for SpendRecord {
    fn default() -> Self {
        Self {
            date: String::new(),
            cost_category: CostCategory::MiscellaneousIndirect,
            sub_category: String::new(),
            sku: String::new(),
            description: String::new(),
            supplier: String::new(),
            ordered_by: String::new(),
            department: String::new(),
            cost_center: String::new(),
            po_number: String::new(),
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            budget_type: BudgetType::Actual,
            price_impact: Decimal::ZERO,
            volume_impact: Decimal::ZERO,
            insourcing_savings: Decimal::ZERO,
            notes: String::new(),
            record_index: 0,
        }
    }
}

impl SpendRecord {
    pub fn is_actual(&self) -> bool {
        self.budget_type == BudgetType::Actual
    }

    pub fn year(&self) -> Option<i32> {
        self.date.get(0..4)?.parse().ok()
    }

    pub fn month(&self) -> Option<u32> {
        self.date.get(5..7)?.parse().ok()
    }
}
