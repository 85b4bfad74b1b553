use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CostCategory;

/// Planned spend ceilings keyed by (year, category), in EUR. Persisted
/// independently of the record collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetTargets(BTreeMap<String, BTreeMap<String, Decimal>>);

impl BudgetTargets {
    pub fn get(&self, year: &str, category: CostCategory) -> Option<Decimal> {
        self.0.get(year)?.get(category.as_str()).copied()
    }

    pub fn set(&mut self, year: &str, category: CostCategory, amount: Decimal) {
        self.0
            .entry(year.to_string())
            .or_default()
            .insert(category.as_str().to_string(), amount);
    }

    /// Merge a batch of per-category targets into one year, overwriting
    /// existing entries for the same categories.
    pub fn merge_year(&mut self, year: &str, targets: &BTreeMap<CostCategory, Decimal>) {
        if targets.is_empty() {
            return;
        }
        let entry = self.0.entry(year.to_string()).or_default();
        for (category, amount) in targets {
            entry.insert(category.as_str().to_string(), *amount);
        }
    }

    pub fn for_year(&self, year: &str) -> Option<&BTreeMap<String, Decimal>> {
        self.0.get(year)
    }

    pub fn years(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
