use std::collections::HashMap;

use crate::models::CostCategory;

/// Ordered (keywords, category) pairs; the first group with any
/// case-insensitive substring hit wins. Order is part of the contract.
const KEYWORD_RULES: &[(&[&str], CostCategory)] = &[
    (
        &["lab", "clinical", "test", "analyt", "scientific"],
        CostCategory::ClinicalLab,
    ),
    (
        &["equip", "machine", "reactor", "prod", "manufactur"],
        CostCategory::ProductionEquipment,
    ),
    (
        &["warehouse", "logistics", "distrib", "transport", "storage"],
        CostCategory::WarehouseDistribution,
    ),
    (
        &["consult", "professional", "advisory", "legal", "audit"],
        CostCategory::ProfessionalServices,
    ),
    (
        &["office", "print", "stationery", "paper", "toner"],
        CostCategory::OfficePrint,
    ),
    (
        &["misc", "other", "facility", "utilit", "general"],
        CostCategory::MiscellaneousIndirect,
    ),
];

/// Best-effort category guess for a raw source value.
pub(crate) fn keyword_guess(raw: &str) -> Option<CostCategory> {
    let lower = raw.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }
    for (keywords, category) in KEYWORD_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return Some(*category);
        }
    }
    None
}

/// Maps raw source category values to canonical categories. User-confirmed
/// mappings are learned once and reused across imports; the persistence
/// backend is injected at the call sites, not reached from here.
#[derive(Debug, Default)]
pub(crate) struct CategoryClassifier {
    learned: HashMap<String, CostCategory>,
}

impl CategoryClassifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_mappings(learned: HashMap<String, CostCategory>) -> Self {
        Self { learned }
    }

    /// Resolution order: learned mapping for the exact value, then an exact
    /// canonical-name match, then the keyword heuristic. `None` means the
    /// value needs user input (the normalizer's ultimate fallback is
    /// Miscellaneous Indirect Costs).
    pub(crate) fn resolve(&self, raw: &str) -> Option<CostCategory> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(category) = self.learned.get(value) {
            return Some(*category);
        }
        if let Some(category) = CostCategory::parse(value) {
            return Some(category);
        }
        keyword_guess(value)
    }

    pub(crate) fn learn(&mut self, raw: &str, category: CostCategory) {
        let value = raw.trim();
        if !value.is_empty() {
            self.learned.insert(value.to_string(), category);
        }
    }

    /// Merge a batch of confirmed mappings (newest wins).
    pub(crate) fn merge(&mut self, confirmed: &HashMap<String, CostCategory>) {
        for (raw, category) in confirmed {
            self.learn(raw, *category);
        }
    }

    pub(crate) fn mappings(&self) -> &HashMap<String, CostCategory> {
        &self.learned
    }

    pub(crate) fn len(&self) -> usize {
        self.learned.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.learned.is_empty()
    }
}
