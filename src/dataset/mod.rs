use std::collections::{BTreeMap, HashSet};

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{CostCategory, SpendRecord};
use crate::store::Store;

/// Year / month / category filter; `None` means "all". Filtered views are
/// derived from the one owned collection, never separately owned.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FilterState {
    pub(crate) year: Option<i32>,
    pub(crate) month: Option<u32>,
    pub(crate) category: Option<CostCategory>,
}

impl FilterState {
    pub(crate) fn matches(&self, record: &SpendRecord) -> bool {
        if let Some(year) = self.year {
            if record.year() != Some(year) {
                return false;
            }
        }
        if let Some(month) = self.month {
            if record.month() != Some(month) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if record.cost_category != category {
                return false;
            }
        }
        true
    }

    pub(crate) fn is_all(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.category.is_none()
    }
}

/// Duplicate-detection key for append imports: the PO number alone when
/// present, else a composite of the identifying fields. A reused PO number
/// therefore always counts as a duplicate, even when amounts differ.
pub(crate) fn natural_key(record: &SpendRecord) -> String {
    if !record.po_number.is_empty() {
        record.po_number.clone()
    } else {
        format!(
            "{}|{}|{}|{}",
            record.date, record.sku, record.supplier, record.total_amount
        )
    }
}

/// Aggregates for the dashboard consumers. Spend counts Actual records only;
/// savings figures sum over every matching record.
#[derive(Debug, Clone)]
pub(crate) struct SpendSummary {
    pub(crate) record_count: usize,
    pub(crate) total_spend: Decimal,
    pub(crate) price_impact: Decimal,
    pub(crate) volume_impact: Decimal,
    pub(crate) insourcing_savings: Decimal,
    pub(crate) unique_suppliers: usize,
    pub(crate) unique_requesters: usize,
    pub(crate) date_range: Option<(String, String)>,
}

impl SpendSummary {
    pub(crate) fn total_savings(&self) -> Decimal {
        self.price_impact + self.volume_impact + self.insourcing_savings
    }
}

/// The single owned record collection. Everything downstream reads from here;
/// persistence goes through an injected `Store`.
#[derive(Debug, Default)]
pub(crate) struct Dataset {
    records: Vec<SpendRecord>,
}

impl Dataset {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn load(store: &Store) -> Result<Self> {
        let mut dataset = Self {
            records: store.load_records()?,
        };
        dataset.reindex();
        Ok(dataset)
    }

    pub(crate) fn save(&self, store: &Store) -> Result<()> {
        store.save_records(&self.records)
    }

    pub(crate) fn records(&self) -> &[SpendRecord] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn replace_all(&mut self, records: Vec<SpendRecord>) {
        self.records = records;
        self.reindex();
    }

    /// Append the batch, skipping records whose natural key already exists in
    /// the collection. Returns (added, skipped).
    pub(crate) fn merge_append(&mut self, batch: Vec<SpendRecord>) -> (usize, usize) {
        let existing: HashSet<String> = self.records.iter().map(natural_key).collect();
        let total = batch.len();
        let mut added = 0;
        for record in batch {
            if existing.contains(&natural_key(&record)) {
                continue;
            }
            self.records.push(record);
            added += 1;
        }
        self.reindex();
        (added, total - added)
    }

    pub(crate) fn add(&mut self, record: SpendRecord) {
        self.records.push(record);
        self.reindex();
    }

    pub(crate) fn update(&mut self, index: usize, record: SpendRecord) -> Result<()> {
        let slot = self
            .records
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("No record at index {index}"))?;
        *slot = record;
        self.reindex();
        Ok(())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<SpendRecord> {
        if index >= self.records.len() {
            anyhow::bail!("No record at index {index}");
        }
        let removed = self.records.remove(index);
        self.reindex();
        Ok(removed)
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    fn reindex(&mut self) {
        for (i, record) in self.records.iter_mut().enumerate() {
            record.record_index = i;
        }
    }

    pub(crate) fn filtered(&self, filter: &FilterState) -> Vec<SpendRecord> {
        self.records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    // ── Analytics ─────────────────────────────────────────────

    pub(crate) fn summary(&self, filter: &FilterState) -> SpendSummary {
        let matching: Vec<&SpendRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();
        let actual: Vec<&SpendRecord> = matching
            .iter()
            .copied()
            .filter(|r| r.is_actual())
            .collect();

        let total_spend = actual.iter().map(|r| r.total_amount).sum();
        let price_impact = matching.iter().map(|r| r.price_impact).sum();
        let volume_impact = matching.iter().map(|r| r.volume_impact).sum();
        let insourcing_savings = matching.iter().map(|r| r.insourcing_savings).sum();

        let unique_suppliers: HashSet<&str> = actual
            .iter()
            .map(|r| r.supplier.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        let unique_requesters: HashSet<&str> = actual
            .iter()
            .map(|r| r.ordered_by.as_str())
            .filter(|s| !s.is_empty())
            .collect();

        let mut dates: Vec<&str> = matching
            .iter()
            .map(|r| r.date.as_str())
            .filter(|d| !d.is_empty())
            .collect();
        dates.sort_unstable();
        let date_range = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => Some((first.to_string(), last.to_string())),
            _ => None,
        };

        SpendSummary {
            record_count: matching.len(),
            total_spend,
            price_impact,
            volume_impact,
            insourcing_savings,
            unique_suppliers: unique_suppliers.len(),
            unique_requesters: unique_requesters.len(),
            date_range,
        }
    }

    /// Actual spend by category, for the summary table.
    pub(crate) fn spend_by_category(&self, filter: &FilterState) -> BTreeMap<CostCategory, Decimal> {
        let mut by_category = BTreeMap::new();
        for record in self.records.iter().filter(|r| filter.matches(r)) {
            if record.is_actual() {
                *by_category
                    .entry(record.cost_category)
                    .or_insert(Decimal::ZERO) += record.total_amount;
            }
        }
        by_category
    }

    /// Actual spend per month, oldest first.
    pub(crate) fn monthly_trend(&self, filter: &FilterState) -> Vec<(String, Decimal)> {
        let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        for record in self.records.iter().filter(|r| filter.matches(r)) {
            if record.is_actual() && !record.date.is_empty() {
                *by_month
                    .entry(record.date.clone())
                    .or_insert(Decimal::ZERO) += record.total_amount;
            }
        }
        by_month.into_iter().collect()
    }
}
