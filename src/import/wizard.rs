use std::collections::{HashMap, HashSet};

use anyhow::Result;
use rust_decimal::Decimal;

use crate::categorize::{keyword_guess, CategoryClassifier};
use crate::dataset::Dataset;
use crate::models::{CostCategory, ImportIssue, SpendRecord};
use crate::store::Store;

use super::detect::{detect_format, SourceFormat};
use super::fields::{ColumnMapping, Field, MapTarget};
use super::normalize::{normalize_rows, NormalizeOutcome};
use super::numeric::{detect_number_format, NumberFormat};
use super::reader::RawTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum WizardStep {
    Detect,
    MapColumns,
    MapCategories,
    ReviewSettings,
    Execute,
}

impl WizardStep {
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Detect => 0,
            Self::MapColumns => 1,
            Self::MapCategories => 2,
            Self::ReviewSettings => 3,
            Self::Execute => 4,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        match self {
            Self::Detect => "Upload & Detect",
            Self::MapColumns => "Map Columns",
            Self::MapCategories => "Map Categories",
            Self::ReviewSettings => "Settings & Preview",
            Self::Execute => "Import",
        }
    }
}

/// Live statistics over the current preview, recomputed from the full row set.
#[derive(Debug, Clone)]
pub(crate) struct PreviewStats {
    pub(crate) row_count: usize,
    pub(crate) record_count: usize,
    pub(crate) total_amount: Decimal,
    pub(crate) unique_suppliers: usize,
    pub(crate) unique_skus: usize,
    pub(crate) date_range: Option<(String, String)>,
}

#[derive(Debug)]
pub(crate) struct ImportSummary {
    pub(crate) added: usize,
    pub(crate) skipped_duplicates: usize,
    /// Persistence warnings raised while committing; the normalization
    /// issues stay on the preview the user already reviewed.
    pub(crate) issues: Vec<ImportIssue>,
}

/// The five-step SAP import flow. The wizard owns the parsed rows and every
/// mutable setting; each transition is a plain method on this value, and the
/// preview is always a fresh run of the mapping -> categories -> normalize
/// pipeline against the current settings.
pub(crate) struct ImportWizard {
    step: WizardStep,
    table: RawTable,
    detected_sap: bool,
    mapping: ColumnMapping,
    category_mapping: HashMap<String, CostCategory>,
    number_format: NumberFormat,
    preview: Option<NormalizeOutcome>,
}

impl ImportWizard {
    /// Seed from tokenized rows: auto-map columns from the synonym table,
    /// sample the numeric convention, and preload the saved category
    /// vocabulary.
    pub(crate) fn start(
        table: RawTable,
        saved_mappings: &HashMap<String, CostCategory>,
    ) -> Result<Self> {
        if table.is_empty() {
            anyhow::bail!("No data found in file");
        }
        let detected_sap = detect_format(&table.headers) == SourceFormat::Sap;
        let mapping = ColumnMapping::auto_map(&table.headers);
        let number_format = detect_number_format(&table, &mapping);
        Ok(Self {
            step: WizardStep::Detect,
            table,
            detected_sap,
            mapping,
            category_mapping: saved_mappings.clone(),
            number_format,
            preview: None,
        })
    }

    pub(crate) fn step(&self) -> WizardStep {
        self.step
    }

    pub(crate) fn detected_sap(&self) -> bool {
        self.detected_sap
    }

    pub(crate) fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub(crate) fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub(crate) fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    pub(crate) fn category_mapping(&self) -> &HashMap<String, CostCategory> {
        &self.category_mapping
    }

    pub(crate) fn preview(&self) -> Option<&NormalizeOutcome> {
        self.preview.as_ref()
    }

    pub(crate) fn preview_records(&self, limit: usize) -> &[SpendRecord] {
        match &self.preview {
            Some(outcome) => &outcome.records[..outcome.records.len().min(limit)],
            None => &[],
        }
    }

    /// Advance one step. Entering MapCategories seeds guesses for unseen
    /// values; entering ReviewSettings computes the preview. The terminal
    /// transition happens in `execute`, never here.
    pub(crate) fn next(&mut self) {
        self.step = match self.step {
            WizardStep::Detect => WizardStep::MapColumns,
            WizardStep::MapColumns => {
                self.seed_category_guesses();
                WizardStep::MapCategories
            }
            WizardStep::MapCategories => {
                self.refresh_preview();
                WizardStep::ReviewSettings
            }
            WizardStep::ReviewSettings => WizardStep::ReviewSettings,
            WizardStep::Execute => WizardStep::Execute,
        };
    }

    pub(crate) fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Detect => WizardStep::Detect,
            WizardStep::MapColumns => WizardStep::Detect,
            WizardStep::MapCategories => WizardStep::MapColumns,
            WizardStep::ReviewSettings => WizardStep::MapCategories,
            WizardStep::Execute => WizardStep::Execute,
        };
    }

    pub(crate) fn set_column(&mut self, header: &str, target: MapTarget) {
        self.mapping.set(header, target);
        self.refresh_if_reviewing();
    }

    pub(crate) fn set_category(&mut self, raw: &str, category: CostCategory) {
        self.category_mapping.insert(raw.trim().to_string(), category);
        self.refresh_if_reviewing();
    }

    pub(crate) fn set_number_format(&mut self, format: NumberFormat) {
        self.number_format = format;
        self.refresh_if_reviewing();
    }

    /// Distinct values of the column currently mapped to the category field,
    /// most frequent first.
    pub(crate) fn category_values(&self) -> Vec<(String, usize)> {
        let Some(col) = self
            .mapping
            .source_for(Field::CostCategory)
            .and_then(|h| self.table.col(h))
        else {
            return Vec::new();
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &self.table.rows {
            let value = self.table.cell(row, col).trim();
            if !value.is_empty() {
                *counts.entry(value.to_string()).or_insert(0) += 1;
            }
        }
        let mut values: Vec<(String, usize)> = counts.into_iter().collect();
        values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        values
    }

    fn seed_category_guesses(&mut self) {
        for (value, _) in self.category_values() {
            if !self.category_mapping.contains_key(&value) {
                let guess = CostCategory::parse(&value).or_else(|| keyword_guess(&value));
                if let Some(category) = guess {
                    self.category_mapping.insert(value, category);
                }
            }
        }
    }

    fn refresh_if_reviewing(&mut self) {
        if self.step == WizardStep::ReviewSettings {
            self.refresh_preview();
        }
    }

    /// Re-run the whole pipeline over the complete row set with the current
    /// settings. Called on entering ReviewSettings and on every settings
    /// change there.
    pub(crate) fn refresh_preview(&mut self) {
        self.preview = Some(normalize_rows(
            &self.table,
            &self.mapping,
            &self.category_mapping,
            self.number_format,
        ));
    }

    pub(crate) fn stats(&self) -> Option<PreviewStats> {
        let outcome = self.preview.as_ref()?;
        let records = &outcome.records;

        let total_amount = records.iter().map(|r| r.total_amount).sum();
        let unique_suppliers: HashSet<&str> = records
            .iter()
            .map(|r| r.supplier.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        let unique_skus: HashSet<&str> = records
            .iter()
            .map(|r| r.sku.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        let mut dates: Vec<&str> = records
            .iter()
            .map(|r| r.date.as_str())
            .filter(|d| !d.is_empty())
            .collect();
        dates.sort_unstable();
        let date_range = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => Some((first.to_string(), last.to_string())),
            _ => None,
        };

        Some(PreviewStats {
            row_count: self.table.row_count(),
            record_count: records.len(),
            total_amount,
            unique_suppliers: unique_suppliers.len(),
            unique_skus: unique_skus.len(),
            date_range,
        })
    }

    /// Terminal transition: persist the learned category vocabulary, merge
    /// the normalized batch into the dataset (dedup applies), and finish.
    /// Refused with no partial commit when normalization yields no records;
    /// the wizard stays in ReviewSettings.
    pub(crate) fn execute(
        &mut self,
        dataset: &mut Dataset,
        classifier: &mut CategoryClassifier,
        store: &Store,
    ) -> Result<ImportSummary> {
        if self.step != WizardStep::ReviewSettings {
            anyhow::bail!("Import can only be executed from the review step");
        }

        self.refresh_preview();
        let outcome = match self.preview.take() {
            Some(outcome) => outcome,
            None => NormalizeOutcome::default(),
        };

        if outcome.records.is_empty() {
            self.preview = Some(outcome);
            anyhow::bail!("No records to import after processing");
        }

        let mut issues = Vec::new();

        classifier.merge(&self.category_mapping);
        if let Err(e) = store.save_category_mappings(classifier.mappings()) {
            issues.push(ImportIssue::warn(format!(
                "Failed to save category mappings: {e:#}"
            )));
        }

        let (added, skipped_duplicates) = dataset.merge_append(outcome.records);
        if let Err(e) = dataset.save(store) {
            issues.push(ImportIssue::warn(format!("Failed to save data: {e:#}")));
        }

        self.step = WizardStep::Execute;
        Ok(ImportSummary {
            added,
            skipped_duplicates,
            issues,
        })
    }
}

#[cfg(test)]
#[path = "wizard_tests.rs"]
mod tests;
