use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::categorize::CategoryClassifier;
use crate::models::{BudgetType, CostCategory, ImportIssue, SpendRecord};

use super::fields::{ColumnMapping, Field};
use super::normalize::{normalize_rows, NormalizeOutcome};
use super::numeric::{parse_auto, NumberFormat};
use super::reader::RawTable;

/// Import a CSV whose headers already use canonical field keys. Unknown
/// columns are ignored; missing columns default per type.
pub(crate) fn import_generic(table: &RawTable, classifier: &CategoryClassifier) -> NormalizeOutcome {
    let mapping = ColumnMapping::identity(&table.headers);
    let categories = resolve_category_column(table, &mapping, classifier);
    normalize_rows(table, &mapping, &categories, NumberFormat::Auto)
}

/// Resolve every distinct value of the category column up front so the
/// normalizer works against a plain value -> category map.
fn resolve_category_column(
    table: &RawTable,
    mapping: &ColumnMapping,
    classifier: &CategoryClassifier,
) -> HashMap<String, CostCategory> {
    let mut resolved = HashMap::new();
    let Some(col) = mapping
        .source_for(Field::CostCategory)
        .and_then(|h| table.col(h))
    else {
        return resolved;
    };
    for row in &table.rows {
        let value = table.cell(row, col).trim();
        if value.is_empty() || resolved.contains_key(value) {
            continue;
        }
        if let Some(category) = classifier.resolve(value) {
            resolved.insert(value.to_string(), category);
        }
    }
    resolved
}

/// The Izvoz aggregate rows all describe the same reporting period, and the
/// target column feeds the following year's budget.
pub(crate) const IZVOZ_PERIOD: &str = "2025-12";
pub(crate) const IZVOZ_TARGET_YEAR: &str = "2026";

const K_EUR: Decimal = Decimal::ONE_THOUSAND;

#[derive(Debug, Default)]
pub(crate) struct IzvozImport {
    pub(crate) records: Vec<SpendRecord>,
    /// Per-category budget targets aggregated from the target column, EUR.
    pub(crate) targets: BTreeMap<CostCategory, Decimal>,
    pub(crate) issues: Vec<ImportIssue>,
}

/// Import the aggregated vendor-spend dialect: one row per category/vendor
/// total, values in k EUR with negative meaning spend.
pub(crate) fn import_izvoz(table: &RawTable, classifier: &CategoryClassifier) -> IzvozImport {
    let mut import = IzvozImport::default();

    let cat_col = table
        .find_col("indirect category")
        .or_else(|| table.find_col("category"));
    let vendor_col = table.find_col("vendor");
    let spend_col = table
        .find_col("ytd spend")
        .or_else(|| table.find_col("spend"));
    let target_col = table.find_col("target");

    let mut unknown_categories = 0usize;

    for (idx, row) in table.rows.iter().enumerate() {
        let raw_category = cat_col.map(|c| table.cell(row, c).trim()).unwrap_or("");
        if raw_category.is_empty() {
            continue;
        }

        let category = match classifier.resolve(raw_category) {
            Some(category) => category,
            None => {
                unknown_categories += 1;
                if unknown_categories <= 5 {
                    import.issues.push(ImportIssue::warn(format!(
                        "Row {}: unknown category \"{raw_category}\" mapped to Miscellaneous Indirect Costs",
                        idx + 1
                    )));
                }
                CostCategory::MiscellaneousIndirect
            }
        };

        let vendor = vendor_col
            .map(|c| table.cell(row, c).trim().to_string())
            .unwrap_or_default();
        // Values arrive in k EUR, negative = spend.
        let spend_eur = spend_col
            .map(|c| parse_auto(table.cell(row, c)).abs() * K_EUR)
            .unwrap_or(Decimal::ZERO);

        if let Some(c) = target_col {
            let target_raw = parse_auto(table.cell(row, c));
            if target_raw != Decimal::ZERO {
                *import.targets.entry(category).or_insert(Decimal::ZERO) +=
                    target_raw.abs() * K_EUR;
            }
        }

        import.records.push(SpendRecord {
            date: IZVOZ_PERIOD.to_string(),
            cost_category: category,
            description: if vendor.is_empty() {
                raw_category.to_string()
            } else {
                vendor.clone()
            },
            supplier: vendor,
            quantity: Decimal::ONE,
            unit_price: spend_eur,
            total_amount: spend_eur,
            budget_type: BudgetType::Actual,
            ..SpendRecord::default()
        });
    }

    if !import.targets.is_empty() {
        import.issues.push(ImportIssue::info(format!(
            "Budget targets for {IZVOZ_TARGET_YEAR} imported ({} categories)",
            import.targets.len()
        )));
    }

    import
}

#[cfg(test)]
#[path = "generic_tests.rs"]
mod tests;
