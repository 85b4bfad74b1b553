use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{BudgetType, CostCategory, ImportIssue, SpendRecord};

use super::dates::month_key;
use super::fields::{ColumnMapping, Field};
use super::numeric::NumberFormat;
use super::reader::RawTable;

/// Normalized batch plus everything worth telling the user about it.
#[derive(Debug, Default)]
pub(crate) struct NormalizeOutcome {
    pub(crate) records: Vec<SpendRecord>,
    pub(crate) issues: Vec<ImportIssue>,
}

impl NormalizeOutcome {
    pub(crate) fn warn_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == crate::models::Severity::Warn)
            .count()
    }
}

/// Per-kind reporting cap: the first occurrences are reported individually,
/// the rest are handled silently.
const ISSUE_CAP: usize = 5;

/// Build canonical records from tokenized rows under a resolved column
/// mapping, category-value mapping, and numeric convention.
///
/// Unmapped text fields default to "", numerics to zero. The total is
/// back-filled as quantity x unit price only when the source total is exactly
/// zero and both factors are positive. Rows with zero total and no SKU,
/// supplier, or description are structural blanks and are dropped, not
/// emitted.
pub(crate) fn normalize_rows(
    table: &RawTable,
    mapping: &ColumnMapping,
    categories: &HashMap<String, CostCategory>,
    format: NumberFormat,
) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();

    let columns: Vec<(Field, usize)> = Field::all()
        .iter()
        .filter_map(|f| {
            let source = mapping.source_for(*f)?;
            Some((*f, table.col(source)?))
        })
        .collect();

    let mut unknown_categories = 0usize;
    let mut missing_dates = 0usize;
    let mut zero_amounts = 0usize;
    let mut blank_rows = 0usize;

    for (idx, row) in table.rows.iter().enumerate() {
        let mut record = SpendRecord::default();
        for (field, col) in &columns {
            let raw = table.cell(row, *col);
            match field {
                Field::Date => record.date = month_key(raw),
                Field::CostCategory => {
                    let value = raw.trim();
                    match categories.get(value) {
                        Some(category) => record.cost_category = *category,
                        None => {
                            record.cost_category = CostCategory::MiscellaneousIndirect;
                            if !value.is_empty() {
                                unknown_categories += 1;
                                if unknown_categories <= ISSUE_CAP {
                                    outcome.issues.push(ImportIssue::warn(format!(
                                        "Row {}: unknown category \"{value}\" mapped to Miscellaneous Indirect Costs",
                                        idx + 1
                                    )));
                                }
                            }
                        }
                    }
                }
                Field::BudgetType => record.budget_type = BudgetType::parse(raw),
                Field::Quantity => record.quantity = format.parse(raw),
                Field::UnitPrice => record.unit_price = format.parse(raw),
                Field::TotalAmount => record.total_amount = format.parse(raw),
                Field::PriceImpact => record.price_impact = format.parse(raw),
                Field::VolumeImpact => record.volume_impact = format.parse(raw),
                Field::InsourcingSavings => record.insourcing_savings = format.parse(raw),
                Field::SubCategory => record.sub_category = raw.trim().to_string(),
                Field::Sku => record.sku = raw.trim().to_string(),
                Field::Description => record.description = raw.trim().to_string(),
                Field::Supplier => record.supplier = raw.trim().to_string(),
                Field::OrderedBy => record.ordered_by = raw.trim().to_string(),
                Field::Department => record.department = raw.trim().to_string(),
                Field::CostCenter => record.cost_center = raw.trim().to_string(),
                Field::PoNumber => record.po_number = raw.trim().to_string(),
                Field::Notes => record.notes = raw.trim().to_string(),
            }
        }

        if record.total_amount == Decimal::ZERO
            && record.quantity > Decimal::ZERO
            && record.unit_price > Decimal::ZERO
        {
            record.total_amount = record.quantity * record.unit_price;
        }

        if record.date.is_empty() {
            missing_dates += 1;
            if missing_dates <= ISSUE_CAP {
                outcome
                    .issues
                    .push(ImportIssue::warn(format!("Row {}: missing date", idx + 1)));
            }
        }
        if record.total_amount == Decimal::ZERO {
            zero_amounts += 1;
            if zero_amounts <= ISSUE_CAP {
                outcome
                    .issues
                    .push(ImportIssue::info(format!("Row {}: zero amount", idx + 1)));
            }
        }

        // A row with no amount and no identifying text is structure, not data.
        if record.total_amount == Decimal::ZERO
            && record.sku.is_empty()
            && record.supplier.is_empty()
            && record.description.is_empty()
        {
            blank_rows += 1;
            continue;
        }

        outcome.records.push(record);
    }

    if blank_rows > 0 {
        outcome
            .issues
            .push(ImportIssue::info(format!("{blank_rows} empty rows removed")));
    }

    outcome
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
