use std::path::Path;

use anyhow::{Context, Result};

use crate::import::Field;
use crate::models::SpendRecord;

fn field_value(record: &SpendRecord, field: Field) -> String {
    match field {
        Field::Date => record.date.clone(),
        Field::CostCategory => record.cost_category.as_str().to_string(),
        Field::SubCategory => record.sub_category.clone(),
        Field::Sku => record.sku.clone(),
        Field::Description => record.description.clone(),
        Field::Supplier => record.supplier.clone(),
        Field::OrderedBy => record.ordered_by.clone(),
        Field::Department => record.department.clone(),
        Field::CostCenter => record.cost_center.clone(),
        Field::PoNumber => record.po_number.clone(),
        Field::Quantity => record.quantity.to_string(),
        Field::UnitPrice => record.unit_price.to_string(),
        Field::TotalAmount => record.total_amount.to_string(),
        Field::BudgetType => record.budget_type.as_str().to_string(),
        Field::PriceImpact => record.price_impact.to_string(),
        Field::VolumeImpact => record.volume_impact.to_string(),
        Field::InsourcingSavings => record.insourcing_savings.to_string(),
        Field::Notes => record.notes.clone(),
    }
}

/// Serialize records in canonical field order. The csv writer applies
/// RFC 4180 quoting: fields containing commas, quotes, or newlines are
/// quoted with embedded quotes doubled.
pub(crate) fn to_csv(records: &[SpendRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(Field::all().iter().map(|f| f.key()))?;
    for record in records {
        wtr.write_record(Field::all().iter().map(|f| field_value(record, *f)))?;
    }
    let bytes = wtr
        .into_inner()
        .context("Failed to finish CSV serialization")?;
    String::from_utf8(bytes).context("Exported CSV was not valid UTF-8")
}

pub(crate) fn write_csv(path: &Path, records: &[SpendRecord]) -> Result<usize> {
    let csv = to_csv(records)?;
    std::fs::write(path, csv)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(records.len())
}

/// Blank import template: canonical headers plus one illustrative row.
pub(crate) fn template_csv() -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(Field::all().iter().map(|f| f.key()))?;
    wtr.write_record([
        "2026-01",
        "Clinical, Lab and scientific services",
        "Analytical testing",
        "LAB-0042",
        "HPLC Column C18 250mm",
        "Biorelliance",
        "Jan Novak",
        "QC Laboratory",
        "CC-4200",
        "PO-2026-0142",
        "10",
        "450.00",
        "4500.00",
        "Actual",
        "-120.00",
        "-50.00",
        "0",
        "Sample entry",
    ])?;
    let bytes = wtr
        .into_inner()
        .context("Failed to finish CSV serialization")?;
    String::from_utf8(bytes).context("Template CSV was not valid UTF-8")
}

pub(crate) fn write_template(path: &Path) -> Result<()> {
    let csv = template_csv()?;
    std::fs::write(path, csv)
        .with_context(|| format!("Failed to write template file: {}", path.display()))
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
