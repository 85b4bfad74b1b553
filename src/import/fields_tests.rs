#![allow(clippy::unwrap_used)]

use super::*;

fn h(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// ── Field ─────────────────────────────────────────────────────

#[test]
fn test_field_key_roundtrip() {
    for field in Field::all() {
        assert_eq!(Field::from_key(field.key()), Some(*field));
    }
}

#[test]
fn test_field_from_key_unknown() {
    assert_eq!(Field::from_key("item_description"), None);
    assert_eq!(Field::from_key(""), None);
}

#[test]
fn test_field_all_count() {
    assert_eq!(Field::all().len(), 18);
}

// ── SAP synonym table ─────────────────────────────────────────

#[test]
fn test_sap_target_english_and_german() {
    assert_eq!(sap_target("Net Value"), Some(MapTarget::Field(Field::TotalAmount)));
    assert_eq!(sap_target("Nettowert"), Some(MapTarget::Field(Field::TotalAmount)));
    assert_eq!(sap_target("Bestellmenge"), Some(MapTarget::Field(Field::Quantity)));
    assert_eq!(sap_target("EBELN"), Some(MapTarget::Field(Field::PoNumber)));
    assert_eq!(sap_target("Warengruppe"), Some(MapTarget::Field(Field::CostCategory)));
}

#[test]
fn test_sap_target_reference_columns() {
    assert_eq!(sap_target("WAERS"), Some(MapTarget::Currency));
    assert_eq!(sap_target("EBELP"), Some(MapTarget::PoItem));
    assert_eq!(sap_target("BUKRS"), Some(MapTarget::CompanyCode));
}

#[test]
fn test_sap_target_case_sensitive() {
    assert_eq!(sap_target("net value"), None);
    assert_eq!(sap_target("NET VALUE"), None);
}

#[test]
fn test_sap_target_unknown() {
    assert_eq!(sap_target("My Custom Column"), None);
}

// ── auto_map ──────────────────────────────────────────────────

#[test]
fn test_auto_map_sap_scenario() {
    let headers = h(&[
        "Purchasing Document",
        "Material",
        "Net Value",
        "Net Price",
        "Bestellmenge",
    ]);
    let mapping = ColumnMapping::auto_map(&headers);
    assert_eq!(mapping.get("Net Value"), MapTarget::Field(Field::TotalAmount));
    assert_eq!(mapping.get("Bestellmenge"), MapTarget::Field(Field::Quantity));
    assert_eq!(mapping.get("Purchasing Document"), MapTarget::Field(Field::PoNumber));
    assert_eq!(mapping.get("Material"), MapTarget::Field(Field::Sku));
    assert_eq!(mapping.mapped_count(), 5);
}

#[test]
fn test_auto_map_first_column_wins() {
    // Two date-ish columns; only the first claims the Date field
    let headers = h(&["PO Date", "Document Date", "Net Value"]);
    let mapping = ColumnMapping::auto_map(&headers);
    assert_eq!(mapping.get("PO Date"), MapTarget::Field(Field::Date));
    assert_eq!(mapping.get("Document Date"), MapTarget::Skip);
}

#[test]
fn test_auto_map_reference_targets_not_exclusive() {
    let headers = h(&["WAERS", "Document Currency", "Net Value"]);
    let mapping = ColumnMapping::auto_map(&headers);
    assert_eq!(mapping.get("WAERS"), MapTarget::Currency);
    assert_eq!(mapping.get("Document Currency"), MapTarget::Currency);
}

#[test]
fn test_auto_map_unknown_columns_skipped() {
    let headers = h(&["Net Value", "Mystery Column"]);
    let mapping = ColumnMapping::auto_map(&headers);
    assert_eq!(mapping.get("Mystery Column"), MapTarget::Skip);
    assert_eq!(mapping.mapped_count(), 1);
}

// ── identity mapping ──────────────────────────────────────────

#[test]
fn test_identity_maps_canonical_keys() {
    let headers = h(&["date", "supplier", "total_amount", "not_a_field"]);
    let mapping = ColumnMapping::identity(&headers);
    assert_eq!(mapping.get("date"), MapTarget::Field(Field::Date));
    assert_eq!(mapping.get("total_amount"), MapTarget::Field(Field::TotalAmount));
    assert_eq!(mapping.get("not_a_field"), MapTarget::Skip);
    assert_eq!(mapping.mapped_count(), 3);
}

// ── overrides and lookups ─────────────────────────────────────

#[test]
fn test_set_overrides_existing() {
    let headers = h(&["Net Value"]);
    let mut mapping = ColumnMapping::auto_map(&headers);
    mapping.set("Net Value", MapTarget::Skip);
    assert_eq!(mapping.get("Net Value"), MapTarget::Skip);
    assert_eq!(mapping.mapped_count(), 0);
}

#[test]
fn test_set_adds_new_column() {
    let mut mapping = ColumnMapping::default();
    mapping.set("Custom", MapTarget::Field(Field::Notes));
    assert_eq!(mapping.get("Custom"), MapTarget::Field(Field::Notes));
}

#[test]
fn test_source_for_first_wins() {
    let mut mapping = ColumnMapping::default();
    mapping.set("Col A", MapTarget::Field(Field::Supplier));
    mapping.set("Col B", MapTarget::Field(Field::Supplier));
    assert_eq!(mapping.source_for(Field::Supplier), Some("Col A"));
    assert_eq!(mapping.source_for(Field::Date), None);
}

#[test]
fn test_amount_sources() {
    let headers = h(&["Net Value", "Bestellmenge", "Net Price", "Vendor"]);
    let mapping = ColumnMapping::auto_map(&headers);
    let sources = mapping.amount_sources();
    assert_eq!(sources.len(), 3);
    assert!(sources.contains(&"Net Value"));
    assert!(sources.contains(&"Bestellmenge"));
    assert!(sources.contains(&"Net Price"));
    assert!(!sources.contains(&"Vendor"));
}
