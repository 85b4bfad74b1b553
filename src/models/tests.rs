#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── CostCategory ──────────────────────────────────────────────

#[test]
fn test_category_parse_exact() {
    assert_eq!(
        CostCategory::parse("Production Equipment"),
        Some(CostCategory::ProductionEquipment)
    );
    assert_eq!(
        CostCategory::parse("Clinical, Lab and scientific services"),
        Some(CostCategory::ClinicalLab)
    );
}

#[test]
fn test_category_parse_case_insensitive() {
    assert_eq!(
        CostCategory::parse("office and print"),
        Some(CostCategory::OfficePrint)
    );
    assert_eq!(
        CostCategory::parse("  PROFESSIONAL SERVICES  "),
        Some(CostCategory::ProfessionalServices)
    );
}

#[test]
fn test_category_parse_unknown() {
    assert_eq!(CostCategory::parse("Travel"), None);
    assert_eq!(CostCategory::parse(""), None);
}

#[test]
fn test_category_roundtrip() {
    for c in CostCategory::all() {
        assert_eq!(CostCategory::parse(c.as_str()), Some(*c));
    }
}

#[test]
fn test_category_all_has_six() {
    assert_eq!(CostCategory::all().len(), 6);
}

#[test]
fn test_category_from_string_falls_back_to_misc() {
    let c: CostCategory = String::from("No Such Category").into();
    assert_eq!(c, CostCategory::MiscellaneousIndirect);
}

#[test]
fn test_category_serde_as_display_string() {
    let json = serde_json::to_string(&CostCategory::WarehouseDistribution).unwrap();
    assert_eq!(json, "\"External Warehouse and distribution\"");
    let back: CostCategory = serde_json::from_str(&json).unwrap();
    assert_eq!(back, CostCategory::WarehouseDistribution);
}

// ── BudgetType ────────────────────────────────────────────────

#[test]
fn test_budget_type_parse() {
    assert_eq!(BudgetType::parse("Actual"), BudgetType::Actual);
    assert_eq!(BudgetType::parse("baseline"), BudgetType::Baseline);
    assert_eq!(BudgetType::parse("TARGET"), BudgetType::Target);
}

#[test]
fn test_budget_type_blank_and_unknown_are_actual() {
    assert_eq!(BudgetType::parse(""), BudgetType::Actual);
    assert_eq!(BudgetType::parse("  "), BudgetType::Actual);
    assert_eq!(BudgetType::parse("something else"), BudgetType::Actual);
}

#[test]
fn test_budget_type_default() {
    assert_eq!(BudgetType::default(), BudgetType::Actual);
}

// ── SpendRecord ───────────────────────────────────────────────

#[test]
fn test_record_defaults() {
    let r = SpendRecord::default();
    assert_eq!(r.cost_category, CostCategory::MiscellaneousIndirect);
    assert_eq!(r.budget_type, BudgetType::Actual);
    assert_eq!(r.total_amount, Decimal::ZERO);
    assert!(r.date.is_empty());
    assert!(r.supplier.is_empty());
}

#[test]
fn test_record_year_month() {
    let r = SpendRecord {
        date: "2026-03".into(),
        ..SpendRecord::default()
    };
    assert_eq!(r.year(), Some(2026));
    assert_eq!(r.month(), Some(3));
}

#[test]
fn test_record_year_month_blank_date() {
    let r = SpendRecord::default();
    assert_eq!(r.year(), None);
    assert_eq!(r.month(), None);
}

#[test]
fn test_record_is_actual() {
    let mut r = SpendRecord::default();
    assert!(r.is_actual());
    r.budget_type = BudgetType::Baseline;
    assert!(!r.is_actual());
}

// ── ImportIssue ───────────────────────────────────────────────

#[test]
fn test_issue_constructors() {
    assert_eq!(ImportIssue::info("a").severity, Severity::Info);
    assert_eq!(ImportIssue::warn("b").severity, Severity::Warn);
    assert_eq!(ImportIssue::error("c").severity, Severity::Error);
}

#[test]
fn test_issue_display() {
    let issue = ImportIssue::warn("Row 3: missing date");
    assert_eq!(format!("{issue}"), "[warn] Row 3: missing date");
}

#[test]
fn test_record_serde_roundtrip() {
    let r = SpendRecord {
        date: "2026-01".into(),
        cost_category: CostCategory::ClinicalLab,
        sku: "LAB-0042".into(),
        supplier: "Biorelliance".into(),
        quantity: dec!(10),
        unit_price: dec!(450.00),
        total_amount: dec!(4500.00),
        record_index: 7,
        ..SpendRecord::default()
    };
    let json = serde_json::to_string(&r).unwrap();
    let back: SpendRecord = serde_json::from_str(&json).unwrap();
    // record_index is skipped, everything else survives
    assert_eq!(back.record_index, 0);
    assert_eq!(back.date, r.date);
    assert_eq!(back.total_amount, r.total_amount);
    assert_eq!(back.cost_category, r.cost_category);
}

#[test]
fn test_record_deserialize_partial_blob() {
    // Older or hand-edited blobs may omit fields; they default instead of failing.
    let json = r#"{"date":"2026-01","cost_category":"Production Equipment"}"#;
    let r: SpendRecord = serde_json::from_str(json).unwrap();
    assert_eq!(r.cost_category, CostCategory::ProductionEquipment);
    assert_eq!(r.quantity, Decimal::ZERO);
    assert!(r.po_number.is_empty());
}

// ── BudgetTargets ─────────────────────────────────────────────

#[test]
fn test_targets_get_set() {
    let mut t = BudgetTargets::default();
    assert!(t.is_empty());
    t.set("2026", CostCategory::ClinicalLab, dec!(250000));
    assert_eq!(t.get("2026", CostCategory::ClinicalLab), Some(dec!(250000)));
    assert_eq!(t.get("2025", CostCategory::ClinicalLab), None);
    assert_eq!(t.get("2026", CostCategory::OfficePrint), None);
}

#[test]
fn test_targets_merge_year_overwrites() {
    let mut t = BudgetTargets::default();
    t.set("2026", CostCategory::ClinicalLab, dec!(100));
    let mut batch = std::collections::BTreeMap::new();
    batch.insert(CostCategory::ClinicalLab, dec!(200));
    batch.insert(CostCategory::OfficePrint, dec!(50));
    t.merge_year("2026", &batch);
    assert_eq!(t.get("2026", CostCategory::ClinicalLab), Some(dec!(200)));
    assert_eq!(t.get("2026", CostCategory::OfficePrint), Some(dec!(50)));
}

#[test]
fn test_targets_merge_empty_is_noop() {
    let mut t = BudgetTargets::default();
    t.merge_year("2026", &std::collections::BTreeMap::new());
    assert!(t.is_empty());
}

#[test]
fn test_targets_serde_shape() {
    let mut t = BudgetTargets::default();
    t.set("2026", CostCategory::OfficePrint, dec!(12000));
    let json = serde_json::to_string(&t).unwrap();
    // Nested year -> category -> number mapping
    assert!(json.contains("\"2026\""));
    assert!(json.contains("\"Office and Print\""));
    let back: BudgetTargets = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
}
