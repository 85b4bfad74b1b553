#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::BudgetType;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rec(
    category: CostCategory,
    sku: &str,
    supplier: &str,
    date: &str,
    total: Decimal,
) -> SpendRecord {
    SpendRecord {
        date: date.into(),
        cost_category: category,
        sku: sku.into(),
        supplier: supplier.into(),
        total_amount: total,
        ..SpendRecord::default()
    }
}

#[test]
fn test_empty_records_no_findings() {
    assert!(analyze(&[]).is_empty());
}

#[test]
fn test_single_source_risk() {
    let records = vec![rec(
        CostCategory::ClinicalLab,
        "LAB-1",
        "OnlyOne",
        "2026-01",
        dec!(25000),
    )];
    let findings = analyze(&records);
    assert_eq!(findings.len(), 1);
    let f = &findings[0];
    assert_eq!(f.kind, FindingKind::SingleSourceRisk);
    assert_eq!(f.priority, Priority::Medium);
    assert_eq!(f.affected, vec!["OnlyOne".to_string()]);
    assert_eq!(f.estimated_savings, dec!(2000));
    assert!(f.detail.contains("OnlyOne"));
}

#[test]
fn test_single_source_high_priority_above_threshold() {
    let records = vec![rec(
        CostCategory::ClinicalLab,
        "LAB-1",
        "OnlyOne",
        "2026-01",
        dec!(100000),
    )];
    let findings = analyze(&records);
    let f = findings
        .iter()
        .find(|f| f.kind == FindingKind::SingleSourceRisk)
        .unwrap();
    assert_eq!(f.priority, Priority::High);
}

#[test]
fn test_single_source_ignores_small_categories() {
    let records = vec![rec(
        CostCategory::ClinicalLab,
        "LAB-1",
        "OnlyOne",
        "2026-01",
        dec!(5000),
    )];
    assert!(analyze(&records).is_empty());
}

#[test]
fn test_price_variance() {
    let mut a = rec(
        CostCategory::ProductionEquipment,
        "EQ-X",
        "SupA",
        "2026-01",
        dec!(2000),
    );
    a.quantity = dec!(20);
    a.unit_price = dec!(100);
    let mut b = rec(
        CostCategory::ProductionEquipment,
        "EQ-X",
        "SupB",
        "2026-02",
        dec!(3000),
    );
    b.quantity = dec!(20);
    b.unit_price = dec!(150);

    let findings = analyze(&[a, b]);
    assert_eq!(findings.len(), 1);
    let f = &findings[0];
    assert_eq!(f.kind, FindingKind::PriceVariance);
    // avg 125, min 100, qty 40, half capture: (125-100) * 40 * 0.5 = 500
    assert_eq!(f.estimated_savings, dec!(500));
    assert!(f.affected.contains(&"EQ-X".to_string()));
}

#[test]
fn test_price_variance_ignores_small_spread() {
    let mut a = rec(CostCategory::ProductionEquipment, "EQ-X", "SupA", "2026-01", dec!(2000));
    a.quantity = dec!(20);
    a.unit_price = dec!(100);
    let mut b = rec(CostCategory::ProductionEquipment, "EQ-X", "SupB", "2026-02", dec!(3000));
    b.quantity = dec!(20);
    b.unit_price = dec!(105);
    assert!(analyze(&[a, b]).is_empty());
}

#[test]
fn test_tail_spend() {
    let records = vec![
        rec(CostCategory::MiscellaneousIndirect, "", "Tail1", "2026-01", dec!(1000)),
        rec(CostCategory::MiscellaneousIndirect, "", "Tail2", "2026-02", dec!(2000)),
        rec(CostCategory::MiscellaneousIndirect, "", "Tail3", "2026-03", dec!(500)),
    ];
    let findings = analyze(&records);
    assert_eq!(findings.len(), 1);
    let f = &findings[0];
    assert_eq!(f.kind, FindingKind::TailSpend);
    assert_eq!(f.priority, Priority::Low);
    // 3500 * 5%
    assert_eq!(f.estimated_savings, dec!(175));
    assert_eq!(f.affected.len(), 3);
}

#[test]
fn test_volume_bundling() {
    let records = vec![
        rec(CostCategory::OfficePrint, "SKU-R", "RepeatCo", "2026-01", dec!(500)),
        rec(CostCategory::OfficePrint, "SKU-R", "RepeatCo", "2026-01", dec!(500)),
        rec(CostCategory::OfficePrint, "SKU-R", "RepeatCo", "2026-01", dec!(500)),
    ];
    let findings = analyze(&records);
    let f = findings
        .iter()
        .find(|f| f.kind == FindingKind::VolumeBundling)
        .unwrap();
    // 1500 * 3%
    assert_eq!(f.estimated_savings, dec!(45));
    assert!(f.detail.contains("3 orders/month"));
}

#[test]
fn test_untapped_savings() {
    let records = vec![
        rec(CostCategory::ProfessionalServices, "", "ConsultA", "2026-01", dec!(30000)),
        rec(CostCategory::ProfessionalServices, "", "ConsultB", "2026-02", dec!(30000)),
    ];
    let findings = analyze(&records);
    assert_eq!(findings.len(), 1);
    let f = &findings[0];
    assert_eq!(f.kind, FindingKind::UntappedSavings);
    assert_eq!(f.priority, Priority::Medium);
    // 60000 * 5%
    assert_eq!(f.estimated_savings, dec!(3000));
}

#[test]
fn test_untapped_suppressed_by_recorded_savings() {
    let mut a = rec(CostCategory::ProfessionalServices, "", "ConsultA", "2026-01", dec!(30000));
    a.price_impact = dec!(-100);
    let b = rec(CostCategory::ProfessionalServices, "", "ConsultB", "2026-02", dec!(30000));
    assert!(analyze(&[a, b]).is_empty());
}

#[test]
fn test_findings_sorted_by_savings_desc() {
    let records = vec![
        // Single source: 25000 * 8% = 2000
        rec(CostCategory::ClinicalLab, "LAB-1", "OnlyOne", "2026-01", dec!(25000)),
        // Untapped: 60000 * 5% = 3000
        rec(CostCategory::ProfessionalServices, "", "ConsultA", "2026-01", dec!(30000)),
        rec(CostCategory::ProfessionalServices, "", "ConsultB", "2026-02", dec!(30000)),
    ];
    let findings = analyze(&records);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].kind, FindingKind::UntappedSavings);
    assert_eq!(findings[1].kind, FindingKind::SingleSourceRisk);
    assert!(findings[0].estimated_savings >= findings[1].estimated_savings);
}

#[test]
fn test_baseline_records_not_counted_as_spend() {
    let mut r = rec(CostCategory::ClinicalLab, "LAB-1", "OnlyOne", "2026-01", dec!(25000));
    r.budget_type = BudgetType::Baseline;
    assert!(analyze(&[r]).is_empty());
}
