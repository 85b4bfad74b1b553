use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{CostCategory, SpendRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FindingKind {
    SupplierConsolidation,
    PriceVariance,
    TailSpend,
    VolumeBundling,
    UntappedSavings,
    SingleSourceRisk,
}

/// One savings opportunity, for the advisor and the CLI. The analysis is
/// heuristic; estimated savings are rough EUR figures, not commitments.
#[derive(Debug, Clone)]
pub(crate) struct Finding {
    pub(crate) kind: FindingKind,
    pub(crate) priority: Priority,
    pub(crate) category: String,
    pub(crate) title: &'static str,
    pub(crate) detail: String,
    pub(crate) affected: Vec<String>,
    pub(crate) estimated_savings: Decimal,
    pub(crate) action: &'static str,
}

fn pct(n: u32) -> Decimal {
    Decimal::new(n.into(), 2)
}

fn eur(n: i64) -> Decimal {
    Decimal::from(n)
}

/// "€123k" for detail strings.
fn fmt_k(amount: Decimal) -> String {
    format!("€{}k", (amount / Decimal::ONE_THOUSAND).round())
}

fn short_name(category: CostCategory) -> &'static str {
    let s = category.as_str();
    s.split(',').next().unwrap_or(s)
}

/// Scan the (already filtered) records for savings opportunities, most
/// valuable first.
pub(crate) fn analyze(records: &[SpendRecord]) -> Vec<Finding> {
    let actual: Vec<&SpendRecord> = records.iter().filter(|r| r.is_actual()).collect();
    let mut findings = Vec::new();

    supplier_consolidation(&actual, &mut findings);
    price_variance(&actual, &mut findings);
    tail_spend(&actual, &mut findings);
    volume_bundling(&actual, &mut findings);
    untapped_savings(records, &mut findings);
    single_source_risk(&actual, &mut findings);

    findings.sort_by(|a, b| b.estimated_savings.cmp(&a.estimated_savings));
    findings
}

fn supplier_spend(records: &[&SpendRecord]) -> Vec<(String, Decimal)> {
    let mut order: Vec<String> = Vec::new();
    let mut spend: HashMap<String, Decimal> = HashMap::new();
    for r in records {
        let name = if r.supplier.is_empty() {
            "Unknown".to_string()
        } else {
            r.supplier.clone()
        };
        if !spend.contains_key(&name) {
            order.push(name.clone());
        }
        *spend.entry(name).or_insert(Decimal::ZERO) += r.total_amount;
    }
    let mut result: Vec<(String, Decimal)> = order
        .into_iter()
        .map(|name| {
            let total = spend.get(&name).copied().unwrap_or(Decimal::ZERO);
            (name, total)
        })
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

fn supplier_consolidation(actual: &[&SpendRecord], findings: &mut Vec<Finding>) {
    for category in CostCategory::all() {
        let rows: Vec<&SpendRecord> = actual
            .iter()
            .filter(|r| r.cost_category == *category)
            .copied()
            .collect();
        if rows.is_empty() {
            continue;
        }
        let cat_spend: Decimal = rows.iter().map(|r| r.total_amount).sum();
        if cat_spend <= Decimal::ZERO {
            continue;
        }
        let suppliers = supplier_spend(&rows);
        if suppliers.len() < 5 {
            continue;
        }
        let top3: Decimal = suppliers.iter().take(3).map(|(_, v)| *v).sum();
        let top3_share = top3 / cat_spend;
        if top3_share >= pct(65) {
            continue;
        }

        let share_pct = (top3_share * eur(100)).round();
        findings.push(Finding {
            kind: FindingKind::SupplierConsolidation,
            priority: if cat_spend > eur(50_000) {
                Priority::High
            } else {
                Priority::Medium
            },
            category: category.as_str().to_string(),
            title: "Supplier Consolidation",
            detail: format!(
                "{} suppliers in {} — top 3 cover only {}% of spend ({}). \
                 Fragmented buying reduces negotiating leverage.",
                suppliers.len(),
                short_name(*category),
                share_pct,
                fmt_k(cat_spend),
            ),
            affected: suppliers.iter().take(4).map(|(n, _)| n.clone()).collect(),
            estimated_savings: (cat_spend * pct(7)).round(),
            action: "Issue an RFQ to consolidate to 2-3 preferred suppliers with volume commitments.",
        });
    }
}

fn price_variance(actual: &[&SpendRecord], findings: &mut Vec<Finding>) {
    struct SkuStats {
        prices: Vec<Decimal>,
        qty: Decimal,
        spend: Decimal,
        desc: String,
        category: CostCategory,
    }

    let mut by_sku: HashMap<&str, SkuStats> = HashMap::new();
    for r in actual {
        if r.sku.is_empty() || r.unit_price == Decimal::ZERO {
            continue;
        }
        let stats = by_sku.entry(r.sku.as_str()).or_insert_with(|| SkuStats {
            prices: Vec::new(),
            qty: Decimal::ZERO,
            spend: Decimal::ZERO,
            desc: r.description.clone(),
            category: r.cost_category,
        });
        stats.prices.push(r.unit_price);
        stats.qty += r.quantity;
        stats.spend += r.total_amount;
    }

    let mut hits: Vec<(String, String, Decimal, Decimal, CostCategory)> = Vec::new();
    for (sku, stats) in &by_sku {
        if stats.prices.len() < 2 {
            continue;
        }
        let min = stats.prices.iter().min().copied().unwrap_or(Decimal::ZERO);
        let max = stats.prices.iter().max().copied().unwrap_or(Decimal::ZERO);
        if min <= Decimal::ZERO {
            continue;
        }
        let variance = (max - min) / min;
        if variance <= pct(15) || stats.spend <= eur(2_000) {
            continue;
        }
        let avg: Decimal =
            stats.prices.iter().sum::<Decimal>() / Decimal::from(stats.prices.len());
        let savings = ((avg - min) * stats.qty * pct(50)).round();
        if savings > eur(200) {
            hits.push((sku.to_string(), stats.desc.clone(), variance, savings, stats.category));
        }
    }
    hits.sort_by(|a, b| b.3.cmp(&a.3));
    if hits.is_empty() {
        return;
    }

    let top: Vec<_> = hits.iter().take(5).collect();
    let total: Decimal = top.iter().map(|h| h.3).sum();
    let (top_sku, top_desc, top_variance, _, top_category) = top[0];
    let label = if top_desc.is_empty() { top_sku } else { top_desc };
    findings.push(Finding {
        kind: FindingKind::PriceVariance,
        priority: if total > eur(10_000) {
            Priority::High
        } else {
            Priority::Medium
        },
        category: top_category.as_str().to_string(),
        title: "Price Variance Detected",
        detail: format!(
            "{} SKU(s) purchased at significantly different prices across POs. \
             Top offender: {} — {}% price spread.",
            top.len(),
            label.chars().take(50).collect::<String>(),
            (*top_variance * eur(100)).round(),
        ),
        affected: top.iter().map(|h| h.0.clone()).collect(),
        estimated_savings: total,
        action: "Standardize pricing via blanket POs or catalogue agreements. Enforce approved price list.",
    });
}

fn tail_spend(actual: &[&SpendRecord], findings: &mut Vec<Finding>) {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (Decimal, usize)> = HashMap::new();
    for r in actual {
        let name = if r.supplier.is_empty() {
            "Unknown".to_string()
        } else {
            r.supplier.clone()
        };
        if !stats.contains_key(&name) {
            order.push(name.clone());
        }
        let entry = stats.entry(name).or_insert((Decimal::ZERO, 0));
        entry.0 += r.total_amount;
        entry.1 += 1;
    }

    let tail: Vec<(&String, Decimal)> = order
        .iter()
        .filter_map(|name| {
            let (spend, count) = stats.get(name)?;
            (*spend < eur(5_000) && *count <= 5).then_some((name, *spend))
        })
        .collect();
    if tail.len() < 3 {
        return;
    }

    let tail_total: Decimal = tail.iter().map(|(_, s)| *s).sum();
    findings.push(Finding {
        kind: FindingKind::TailSpend,
        priority: if tail.len() > 10 {
            Priority::Medium
        } else {
            Priority::Low
        },
        category: "All Categories".to_string(),
        title: "Tail Spend Cleanup",
        detail: format!(
            "{} suppliers each account for less than €5k in total spend (combined {}). \
             Tail spend increases admin cost and reduces leverage.",
            tail.len(),
            fmt_k(tail_total),
        ),
        affected: tail.iter().take(5).map(|(n, _)| (*n).clone()).collect(),
        estimated_savings: (tail_total * pct(5)).round(),
        action: "Consolidate tail suppliers into preferred vendors or a marketplace. Target <20 active suppliers per category.",
    });
}

fn volume_bundling(actual: &[&SpendRecord], findings: &mut Vec<Finding>) {
    struct Bundle {
        sku: String,
        desc: String,
        count: usize,
        spend: Decimal,
    }

    let mut order: Vec<String> = Vec::new();
    let mut bundles: HashMap<String, Bundle> = HashMap::new();
    for r in actual {
        let key = format!("{}|{}", r.sku, r.date);
        if !bundles.contains_key(&key) {
            order.push(key.clone());
        }
        let entry = bundles.entry(key).or_insert_with(|| Bundle {
            sku: r.sku.clone(),
            desc: r.description.clone(),
            count: 0,
            spend: Decimal::ZERO,
        });
        entry.count += 1;
        entry.spend += r.total_amount;
    }

    let mut hits: Vec<&Bundle> = order
        .iter()
        .filter_map(|k| bundles.get(k))
        .filter(|b| b.count >= 3 && b.spend > eur(1_000))
        .collect();
    hits.sort_by(|a, b| b.spend.cmp(&a.spend));
    if hits.is_empty() {
        return;
    }

    let total: Decimal = hits.iter().map(|b| b.spend).sum();
    let top = hits[0];
    let label = if top.desc.is_empty() { &top.sku } else { &top.desc };
    findings.push(Finding {
        kind: FindingKind::VolumeBundling,
        priority: if total > eur(30_000) {
            Priority::Medium
        } else {
            Priority::Low
        },
        category: "Multiple".to_string(),
        title: "Volume Bundling Opportunity",
        detail: format!(
            "{} SKU(s) are ordered 3+ times per month in separate POs. Top case: {} ({} orders/month).",
            hits.len(),
            label.chars().take(45).collect::<String>(),
            top.count,
        ),
        affected: hits
            .iter()
            .take(4)
            .map(|b| b.sku.clone())
            .filter(|s| !s.is_empty())
            .collect(),
        estimated_savings: (total * pct(3)).round(),
        action: "Consolidate repeat orders into monthly blanket POs. Reduces processing cost and enables volume discounts.",
    });
}

fn untapped_savings(records: &[SpendRecord], findings: &mut Vec<Finding>) {
    for category in CostCategory::all() {
        let rows: Vec<&SpendRecord> = records
            .iter()
            .filter(|r| r.cost_category == *category)
            .collect();
        if rows.is_empty() {
            continue;
        }
        let actual_spend: Decimal = rows
            .iter()
            .filter(|r| r.is_actual())
            .map(|r| r.total_amount)
            .sum();
        if actual_spend < eur(50_000) {
            continue;
        }
        let has_savings = rows.iter().any(|r| {
            r.price_impact != Decimal::ZERO
                || r.volume_impact != Decimal::ZERO
                || r.insourcing_savings != Decimal::ZERO
        });
        if has_savings {
            continue;
        }

        findings.push(Finding {
            kind: FindingKind::UntappedSavings,
            priority: if actual_spend > eur(100_000) {
                Priority::High
            } else {
                Priority::Medium
            },
            category: category.as_str().to_string(),
            title: "No Savings Initiatives",
            detail: format!(
                "{} has {} in spend but zero recorded savings initiatives. \
                 Industry benchmark is 3-7% savings annually.",
                short_name(*category),
                fmt_k(actual_spend),
            ),
            affected: Vec::new(),
            estimated_savings: (actual_spend * pct(5)).round(),
            action: "Launch a sourcing initiative: market benchmarking, RFQ, or demand management review.",
        });
    }
}

fn single_source_risk(actual: &[&SpendRecord], findings: &mut Vec<Finding>) {
    for category in CostCategory::all() {
        let rows: Vec<&SpendRecord> = actual
            .iter()
            .filter(|r| r.cost_category == *category)
            .copied()
            .collect();
        if rows.is_empty() {
            continue;
        }
        let cat_spend: Decimal = rows.iter().map(|r| r.total_amount).sum();
        if cat_spend < eur(20_000) {
            continue;
        }
        let suppliers: std::collections::HashSet<&str> = rows
            .iter()
            .map(|r| r.supplier.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        if suppliers.len() != 1 {
            continue;
        }
        let supplier = suppliers.iter().next().copied().unwrap_or("Unknown");

        findings.push(Finding {
            kind: FindingKind::SingleSourceRisk,
            priority: if cat_spend > eur(80_000) {
                Priority::High
            } else {
                Priority::Medium
            },
            category: category.as_str().to_string(),
            title: "Single-Source Risk",
            detail: format!(
                "{} is 100% sourced from {supplier} ({}). \
                 No competitive leverage or supply continuity fallback.",
                short_name(*category),
                fmt_k(cat_spend),
            ),
            affected: vec![supplier.to_string()],
            estimated_savings: (cat_spend * pct(8)).round(),
            action: "Qualify a second supplier and run a competitive RFQ. Even a 20% split creates leverage for pricing negotiations.",
        });
    }
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod tests;
