#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable {
        headers: headers.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
        parse_errors: 0,
    }
}

// ── parse_auto ────────────────────────────────────────────────

#[test]
fn test_auto_eu_format() {
    assert_eq!(parse_auto("1.234,56"), dec!(1234.56));
    assert_eq!(parse_auto("1.234.567,89"), dec!(1234567.89));
}

#[test]
fn test_auto_us_format() {
    assert_eq!(parse_auto("1,234.56"), dec!(1234.56));
    assert_eq!(parse_auto("1,234,567.89"), dec!(1234567.89));
}

#[test]
fn test_auto_plain_numbers() {
    assert_eq!(parse_auto("42"), dec!(42));
    assert_eq!(parse_auto("-42.5"), dec!(-42.5));
    assert_eq!(parse_auto("1500,75"), dec!(1500.75));
}

#[test]
fn test_auto_strips_currency_and_whitespace() {
    assert_eq!(parse_auto("€ 1.500,75"), dec!(1500.75));
    assert_eq!(parse_auto("$1,000.00"), dec!(1000.00));
    assert_eq!(parse_auto(" 12 345,60 "), dec!(12345.60));
}

#[test]
fn test_auto_empty_and_garbage_are_zero() {
    assert_eq!(parse_auto(""), dec!(0));
    assert_eq!(parse_auto("   "), dec!(0));
    assert_eq!(parse_auto("n/a"), dec!(0));
    assert_eq!(parse_auto("abc123def"), dec!(0));
}

#[test]
fn test_auto_trailing_minus() {
    assert_eq!(parse_auto("123,45-"), dec!(-123.45));
}

// ── parse_eu / parse_us ───────────────────────────────────────

#[test]
fn test_eu_explicit() {
    assert_eq!(parse_eu("1.234,56"), dec!(1234.56));
    assert_eq!(parse_eu("1500"), dec!(1500));
    assert_eq!(parse_eu("0,50"), dec!(0.50));
}

#[test]
fn test_eu_trailing_minus() {
    assert_eq!(parse_eu("123,45-"), dec!(-123.45));
    assert_eq!(parse_eu("1.000,00-"), dec!(-1000.00));
}

#[test]
fn test_us_explicit() {
    assert_eq!(parse_us("1,234.56"), dec!(1234.56));
    assert_eq!(parse_us("1500"), dec!(1500));
}

#[test]
fn test_us_trailing_minus() {
    assert_eq!(parse_us("123.45-"), dec!(-123.45));
}

#[test]
fn test_explicit_modes_never_fail() {
    assert_eq!(parse_eu("garbage"), dec!(0));
    assert_eq!(parse_us("garbage"), dec!(0));
    assert_eq!(parse_eu(""), dec!(0));
    assert_eq!(parse_us(""), dec!(0));
}

#[test]
fn test_eu_equals_auto_on_eu_values() {
    // Values the auto mode recognizes as EU parse identically in explicit EU mode
    for value in ["1.234,56", "12,50", "9.999.999,99"] {
        assert_eq!(parse_auto(value), parse_eu(value), "mismatch for {value}");
    }
}

// ── NumberFormat ──────────────────────────────────────────────

#[test]
fn test_format_dispatch() {
    // "1.234" is a thousand in EU and a fraction in US
    assert_eq!(NumberFormat::Eu.parse("1.234"), dec!(1234));
    assert_eq!(NumberFormat::Us.parse("1.234"), dec!(1.234));
    assert_eq!(NumberFormat::Auto.parse("1.234,50"), dec!(1234.50));
}

#[test]
fn test_format_from_flag() {
    assert_eq!(NumberFormat::from_flag("EU"), Some(NumberFormat::Eu));
    assert_eq!(NumberFormat::from_flag("us"), Some(NumberFormat::Us));
    assert_eq!(NumberFormat::from_flag("auto"), Some(NumberFormat::Auto));
    assert_eq!(NumberFormat::from_flag("fr"), None);
}

// ── detect_number_format ──────────────────────────────────────

#[test]
fn test_detect_eu_values() {
    let t = table(
        &["Net Value", "Vendor"],
        &[&["1.234,56", "Acme"], &["999,10", "Beta"], &["2.000,00", "Gamma"]],
    );
    let mapping = ColumnMapping::auto_map(&t.headers);
    assert_eq!(detect_number_format(&t, &mapping), NumberFormat::Eu);
}

#[test]
fn test_detect_us_values() {
    let t = table(
        &["Net Value", "Vendor"],
        &[&["1,234.56", "Acme"], &["999.10", "Beta"]],
    );
    let mapping = ColumnMapping::auto_map(&t.headers);
    assert_eq!(detect_number_format(&t, &mapping), NumberFormat::Us);
}

#[test]
fn test_detect_defaults_to_us() {
    // Integers carry no convention markers
    let t = table(&["Net Value"], &[&["1000"], &["2000"]]);
    let mapping = ColumnMapping::auto_map(&t.headers);
    assert_eq!(detect_number_format(&t, &mapping), NumberFormat::Us);
}

#[test]
fn test_detect_only_samples_amount_columns() {
    // EU-looking values in a text column must not sway detection
    let t = table(
        &["Vendor", "Net Value"],
        &[&["1.234,56", "100.25"], &["2.345,67", "200.50"]],
    );
    let mapping = ColumnMapping::auto_map(&t.headers);
    assert_eq!(detect_number_format(&t, &mapping), NumberFormat::Us);
}

#[test]
fn test_detect_majority_wins() {
    let t = table(
        &["Net Value"],
        &[&["1.000,50"], &["2.000,25"], &["3,000.10"]],
    );
    let mapping = ColumnMapping::auto_map(&t.headers);
    assert_eq!(detect_number_format(&t, &mapping), NumberFormat::Eu);
}
