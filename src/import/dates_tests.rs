#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_iso_date() {
    assert_eq!(month_key("2026-01-31"), "2026-01");
}

#[test]
fn test_iso_date_with_time() {
    assert_eq!(month_key("2026-01-31 00:00:00"), "2026-01");
}

#[test]
fn test_german_dotted_date() {
    assert_eq!(month_key("31.01.2026"), "2026-01");
    assert_eq!(month_key("01.12.2025"), "2025-12");
}

#[test]
fn test_compact_sap_date() {
    assert_eq!(month_key("20260131"), "2026-01");
}

#[test]
fn test_compact_requires_exact_length() {
    // Eight digits plus a trailer is not the compact format
    assert_eq!(month_key("20260131 10:00"), "2026013");
}

#[test]
fn test_us_slash_date() {
    assert_eq!(month_key("01/15/2026"), "2026-01");
}

#[test]
fn test_year_slash_month() {
    assert_eq!(month_key("2026/03"), "2026-03");
    assert_eq!(month_key("2026/03/15"), "2026-03");
}

#[test]
fn test_already_month_granular() {
    assert_eq!(month_key("2026-01"), "2026-01");
}

#[test]
fn test_unrecognized_falls_back_to_seven_chars() {
    assert_eq!(month_key("January 2026"), "January");
}

#[test]
fn test_invalid_calendar_date_falls_back() {
    // 99.99.2026 is shaped like a dotted date but is not a real one
    assert_eq!(month_key("99.99.2026"), "99.99.2");
}

#[test]
fn test_empty_and_whitespace() {
    assert_eq!(month_key(""), "");
    assert_eq!(month_key("   "), "");
}

#[test]
fn test_short_value_passthrough() {
    assert_eq!(month_key("2026"), "2026");
}
