use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::fields::ColumnMapping;
use super::reader::RawTable;

/// Thousands/decimal convention for numeric cells. `Auto` infers per value;
/// the explicit variants are fixed by configuration on the SAP path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberFormat {
    Auto,
    Eu,
    Us,
}

impl NumberFormat {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Eu => "EU",
            Self::Us => "US",
        }
    }

    pub(crate) fn from_flag(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "eu" => Some(Self::Eu),
            "us" => Some(Self::Us),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub(crate) fn parse(&self, raw: &str) -> Decimal {
        match self {
            Self::Auto => parse_auto(raw),
            Self::Eu => parse_eu(raw),
            Self::Us => parse_us(raw),
        }
    }
}

/// Parse a numeric string with unknown convention. If a comma appears after
/// the last dot the value is read as European (dot = thousands, comma =
/// decimal); otherwise commas are stripped as thousands separators.
/// Never fails: unparseable input yields zero.
pub(crate) fn parse_auto(raw: &str) -> Decimal {
    let s: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€' && *c != '$')
        .collect();
    if s.is_empty() {
        return Decimal::ZERO;
    }

    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');
    let cleaned = match (last_comma, last_dot) {
        (Some(c), d) if d.map_or(true, |d| c > d) => s.replace('.', "").replace(',', "."),
        _ => s.replace(',', ""),
    };
    finish(cleaned)
}

/// European convention: dot = thousands, comma = decimal.
pub(crate) fn parse_eu(raw: &str) -> Decimal {
    let s: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Decimal::ZERO;
    }
    finish(s.replace('.', "").replace(',', "."))
}

/// US convention: comma = thousands, dot = decimal.
pub(crate) fn parse_us(raw: &str) -> Decimal {
    let s: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    if s.is_empty() {
        return Decimal::ZERO;
    }
    finish(s.replace(',', ""))
}

/// SAP emits trailing-minus negatives ("123.45-").
fn finish(s: String) -> Decimal {
    let normalized = match s.strip_suffix('-') {
        Some(rest) => format!("-{rest}"),
        None => s,
    };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

struct Markers {
    eu_grouped: Regex,
    us_grouped: Regex,
    eu_decimal: Regex,
    us_decimal: Regex,
}

impl Markers {
    fn new() -> Option<Self> {
        Some(Self {
            eu_grouped: Regex::new(r"\d+\.\d{3},\d").ok()?,
            us_grouped: Regex::new(r"\d+,\d{3}\.\d").ok()?,
            eu_decimal: Regex::new(r",\d{2}$").ok()?,
            us_decimal: Regex::new(r"\.\d{2}$").ok()?,
        })
    }
}

const DETECT_SAMPLE_ROWS: usize = 50;

/// Sample the first rows of every column mapped to an amount field and tally
/// EU vs US markers; the majority convention wins (tie goes to US).
pub(crate) fn detect_number_format(table: &RawTable, mapping: &ColumnMapping) -> NumberFormat {
    let Some(markers) = Markers::new() else {
        return NumberFormat::Us;
    };

    let cols: Vec<usize> = mapping
        .amount_sources()
        .iter()
        .filter_map(|h| table.col(h))
        .collect();

    let mut eu_count = 0;
    let mut us_count = 0;
    for row in table.rows.iter().take(DETECT_SAMPLE_ROWS) {
        for &col in &cols {
            let val = table.cell(row, col);
            if markers.eu_grouped.is_match(val) {
                eu_count += 1;
            } else if markers.us_grouped.is_match(val) {
                us_count += 1;
            } else if markers.eu_decimal.is_match(val) && !markers.us_decimal.is_match(val) {
                eu_count += 1;
            } else if markers.us_decimal.is_match(val) && !markers.eu_decimal.is_match(val) {
                us_count += 1;
            }
        }
    }

    if eu_count > us_count {
        NumberFormat::Eu
    } else {
        NumberFormat::Us
    }
}

#[cfg(test)]
#[path = "numeric_tests.rs"]
mod tests;
