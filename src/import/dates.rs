use chrono::NaiveDate;

/// Reduce a raw date value to month granularity ("YYYY-MM").
///
/// Accepts the shapes SAP exports actually produce (trailing time parts are
/// ignored): `YYYY-MM-DD`, `DD.MM.YYYY`, `YYYYMMDD`, `MM/DD/YYYY`, `YYYY/MM`.
/// Anything else falls back to the first 7 characters verbatim.
pub(crate) fn month_key(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    const DAY_FORMATS: &[(&str, usize)] = &[("%Y-%m-%d", 10), ("%d.%m.%Y", 10), ("%m/%d/%Y", 10)];
    for (fmt, len) in DAY_FORMATS {
        if s.len() >= *len && s.is_char_boundary(*len) {
            if let Ok(d) = NaiveDate::parse_from_str(&s[..*len], fmt) {
                return d.format("%Y-%m").to_string();
            }
        }
    }

    // Compact YYYYMMDD only when the whole value is eight digits.
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return d.format("%Y-%m").to_string();
        }
    }

    // "YYYY/MM..." carries no day part to validate.
    let b = s.as_bytes();
    if b.len() >= 7
        && b[4] == b'/'
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[5..7].iter().all(u8::is_ascii_digit)
    {
        return format!("{}-{}", &s[..4], &s[5..7]);
    }

    s.chars().take(7).collect()
}

#[cfg(test)]
#[path = "dates_tests.rs"]
mod tests;
