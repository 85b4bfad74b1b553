use super::fields::sap_target;

/// CSV dialects the import pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceFormat {
    /// SAP S4 HANA export: column names need translation, goes through the wizard.
    Sap,
    /// Aggregated vendor-spend export; one row per category/vendor total in k EUR.
    Izvoz,
    /// Columns already use canonical field names.
    Generic,
}

impl SourceFormat {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Sap => "SAP export",
            Self::Izvoz => "Izvoz vendor spend",
            Self::Generic => "Generic CSV",
        }
    }
}

const IZVOZ_MARKER: &str = "indirect category mapping";

/// Classify input purely from its header set. The Izvoz marker column wins
/// over everything else; SAP requires at least two exact synonym-table hits.
pub(crate) fn detect_format(headers: &[String]) -> SourceFormat {
    if headers
        .iter()
        .any(|h| h.trim().to_lowercase().contains(IZVOZ_MARKER))
    {
        return SourceFormat::Izvoz;
    }

    let sap_matches = headers
        .iter()
        .filter(|h| sap_target(h.trim()).is_some())
        .count();
    if sap_matches >= 2 {
        SourceFormat::Sap
    } else {
        SourceFormat::Generic
    }
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;
