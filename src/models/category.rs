use serde::{Deserialize, Serialize};

/// The six fixed indirect-spend categories. Every record carries exactly one;
/// source values that resolve to nothing fall back to `MiscellaneousIndirect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CostCategory {
    ClinicalLab,
    ProductionEquipment,
    WarehouseDistribution,
    ProfessionalServices,
    MiscellaneousIndirect,
    OfficePrint,
}

impl CostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicalLab => "Clinical, Lab and scientific services",
            Self::ProductionEquipment => "Production Equipment",
            Self::WarehouseDistribution => "External Warehouse and distribution",
            Self::ProfessionalServices => "Professional Services",
            Self::MiscellaneousIndirect => "Miscellaneous Indirect Costs",
            Self::OfficePrint => "Office and Print",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
    }

    pub fn all() -> &'static [CostCategory] {
        &[
            Self::ClinicalLab,
            Self::ProductionEquipment,
            Self::WarehouseDistribution,
            Self::ProfessionalServices,
            Self::MiscellaneousIndirect,
            Self::OfficePrint,
        ]
    }
}

impl From<String> for CostCategory {
    fn from(s: String) -> Self {
        Self::parse(&s).unwrap_or(Self::MiscellaneousIndirect)
    }
}

impl From<CostCategory> for String {
    fn from(c: CostCategory) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for CostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
