/// Canonical record fields a source column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Date,
    CostCategory,
    SubCategory,
    Sku,
    Description,
    Supplier,
    OrderedBy,
    Department,
    CostCenter,
    PoNumber,
    Quantity,
    UnitPrice,
    TotalAmount,
    BudgetType,
    PriceImpact,
    VolumeImpact,
    InsourcingSavings,
    Notes,
}

impl Field {
    /// Storage/CSV key. Generic imports match source headers against these.
    pub(crate) fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::CostCategory => "cost_category",
            Self::SubCategory => "sub_category",
            Self::Sku => "sku",
            Self::Description => "description",
            Self::Supplier => "supplier",
            Self::OrderedBy => "ordered_by",
            Self::Department => "department",
            Self::CostCenter => "cost_center",
            Self::PoNumber => "po_number",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::TotalAmount => "total_amount",
            Self::BudgetType => "budget_type",
            Self::PriceImpact => "price_impact",
            Self::VolumeImpact => "volume_impact",
            Self::InsourcingSavings => "insourcing_savings",
            Self::Notes => "notes",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::CostCategory => "Category",
            Self::SubCategory => "Sub-Category",
            Self::Sku => "SKU",
            Self::Description => "Description",
            Self::Supplier => "Supplier",
            Self::OrderedBy => "Ordered By",
            Self::Department => "Department",
            Self::CostCenter => "Cost Center",
            Self::PoNumber => "PO Number",
            Self::Quantity => "Qty",
            Self::UnitPrice => "Unit Price",
            Self::TotalAmount => "Total (EUR)",
            Self::BudgetType => "Budget Type",
            Self::PriceImpact => "Price Impact",
            Self::VolumeImpact => "Volume Impact",
            Self::InsourcingSavings => "Insourcing",
            Self::Notes => "Notes",
        }
    }

    pub(crate) fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().find(|f| f.key() == key).copied()
    }

    pub(crate) fn all() -> &'static [Field] {
        &[
            Self::Date,
            Self::CostCategory,
            Self::SubCategory,
            Self::Sku,
            Self::Description,
            Self::Supplier,
            Self::OrderedBy,
            Self::Department,
            Self::CostCenter,
            Self::PoNumber,
            Self::Quantity,
            Self::UnitPrice,
            Self::TotalAmount,
            Self::BudgetType,
            Self::PriceImpact,
            Self::VolumeImpact,
            Self::InsourcingSavings,
            Self::Notes,
        ]
    }
}

/// Where a source column goes: a canonical field, one of three reference-only
/// targets kept for display but never written into records, or nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MapTarget {
    Field(Field),
    Currency,
    PoItem,
    CompanyCode,
    Skip,
}

impl MapTarget {
    pub(crate) fn field(&self) -> Option<Field> {
        match self {
            Self::Field(f) => Some(*f),
            _ => None,
        }
    }

    /// Reference-only targets are exempt from the one-column-per-target rule.
    pub(crate) fn is_reference(&self) -> bool {
        matches!(self, Self::Currency | Self::PoItem | Self::CompanyCode)
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Field(f) => f.label(),
            Self::Currency => "Currency (ref)",
            Self::PoItem => "PO Item (ref)",
            Self::CompanyCode => "Company Code (ref)",
            Self::Skip => "Skip",
        }
    }
}

/// Known SAP S4 HANA column names (English and German label variants) and the
/// canonical target each one translates to. Lookup is exact and
/// case-sensitive on the trimmed header.
const SAP_FIELDS: &[(&str, MapTarget)] = &[
    // Purchase order number
    ("EBELN", MapTarget::Field(Field::PoNumber)),
    ("Purchasing Document", MapTarget::Field(Field::PoNumber)),
    ("Purchase Order", MapTarget::Field(Field::PoNumber)),
    ("PO Number", MapTarget::Field(Field::PoNumber)),
    ("Einkaufsbeleg", MapTarget::Field(Field::PoNumber)),
    ("Einkaufsbel.", MapTarget::Field(Field::PoNumber)),
    // Material / SKU
    ("MATNR", MapTarget::Field(Field::Sku)),
    ("Material", MapTarget::Field(Field::Sku)),
    ("Material Number", MapTarget::Field(Field::Sku)),
    ("Materialnr.", MapTarget::Field(Field::Sku)),
    ("Materialnummer", MapTarget::Field(Field::Sku)),
    // Description
    ("TXZ01", MapTarget::Field(Field::Description)),
    ("Short Text", MapTarget::Field(Field::Description)),
    ("Description", MapTarget::Field(Field::Description)),
    ("Material Description", MapTarget::Field(Field::Description)),
    ("Item Text", MapTarget::Field(Field::Description)),
    ("Kurztext", MapTarget::Field(Field::Description)),
    ("Bezeichnung", MapTarget::Field(Field::Description)),
    ("Material description", MapTarget::Field(Field::Description)),
    // Supplier / vendor
    ("LIFNR", MapTarget::Field(Field::Supplier)),
    ("NAME1", MapTarget::Field(Field::Supplier)),
    ("Vendor", MapTarget::Field(Field::Supplier)),
    ("Vendor Name", MapTarget::Field(Field::Supplier)),
    ("Supplier", MapTarget::Field(Field::Supplier)),
    ("Supplier Name", MapTarget::Field(Field::Supplier)),
    ("Lieferant", MapTarget::Field(Field::Supplier)),
    ("Kreditor", MapTarget::Field(Field::Supplier)),
    ("Name 1", MapTarget::Field(Field::Supplier)),
    ("Vendor name", MapTarget::Field(Field::Supplier)),
    // Quantity
    ("MENGE", MapTarget::Field(Field::Quantity)),
    ("PO Quantity", MapTarget::Field(Field::Quantity)),
    ("Order Quantity", MapTarget::Field(Field::Quantity)),
    ("Quantity", MapTarget::Field(Field::Quantity)),
    ("Bestellmenge", MapTarget::Field(Field::Quantity)),
    ("Qty", MapTarget::Field(Field::Quantity)),
    ("PO quantity", MapTarget::Field(Field::Quantity)),
    // Unit price
    ("NETPR", MapTarget::Field(Field::UnitPrice)),
    ("Net Price", MapTarget::Field(Field::UnitPrice)),
    ("Price", MapTarget::Field(Field::UnitPrice)),
    ("Unit Price", MapTarget::Field(Field::UnitPrice)),
    ("Nettopreis", MapTarget::Field(Field::UnitPrice)),
    ("Net price", MapTarget::Field(Field::UnitPrice)),
    // Net value / total
    ("NETWR", MapTarget::Field(Field::TotalAmount)),
    ("Net Value", MapTarget::Field(Field::TotalAmount)),
    ("Net Order Value", MapTarget::Field(Field::TotalAmount)),
    ("Net order value", MapTarget::Field(Field::TotalAmount)),
    ("Amount", MapTarget::Field(Field::TotalAmount)),
    ("Total Amount", MapTarget::Field(Field::TotalAmount)),
    ("Nettowert", MapTarget::Field(Field::TotalAmount)),
    ("Nettobest.wert", MapTarget::Field(Field::TotalAmount)),
    ("Value", MapTarget::Field(Field::TotalAmount)),
    ("Net order val.", MapTarget::Field(Field::TotalAmount)),
    // Cost center
    ("KOSTL", MapTarget::Field(Field::CostCenter)),
    ("Cost Center", MapTarget::Field(Field::CostCenter)),
    ("CostCenter", MapTarget::Field(Field::CostCenter)),
    ("Cost center", MapTarget::Field(Field::CostCenter)),
    ("Kostenstelle", MapTarget::Field(Field::CostCenter)),
    // Dates
    ("BEDAT", MapTarget::Field(Field::Date)),
    ("PO Date", MapTarget::Field(Field::Date)),
    ("Document Date", MapTarget::Field(Field::Date)),
    ("Posting Date", MapTarget::Field(Field::Date)),
    ("Created On", MapTarget::Field(Field::Date)),
    ("Belegdatum", MapTarget::Field(Field::Date)),
    ("Doc. Date", MapTarget::Field(Field::Date)),
    ("Order Date", MapTarget::Field(Field::Date)),
    ("Delivery Date", MapTarget::Field(Field::Date)),
    // Created by / requisitioner
    ("ERNAM", MapTarget::Field(Field::OrderedBy)),
    ("Created By", MapTarget::Field(Field::OrderedBy)),
    ("Created by", MapTarget::Field(Field::OrderedBy)),
    ("Requisitioner", MapTarget::Field(Field::OrderedBy)),
    ("Angelegt von", MapTarget::Field(Field::OrderedBy)),
    ("Anforderer", MapTarget::Field(Field::OrderedBy)),
    ("Requisitioner name", MapTarget::Field(Field::OrderedBy)),
    // Material group -> category
    ("MATKL", MapTarget::Field(Field::CostCategory)),
    ("Material Group", MapTarget::Field(Field::CostCategory)),
    ("Material Grp", MapTarget::Field(Field::CostCategory)),
    ("Mat. Group", MapTarget::Field(Field::CostCategory)),
    ("Warengruppe", MapTarget::Field(Field::CostCategory)),
    ("Commodity", MapTarget::Field(Field::CostCategory)),
    // Purchasing group / plant -> department
    ("Purchasing Group", MapTarget::Field(Field::Department)),
    ("Purch. Group", MapTarget::Field(Field::Department)),
    ("Einkaufsgruppe", MapTarget::Field(Field::Department)),
    ("WERKS", MapTarget::Field(Field::Department)),
    ("Plant", MapTarget::Field(Field::Department)),
    ("Werk", MapTarget::Field(Field::Department)),
    // Currency (reference only)
    ("WAERS", MapTarget::Currency),
    ("Currency", MapTarget::Currency),
    ("Währung", MapTarget::Currency),
    ("Doc. Currency", MapTarget::Currency),
    ("Document Currency", MapTarget::Currency),
    // PO line item (reference only)
    ("EBELP", MapTarget::PoItem),
    ("Item", MapTarget::PoItem),
    ("PO Item", MapTarget::PoItem),
    // Company code (reference only)
    ("BUKRS", MapTarget::CompanyCode),
    ("Company Code", MapTarget::CompanyCode),
    ("Buchungskreis", MapTarget::CompanyCode),
    // GL account -> sub-category
    ("SAKTO", MapTarget::Field(Field::SubCategory)),
    ("G/L Account", MapTarget::Field(Field::SubCategory)),
    ("GL Account", MapTarget::Field(Field::SubCategory)),
    ("Sachkonto", MapTarget::Field(Field::SubCategory)),
];

pub(crate) fn sap_target(header: &str) -> Option<MapTarget> {
    SAP_FIELDS
        .iter()
        .find(|(name, _)| *name == header)
        .map(|(_, target)| *target)
}

/// Source-column -> target mapping for one import attempt. Entries keep the
/// source header order so reverse lookups are deterministic (first wins).
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnMapping {
    entries: Vec<(String, MapTarget)>,
}

impl ColumnMapping {
    /// Seed from the SAP synonym table. A canonical field already claimed by
    /// an earlier column is not claimed again; reference-only targets may be
    /// claimed by any number of columns.
    pub(crate) fn auto_map(headers: &[String]) -> Self {
        let mut mapping = Self::default();
        for header in headers {
            if let Some(target) = sap_target(header.trim()) {
                let taken = mapping.entries.iter().any(|(_, t)| *t == target);
                if !taken || target.is_reference() {
                    mapping.entries.push((header.clone(), target));
                }
            }
        }
        mapping
    }

    /// Identity mapping for sources whose headers already use canonical keys.
    pub(crate) fn identity(headers: &[String]) -> Self {
        let mut mapping = Self::default();
        for header in headers {
            if let Some(field) = Field::from_key(header.trim()) {
                if mapping.source_for(field).is_none() {
                    mapping.entries.push((header.clone(), MapTarget::Field(field)));
                }
            }
        }
        mapping
    }

    /// Manual override for one column.
    pub(crate) fn set(&mut self, header: &str, target: MapTarget) {
        if let Some(entry) = self.entries.iter_mut().find(|(h, _)| h == header) {
            entry.1 = target;
        } else {
            self.entries.push((header.to_string(), target));
        }
    }

    pub(crate) fn get(&self, header: &str) -> MapTarget {
        self.entries
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, t)| *t)
            .unwrap_or(MapTarget::Skip)
    }

    /// First source column mapped to the given canonical field.
    pub(crate) fn source_for(&self, field: Field) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, t)| t.field() == Some(field))
            .map(|(h, _)| h.as_str())
    }

    /// Source columns feeding the amount fields, used by number-format detection.
    pub(crate) fn amount_sources(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, t)| {
                matches!(
                    t.field(),
                    Some(Field::Quantity | Field::UnitPrice | Field::TotalAmount)
                )
            })
            .map(|(h, _)| h.as_str())
            .collect()
    }

    pub(crate) fn mapped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, t)| *t != MapTarget::Skip)
            .count()
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
