use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::AssetClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiligenceCategory {
    Financial,
    Physical,
    Market,
    Legal,
    Debt,
}

impl DiligenceCategory {
    pub const ALL: [DiligenceCategory; 5] = [
        DiligenceCategory::Financial,
        DiligenceCategory::Physical,
        DiligenceCategory::Market,
        DiligenceCategory::Legal,
        DiligenceCategory::Debt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiligenceCategory::Financial => "Financial Review",
            DiligenceCategory::Physical => "Physical Inspection",
            DiligenceCategory::Market => "Market Analysis",
            DiligenceCategory::Legal => "Legal Review",
            DiligenceCategory::Debt => "Debt Review",
        }
    }
}

impl fmt::Display for DiligenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub category: DiligenceCategory,
    pub title: String,
    pub description: String,
    /// Present only because of the asset class
    pub asset_specific: bool,
}

/// Supplies the due-diligence checklist for an asset class.
pub trait ChecklistProvider {
    fn checklist(&self, asset_class: AssetClass) -> Vec<ChecklistItem>;
}

/// Five base reviews for every deal, followed by items particular to the
/// asset class.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChecklist;

const BASE_ITEMS: [(DiligenceCategory, &str); 5] = [
    (
        DiligenceCategory::Financial,
        "Rent roll, operating statements, leases",
    ),
    (
        DiligenceCategory::Physical,
        "Property condition, environmental, roof/structure",
    ),
    (
        DiligenceCategory::Market,
        "Comps, absorption, new supply",
    ),
    (
        DiligenceCategory::Legal,
        "Title, survey, zoning, permits",
    ),
    (
        DiligenceCategory::Debt,
        "Loan documents, assumability, prepayment",
    ),
];

fn asset_items(asset_class: AssetClass) -> &'static [(DiligenceCategory, &'static str)] {
    use DiligenceCategory::*;
    match asset_class {
        AssetClass::Office => &[
            (Financial, "Parking income analysis"),
            (Market, "Tenant industry concentration risk"),
            (Market, "Space planning efficiency study"),
            (Market, "Amenity audit vs. competition"),
        ],
        AssetClass::Multifamily => &[
            (Financial, "Concession reports"),
            (Financial, "Turn costs analysis"),
            (Financial, "Bad debt history"),
        ],
        AssetClass::Industrial => &[
            (Physical, "Phase II ESA if recommended"),
            (Physical, "Geotechnical report"),
            (Physical, "Floor flatness survey"),
        ],
        AssetClass::Retail => &[
            (Financial, "Tenant sales reports"),
            (Financial, "Percentage rent calculations"),
            (Market, "Sales performance vs. market"),
            (Market, "Co-tenancy analysis"),
            (Market, "Traffic counts and patterns"),
        ],
        AssetClass::Hotel => &[
            (Financial, "STR competitive set reports"),
            (Financial, "Departmental P&L and GOP margin history"),
            (Legal, "Franchise agreement and PIP requirements"),
            (Legal, "Hotel management agreement"),
        ],
    }
}

impl ChecklistProvider for StandardChecklist {
    fn checklist(&self, asset_class: AssetClass) -> Vec<ChecklistItem> {
        let base = BASE_ITEMS.iter().map(|&(category, description)| ChecklistItem {
            category,
            title: category.as_str().to_string(),
            description: description.to_string(),
            asset_specific: false,
        });
        let specific = asset_items(asset_class)
            .iter()
            .map(|&(category, title)| ChecklistItem {
                category,
                title: title.to_string(),
                description: format!("{asset_class} specific"),
                asset_specific: true,
            });
        base.chain(specific).collect()
    }
}
