use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CreDealError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 1.35x DSCR)
pub type Multiple = Decimal;

/// Longest amortization schedule accepted, in years.
pub const MAX_AMORTIZATION_YEARS: u32 = 50;

/// Longest interest-only period accepted, in months.
pub const MAX_IO_MONTHS: u32 = 600;

/// Largest price or NOI a deal may carry (one quadrillion).
pub const MAX_DEAL_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Property type used to select a benchmark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    #[serde(alias = "office")]
    Office,
    #[serde(alias = "multifamily")]
    Multifamily,
    #[serde(alias = "industrial")]
    Industrial,
    #[serde(alias = "retail")]
    Retail,
    #[serde(alias = "hotel")]
    Hotel,
}

impl AssetClass {
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Office,
        AssetClass::Multifamily,
        AssetClass::Industrial,
        AssetClass::Retail,
        AssetClass::Hotel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Office => "Office",
            AssetClass::Multifamily => "Multifamily",
            AssetClass::Industrial => "Industrial",
            AssetClass::Retail => "Retail",
            AssetClass::Hotel => "Hotel",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = CreDealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "office" => Ok(AssetClass::Office),
            "multifamily" | "multi_family" | "apartment" | "apartments" => {
                Ok(AssetClass::Multifamily)
            }
            "industrial" | "warehouse" => Ok(AssetClass::Industrial),
            "retail" => Ok(AssetClass::Retail),
            "hotel" | "hospitality" => Ok(AssetClass::Hotel),
            _ => Err(CreDealError::invalid(
                "asset_class",
                format!("unrecognised asset class '{s}'"),
            )),
        }
    }
}

/// Submarket tier. Lower tiers carry wider cap rates and tighter leverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketTier {
    #[serde(alias = "primary")]
    Primary,
    #[serde(alias = "secondary")]
    Secondary,
    #[serde(alias = "tertiary")]
    Tertiary,
}

impl MarketTier {
    pub const ALL: [MarketTier; 3] = [
        MarketTier::Primary,
        MarketTier::Secondary,
        MarketTier::Tertiary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTier::Primary => "Primary",
            MarketTier::Secondary => "Secondary",
            MarketTier::Tertiary => "Tertiary",
        }
    }
}

impl fmt::Display for MarketTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketTier {
    type Err = CreDealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "primary" | "tier_1" | "gateway" => Ok(MarketTier::Primary),
            "secondary" | "tier_2" => Ok(MarketTier::Secondary),
            "tertiary" | "tier_3" => Ok(MarketTier::Tertiary),
            _ => Err(CreDealError::invalid(
                "market_tier",
                format!("unrecognised market tier '{s}'"),
            )),
        }
    }
}

/// Lowercase, trim, and fold spaces and hyphens into underscores.
pub fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_class_parse_is_lenient() {
        assert_eq!("office".parse::<AssetClass>().unwrap(), AssetClass::Office);
        assert_eq!(
            " Multi-Family ".parse::<AssetClass>().unwrap(),
            AssetClass::Multifamily
        );
        assert_eq!("Hospitality".parse::<AssetClass>().unwrap(), AssetClass::Hotel);
        assert!("farmland".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_market_tier_parse() {
        assert_eq!("PRIMARY".parse::<MarketTier>().unwrap(), MarketTier::Primary);
        assert_eq!("tier 3".parse::<MarketTier>().unwrap(), MarketTier::Tertiary);
        assert!("quaternary".parse::<MarketTier>().is_err());
    }

    #[test]
    fn test_enums_serialize_as_names() {
        let v = serde_json::to_value(AssetClass::Retail).unwrap();
        assert_eq!(v, serde_json::json!("Retail"));
        let t: MarketTier = serde_json::from_str("\"Secondary\"").unwrap();
        assert_eq!(t, MarketTier::Secondary);
        let a: AssetClass = serde_json::from_str("\"multifamily\"").unwrap();
        assert_eq!(a, AssetClass::Multifamily);
    }
}
