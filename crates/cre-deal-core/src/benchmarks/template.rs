use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::table::{BenchmarkOverrides, BenchmarkTable};
use crate::CreDealResult;

/// A saved deal template.
///
/// Only `benchmark_overrides` is interpreted here. The checklist additions
/// and profile name are carried through untouched for whoever stores the
/// template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealTemplate {
    pub template_name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_date: DateTime<Utc>,
    #[serde(default)]
    pub benchmark_overrides: BenchmarkOverrides,
    #[serde(default)]
    pub custom_dd_items: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub profile_name: String,
}

impl DealTemplate {
    pub fn from_json(json: &str) -> CreDealResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// New table: `base` with this template's overrides merged in.
    pub fn apply(&self, base: &BenchmarkTable) -> CreDealResult<BenchmarkTable> {
        base.with_overrides(&self.benchmark_overrides)
    }

    /// Number of individual metric entries overridden.
    pub fn override_count(&self) -> usize {
        self.benchmark_overrides
            .values()
            .flat_map(|tiers| tiers.values())
            .map(|metrics| metrics.len())
            .sum()
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid created_date '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::Metric;
    use crate::types::{AssetClass, MarketTier};
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const TEMPLATE: &str = r#"{
        "template_name": "Core office",
        "created_date": "2024-11-05T14:30:00.123456",
        "benchmark_overrides": {
            "Office": {
                "Primary": {
                    "cap_rate": ["0.05", "0.06", "0.07", "House view"]
                }
            }
        },
        "custom_dd_items": {"Environmental": ["Phase II ESA"]},
        "profile_name": "Core"
    }"#;

    #[test]
    fn test_parses_naive_timestamp_as_utc() {
        let t = DealTemplate::from_json(TEMPLATE).unwrap();
        assert_eq!(t.created_date.year(), 2024);
        assert_eq!(t.created_date.hour(), 14);
        assert_eq!(t.override_count(), 1);
        assert_eq!(t.profile_name, "Core");
        assert!(t.custom_dd_items.contains_key("Environmental"));
    }

    #[test]
    fn test_parses_rfc3339_offset() {
        let json = r#"{"template_name": "x", "created_date": "2024-01-01T05:00:00+05:00"}"#;
        let t = DealTemplate::from_json(json).unwrap();
        assert_eq!(t.created_date.hour(), 0);
        assert_eq!(t.override_count(), 0);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let json = r#"{"template_name": "x", "created_date": "last tuesday"}"#;
        assert!(DealTemplate::from_json(json).is_err());
    }

    #[test]
    fn test_apply_merges_single_metric() {
        let base = BenchmarkTable::standard();
        let merged = DealTemplate::from_json(TEMPLATE).unwrap().apply(&base).unwrap();
        let cap = merged
            .get(AssetClass::Office, MarketTier::Primary, Metric::CapRate)
            .unwrap();
        assert_eq!(cap.preferred(), dec!(0.06));
        assert_eq!(cap.source(), "House view");
        for m in [Metric::Dscr, Metric::Ltv, Metric::DebtYield] {
            assert_eq!(
                merged.get(AssetClass::Office, MarketTier::Primary, m),
                base.get(AssetClass::Office, MarketTier::Primary, m),
            );
        }
    }

    #[test]
    fn test_lowercase_keys_accepted() {
        let json = r#"{
            "template_name": "x",
            "created_date": "2024-01-01T00:00:00Z",
            "benchmark_overrides": {"multifamily": {"secondary": {"dscr": [1.3, 1.4, 1.5]}}}
        }"#;
        let t = DealTemplate::from_json(json).unwrap();
        let merged = t.apply(&BenchmarkTable::standard()).unwrap();
        let e = merged
            .get(AssetClass::Multifamily, MarketTier::Secondary, Metric::Dscr)
            .unwrap();
        assert_eq!(e.min(), dec!(1.3));
        assert_eq!(e.source(), "User Override");
    }
}
