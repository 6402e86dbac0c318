use rust_decimal::Decimal;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::defaults::STANDARD_BENCHMARKS;
use super::metric::Metric;
use crate::error::CreDealError;
use crate::types::{AssetClass, MarketTier};
use crate::CreDealResult;

/// Source recorded for override rows that omit one.
pub const OVERRIDE_SOURCE: &str = "User Override";

// ---------------------------------------------------------------------------
// BenchmarkEntry
// ---------------------------------------------------------------------------

/// A (min, preferred, max) range for one metric with its source citation.
///
/// Construction enforces `min <= preferred <= max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkEntry {
    metric: Metric,
    min: Decimal,
    preferred: Decimal,
    max: Decimal,
    source: String,
}

impl BenchmarkEntry {
    pub fn new(
        metric: Metric,
        min: Decimal,
        preferred: Decimal,
        max: Decimal,
        source: impl Into<String>,
    ) -> CreDealResult<Self> {
        if min > preferred || preferred > max {
            return Err(CreDealError::invalid(
                metric.as_str(),
                format!("benchmark range must satisfy min <= preferred <= max (got {min}, {preferred}, {max})"),
            ));
        }
        Ok(Self::from_parts(metric, min, preferred, max, source))
    }

    pub(crate) fn from_parts(
        metric: Metric,
        min: Decimal,
        preferred: Decimal,
        max: Decimal,
        source: impl Into<String>,
    ) -> Self {
        BenchmarkEntry {
            metric,
            min,
            preferred,
            max,
            source: source.into(),
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn preferred(&self) -> Decimal {
        self.preferred
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Inclusive range check.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// One template override: `[min, preferred, max, source]`, source optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRow {
    pub min: Decimal,
    pub preferred: Decimal,
    pub max: Decimal,
    pub source: String,
}

/// asset class -> tier -> metric -> override row
pub type BenchmarkOverrides =
    BTreeMap<AssetClass, BTreeMap<MarketTier, BTreeMap<Metric, OverrideRow>>>;

impl Serialize for OverrideRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(4)?;
        tup.serialize_element(&self.min)?;
        tup.serialize_element(&self.preferred)?;
        tup.serialize_element(&self.max)?;
        tup.serialize_element(&self.source)?;
        tup.end()
    }
}

impl<'de> Deserialize<'de> for OverrideRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = OverrideRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array [min, preferred, max] or [min, preferred, max, source]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<OverrideRow, A::Error> {
                let min: Decimal = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let preferred: Decimal = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let max: Decimal = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let source: String = seq
                    .next_element()?
                    .unwrap_or_else(|| OVERRIDE_SOURCE.to_string());
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(5, &self));
                }
                Ok(OverrideRow {
                    min,
                    preferred,
                    max,
                    source,
                })
            }
        }

        deserializer.deserialize_seq(RowVisitor)
    }
}

// ---------------------------------------------------------------------------
// BenchmarkTable
// ---------------------------------------------------------------------------

/// Benchmark ranges keyed by (asset class, tier, metric).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkTable {
    entries: BTreeMap<(AssetClass, MarketTier), BTreeMap<Metric, BenchmarkEntry>>,
}

impl BenchmarkTable {
    /// The built-in industry table.
    pub fn standard() -> Self {
        let mut table = BenchmarkTable::default();
        for &(asset_class, tier, metric, min, preferred, max, source) in STANDARD_BENCHMARKS {
            table.insert(
                asset_class,
                tier,
                BenchmarkEntry::from_parts(metric, min, preferred, max, source),
            );
        }
        table
    }

    pub fn get(&self, asset_class: AssetClass, tier: MarketTier, metric: Metric) -> Option<&BenchmarkEntry> {
        self.entries
            .get(&(asset_class, tier))
            .and_then(|metrics| metrics.get(&metric))
    }

    /// Like [`get`](Self::get) but a missing combination is an `UnknownBenchmark` error.
    pub fn lookup(
        &self,
        asset_class: AssetClass,
        tier: MarketTier,
        metric: Metric,
    ) -> CreDealResult<&BenchmarkEntry> {
        self.get(asset_class, tier, metric)
            .ok_or_else(|| CreDealError::UnknownBenchmark {
                asset_class: asset_class.to_string(),
                tier: tier.to_string(),
                metric: metric.to_string(),
            })
    }

    pub fn entries_for(
        &self,
        asset_class: AssetClass,
        tier: MarketTier,
    ) -> impl Iterator<Item = &BenchmarkEntry> {
        self.entries
            .get(&(asset_class, tier))
            .into_iter()
            .flat_map(|metrics| metrics.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, MarketTier, &BenchmarkEntry)> {
        self.entries
            .iter()
            .flat_map(|(&(a, t), metrics)| metrics.values().map(move |e| (a, t, e)))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deep-merge `overrides` into a copy of this table.
    ///
    /// Only the metric entries named in `overrides` are replaced; every other
    /// entry, including other metrics of the same asset class and tier, keeps
    /// its current value. `self` is left untouched.
    pub fn with_overrides(&self, overrides: &BenchmarkOverrides) -> CreDealResult<Self> {
        let mut merged = self.clone();
        for (&asset_class, tiers) in overrides {
            for (&tier, metrics) in tiers {
                for (&metric, row) in metrics {
                    let entry = BenchmarkEntry::new(
                        metric,
                        row.min,
                        row.preferred,
                        row.max,
                        row.source.clone(),
                    )
                    .map_err(|e| match e {
                        CreDealError::InvalidInput { reason, .. } => CreDealError::InvalidInput {
                            field: format!("benchmark_overrides.{asset_class}.{tier}.{metric}"),
                            reason,
                        },
                        other => other,
                    })?;
                    debug!(%asset_class, %tier, %metric, source = entry.source(), "benchmark override applied");
                    merged.insert(asset_class, tier, entry);
                }
            }
        }
        Ok(merged)
    }

    fn insert(&mut self, asset_class: AssetClass, tier: MarketTier, entry: BenchmarkEntry) {
        self.entries
            .entry((asset_class, tier))
            .or_default()
            .insert(entry.metric(), entry);
    }
}
