use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metric::Metric;
use super::table::{BenchmarkEntry, BenchmarkTable};
use crate::error::CreDealError;
use crate::types::{AssetClass, MarketTier};
use crate::CreDealResult;

/// Relative distance from the preferred value still counted as "near preferred".
pub const PREFERRED_TOLERANCE: Decimal = dec!(0.05);

/// Where a value sits relative to its benchmark range. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Below,
    Within,
    Above,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Below => "BELOW",
            Classification::Within => "WITHIN",
            Classification::Above => "ABOVE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub metric: Metric,
    pub value: Decimal,
    pub classification: Classification,
    pub within_preferred: bool,
    pub benchmark: BenchmarkEntry,
}

/// Classify `value` against the table entry for (asset class, tier, metric).
pub fn evaluate(
    table: &BenchmarkTable,
    metric: Metric,
    value: Decimal,
    asset_class: AssetClass,
    tier: MarketTier,
) -> CreDealResult<EvaluationResult> {
    let entry = table.lookup(asset_class, tier, metric)?;
    Ok(classify(entry, value))
}

/// [`evaluate`] with the metric given by name. A name that is not a known
/// metric has no benchmark either, so it reports `UnknownBenchmark`.
pub fn evaluate_named(
    table: &BenchmarkTable,
    metric: &str,
    value: Decimal,
    asset_class: AssetClass,
    tier: MarketTier,
) -> CreDealResult<EvaluationResult> {
    let parsed = metric
        .parse::<Metric>()
        .map_err(|_| CreDealError::UnknownBenchmark {
            asset_class: asset_class.to_string(),
            tier: tier.to_string(),
            metric: metric.to_string(),
        })?;
    evaluate(table, parsed, value, asset_class, tier)
}

fn classify(entry: &BenchmarkEntry, value: Decimal) -> EvaluationResult {
    let classification = if value < entry.min() {
        Classification::Below
    } else if value > entry.max() {
        Classification::Above
    } else {
        Classification::Within
    };
    let band = (entry.preferred() * PREFERRED_TOLERANCE).abs();
    let within_preferred = (value - entry.preferred()).abs() <= band;

    EvaluationResult {
        metric: entry.metric(),
        value,
        classification,
        within_preferred,
        benchmark: entry.clone(),
    }
}

// ---------------------------------------------------------------------------
// Graceful assessment
// ---------------------------------------------------------------------------

/// Outcome of rating one metric: either a full evaluation or the reason it
/// could not be rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Rating {
    Rated(EvaluationResult),
    Unrated { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricAssessment {
    pub metric: Metric,
    pub value: Option<Decimal>,
    pub rating: Rating,
}

impl MetricAssessment {
    /// BELOW / WITHIN / ABOVE, or N/A when unrated.
    pub fn status_label(&self) -> &'static str {
        match &self.rating {
            Rating::Rated(r) => r.classification.as_str(),
            Rating::Unrated { .. } => "N/A",
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self.rating, Rating::Rated(_))
    }

    pub fn evaluation(&self) -> Option<&EvaluationResult> {
        match &self.rating {
            Rating::Rated(r) => Some(r),
            Rating::Unrated { .. } => None,
        }
    }
}

/// Rate one metric without failing. An error computing the value, or a
/// missing benchmark, becomes an `Unrated` assessment.
pub fn assess(
    table: &BenchmarkTable,
    metric: Metric,
    value: CreDealResult<Decimal>,
    asset_class: AssetClass,
    tier: MarketTier,
) -> MetricAssessment {
    let value = match value {
        Ok(v) => v,
        Err(e) => {
            debug!(%metric, error = %e, "metric not computed");
            return MetricAssessment {
                metric,
                value: None,
                rating: Rating::Unrated {
                    reason: e.to_string(),
                },
            };
        }
    };

    match evaluate(table, metric, value, asset_class, tier) {
        Ok(result) => MetricAssessment {
            metric,
            value: Some(value),
            rating: Rating::Rated(result),
        },
        Err(e) => {
            debug!(%metric, %asset_class, %tier, error = %e, "metric unrated");
            MetricAssessment {
                metric,
                value: Some(value),
                rating: Rating::Unrated {
                    reason: e.to_string(),
                },
            }
        }
    }
}

/// Rate every metric, in the order given. One failure never stops the rest.
pub fn assess_all<I>(
    table: &BenchmarkTable,
    metrics: I,
    asset_class: AssetClass,
    tier: MarketTier,
) -> Vec<MetricAssessment>
where
    I: IntoIterator<Item = (Metric, CreDealResult<Decimal>)>,
{
    metrics
        .into_iter()
        .map(|(metric, value)| assess(table, metric, value, asset_class, tier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn office(value: Decimal) -> EvaluationResult {
        evaluate(
            &BenchmarkTable::standard(),
            Metric::CapRate,
            value,
            AssetClass::Office,
            MarketTier::Primary,
        )
        .unwrap()
    }

    #[test]
    fn test_below_within_above() {
        assert_eq!(office(dec!(0.05)).classification, Classification::Below);
        assert_eq!(office(dec!(0.06)).classification, Classification::Within);
        assert_eq!(office(dec!(0.08)).classification, Classification::Above);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(office(dec!(0.055)).classification, Classification::Within);
        assert_eq!(office(dec!(0.075)).classification, Classification::Within);
        assert_eq!(office(dec!(0.0549999)).classification, Classification::Below);
    }

    #[test]
    fn test_within_preferred_band() {
        // preferred 0.065, band = 0.00325
        assert!(office(dec!(0.065)).within_preferred);
        assert!(office(dec!(0.06825)).within_preferred);
        assert!(office(dec!(0.06175)).within_preferred);
        assert!(!office(dec!(0.0683)).within_preferred);
        assert!(!office(dec!(0.058)).within_preferred);
    }

    #[test]
    fn test_result_carries_entry() {
        let r = office(dec!(0.06));
        assert_eq!(r.benchmark.source(), "CBRE Q4 2024");
        assert_eq!(r.metric, Metric::CapRate);
    }

    #[test]
    fn test_unknown_benchmark() {
        let table = BenchmarkTable::standard();
        let err = evaluate(&table, Metric::Irr, dec!(0.12), AssetClass::Office, MarketTier::Primary)
            .unwrap_err();
        assert!(matches!(err, CreDealError::UnknownBenchmark { .. }));

        let err = evaluate_named(&table, "occupancy", dec!(0.9), AssetClass::Office, MarketTier::Primary)
            .unwrap_err();
        assert!(matches!(err, CreDealError::UnknownBenchmark { ref metric, .. } if metric == "occupancy"));
    }

    #[test]
    fn test_evaluate_named_accepts_aliases() {
        let table = BenchmarkTable::standard();
        let r = evaluate_named(&table, "Cap Rate", dec!(0.05), AssetClass::Office, MarketTier::Primary)
            .unwrap();
        assert_eq!(r.classification, Classification::Below);
    }

    #[test]
    fn test_assess_all_continues_past_failures() {
        let table = BenchmarkTable::standard();
        let out = assess_all(
            &table,
            vec![
                (Metric::CapRate, Ok(dec!(0.09))),
                (Metric::Dscr, Err(CreDealError::DivisionByZero { context: "DSCR".into() })),
                (Metric::DebtYield, Ok(dec!(0.1))),
                (Metric::Ltv, Ok(dec!(0.6))),
            ],
            AssetClass::Hotel,
            MarketTier::Primary,
        );
        let labels: Vec<_> = out.iter().map(|a| a.status_label()).collect();
        // hotel has no debt yield benchmark
        assert_eq!(labels, vec!["WITHIN", "N/A", "N/A", "WITHIN"]);
        assert_eq!(out[1].value, None);
        assert_eq!(out[2].value, Some(dec!(0.1)));
        assert!(!out[2].is_rated());
    }

    #[test]
    fn test_rating_serializes_with_status_tag() {
        let a = assess(
            &BenchmarkTable::default(),
            Metric::CapRate,
            Ok(dec!(0.05)),
            AssetClass::Office,
            MarketTier::Primary,
        );
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["rating"]["status"], "unrated");
    }
}
