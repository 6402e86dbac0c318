use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::benchmarks::{Classification, Metric, MetricAssessment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSeverity {
    High,
    Medium,
    Low,
}

impl RiskSeverity {
    /// Coverage and pricing metrics weigh heaviest, then leverage.
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Dscr | Metric::DebtYield | Metric::CapRate => RiskSeverity::High,
            Metric::Ltv => RiskSeverity::Medium,
            _ => RiskSeverity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSeverity::High => "HIGH",
            RiskSeverity::Medium => "MEDIUM",
            RiskSeverity::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric that sits outside its benchmark range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskItem {
    pub severity: RiskSeverity,
    pub metric: Metric,
    pub value: Decimal,
    pub classification: Classification,
    pub preferred: Decimal,
    pub explanation: String,
}

/// Every rated metric outside its range, most severe first. Ties keep
/// assessment order.
pub fn rank_risks(assessments: &[MetricAssessment]) -> Vec<RiskItem> {
    let mut risks: Vec<RiskItem> = assessments
        .iter()
        .filter_map(|a| a.evaluation())
        .filter(|e| e.classification != Classification::Within)
        .map(|e| {
            let side = match e.classification {
                Classification::Below => "below",
                _ => "above",
            };
            RiskItem {
                severity: RiskSeverity::for_metric(e.metric),
                metric: e.metric,
                value: e.value,
                classification: e.classification,
                preferred: e.benchmark.preferred(),
                explanation: format!(
                    "{} of {} is {side} the {} to {} range (preferred {})",
                    e.metric,
                    e.value.round_dp(4).normalize(),
                    e.benchmark.min().normalize(),
                    e.benchmark.max().normalize(),
                    e.benchmark.preferred().normalize(),
                ),
            }
        })
        .collect();
    risks.sort_by_key(|r| r.severity);
    risks
}
