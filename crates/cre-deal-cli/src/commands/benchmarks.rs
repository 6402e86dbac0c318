use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use cre_deal_core::benchmarks::{evaluate_named, BenchmarkTable, DealTemplate, Metric};
use cre_deal_core::{AssetClass, MarketTier};

use crate::input;

/// Arguments for rating a single metric
#[derive(Args)]
pub struct EvaluateArgs {
    /// Metric name (cap_rate, dscr, ltv, debt_yield, ...)
    #[arg(long)]
    pub metric: String,

    /// Metric value; rates as decimals (0.065), DSCR as a multiple (1.35)
    #[arg(long, allow_hyphen_values = true)]
    pub value: Decimal,

    /// Asset class: office, multifamily, industrial, retail, hotel
    #[arg(long)]
    pub asset_class: AssetClass,

    /// Market tier: primary, secondary, tertiary
    #[arg(long, default_value = "primary")]
    pub tier: MarketTier,

    /// Template JSON whose benchmark overrides replace the defaults
    #[arg(long)]
    pub template: Option<String>,
}

/// Arguments for listing benchmark ranges
#[derive(Args)]
pub struct BenchmarksArgs {
    /// Only this asset class
    #[arg(long)]
    pub asset_class: Option<AssetClass>,

    /// Only this market tier
    #[arg(long)]
    pub tier: Option<MarketTier>,

    /// Template JSON whose benchmark overrides replace the defaults
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
struct BenchmarkRow<'a> {
    asset_class: AssetClass,
    tier: MarketTier,
    metric: Metric,
    unit: &'static str,
    min: Decimal,
    preferred: Decimal,
    max: Decimal,
    source: &'a str,
}

/// The standard table, with a template's overrides merged in when given.
pub fn load_table(template: Option<&str>) -> Result<BenchmarkTable, Box<dyn std::error::Error>> {
    let base = BenchmarkTable::standard();
    let Some(path) = template else {
        return Ok(base);
    };
    let template = DealTemplate::from_json(&input::file::read_text(path)?)?;
    info!(
        template = %template.template_name,
        overrides = template.override_count(),
        "template loaded"
    );
    Ok(template.apply(&base)?)
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = load_table(args.template.as_deref())?;
    let result = evaluate_named(&table, &args.metric, args.value, args.asset_class, args.tier)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_benchmarks(args: BenchmarksArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = load_table(args.template.as_deref())?;
    let rows: Vec<BenchmarkRow> = table
        .iter()
        .filter(|(a, t, _)| {
            args.asset_class.map_or(true, |want| want == *a) && args.tier.map_or(true, |want| want == *t)
        })
        .map(|(asset_class, tier, entry)| BenchmarkRow {
            asset_class,
            tier,
            metric: entry.metric(),
            unit: entry.metric().info().unit,
            min: entry.min(),
            preferred: entry.preferred(),
            max: entry.max(),
            source: entry.source(),
        })
        .collect();
    Ok(serde_json::to_value(rows)?)
}
