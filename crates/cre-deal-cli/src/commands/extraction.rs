use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use cre_deal_core::analysis::analyze_deal;
use cre_deal_core::extraction::{draft_deal, DraftDefaults, ExtractedFields};
use cre_deal_core::MarketTier;

use super::benchmarks::load_table;
use crate::input;

/// Arguments for drafting a deal from OCR readings
#[derive(Args)]
pub struct ExtractArgs {
    /// Path to JSON file: {"<label>": {"value": ..., "confidence": 0.9}, ...}
    #[arg(long)]
    pub input: Option<String>,

    /// Readings below this confidence are set aside
    #[arg(long, default_value = "0.6")]
    pub min_confidence: Decimal,

    /// Also build the deal and run the full analysis
    #[arg(long)]
    pub analyze: bool,

    /// Interest rate used when the document states none
    #[arg(long, default_value = "0.065")]
    pub default_rate: Decimal,

    /// Amortization used when the document states none
    #[arg(long, default_value = "30")]
    pub default_amortization: u32,

    /// Market tier used when the document states none
    #[arg(long, default_value = "primary")]
    pub default_tier: MarketTier,

    /// Template JSON whose benchmark overrides replace the defaults
    #[arg(long)]
    pub template: Option<String>,
}

pub fn run_extract(args: ExtractArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fields: ExtractedFields = input::read_input(args.input.as_deref(), "extracted fields")?;
    let draft = draft_deal(&fields, args.min_confidence);

    if !args.analyze {
        return Ok(serde_json::to_value(draft)?);
    }

    let defaults = DraftDefaults {
        interest_rate: args.default_rate,
        amortization_years: args.default_amortization,
        market_tier: args.default_tier,
        ..DraftDefaults::default()
    };
    let draft_json = serde_json::to_value(&draft)?;
    let deal = draft.into_record(&defaults)?;
    let table = load_table(args.template.as_deref())?;
    let analysis = analyze_deal(&deal, &table)?;
    Ok(json!({
        "draft": draft_json,
        "analysis": analysis,
    }))
}
