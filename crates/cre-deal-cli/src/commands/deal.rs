use clap::Args;
use serde_json::Value;

use cre_deal_core::analysis::analyze_deal;
use cre_deal_core::DealRecord;

use super::benchmarks::load_table;
use crate::input;

/// Arguments for full deal analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON deal file
    #[arg(long)]
    pub input: Option<String>,

    /// Template JSON whose benchmark overrides replace the defaults
    #[arg(long)]
    pub template: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealRecord = input::read_input(args.input.as_deref(), "deal analysis")?;
    let table = load_table(args.template.as_deref())?;
    let result = analyze_deal(&deal, &table)?;
    Ok(serde_json::to_value(result)?)
}
