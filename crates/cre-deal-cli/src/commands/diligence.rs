use clap::Args;
use serde_json::Value;

use cre_deal_core::diligence::{ChecklistProvider, StandardChecklist};
use cre_deal_core::AssetClass;

/// Arguments for the due-diligence checklist
#[derive(Args)]
pub struct ChecklistArgs {
    /// Asset class: office, multifamily, industrial, retail, hotel
    #[arg(long)]
    pub asset_class: AssetClass,
}

pub fn run_checklist(args: ChecklistArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let items = StandardChecklist.checklist(args.asset_class);
    Ok(serde_json::to_value(items)?)
}
