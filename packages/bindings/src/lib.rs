use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cre_deal_core::analysis::analyze_deal;
use cre_deal_core::benchmarks::{evaluate_named, BenchmarkTable, DealTemplate};
use cre_deal_core::diligence::{ChecklistProvider, StandardChecklist};
use cre_deal_core::extraction::{draft_deal as draft_from_fields, ExtractedFields, DEFAULT_MIN_CONFIDENCE};
use cre_deal_core::financing::{Proforma, ProformaYear};
use cre_deal_core::{AssetClass, DealRecord, MarketTier};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn benchmark_table(template_json: Option<String>) -> NapiResult<BenchmarkTable> {
    let standard = BenchmarkTable::standard();
    match template_json {
        Some(json) => {
            let template = DealTemplate::from_json(&json).map_err(to_napi_error)?;
            template.apply(&standard).map_err(to_napi_error)
        }
        None => Ok(standard),
    }
}

// ---------------------------------------------------------------------------
// Deal analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze(input_json: String, template_json: Option<String>) -> NapiResult<String> {
    let deal: DealRecord = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = benchmark_table(template_json)?;
    let output = analyze_deal(&deal, &table).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct EvaluateRequest {
    metric: String,
    value: Decimal,
    asset_class: AssetClass,
    #[serde(default = "primary_tier")]
    market_tier: MarketTier,
}

fn primary_tier() -> MarketTier {
    MarketTier::Primary
}

#[napi]
pub fn evaluate_metric(input_json: String, template_json: Option<String>) -> NapiResult<String> {
    let req: EvaluateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let table = benchmark_table(template_json)?;
    let result = evaluate_named(&table, &req.metric, req.value, req.asset_class, req.market_tier)
        .map_err(to_napi_error)?;
    serde_json::to_string(&result).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pro forma
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ProformaRequest {
    noi: Decimal,
    growth_rate: Decimal,
    #[serde(default)]
    debt_service: Decimal,
    #[serde(default)]
    expense_ratio: Option<Decimal>,
    #[serde(default = "default_years")]
    years: u32,
}

fn default_years() -> u32 {
    5
}

#[derive(Serialize)]
struct ProformaResponse {
    proforma: Vec<ProformaYear>,
    total_cash_flow: Decimal,
    forward_noi: Decimal,
}

#[napi]
pub fn proforma(input_json: String) -> NapiResult<String> {
    let req: ProformaRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut pf = Proforma::new(req.noi, req.growth_rate, req.debt_service, req.years)
        .map_err(to_napi_error)?;
    if let Some(ratio) = req.expense_ratio {
        pf = pf.with_expense_ratio(ratio).map_err(to_napi_error)?;
    }
    let response = ProformaResponse {
        proforma: pf.iter().collect(),
        total_cash_flow: pf.total_cash_flow(),
        forward_noi: pf.forward_noi(),
    };
    serde_json::to_string(&response).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Extraction and diligence
// ---------------------------------------------------------------------------

#[napi]
pub fn draft_deal(fields_json: String, min_confidence: Option<String>) -> NapiResult<String> {
    let fields: ExtractedFields = serde_json::from_str(&fields_json).map_err(to_napi_error)?;
    let threshold = match min_confidence {
        Some(s) => s.parse::<Decimal>().map_err(to_napi_error)?,
        None => DEFAULT_MIN_CONFIDENCE,
    };
    let draft = draft_from_fields(&fields, threshold);
    serde_json::to_string(&draft).map_err(to_napi_error)
}

#[napi]
pub fn checklist(asset_class: String) -> NapiResult<String> {
    let asset: AssetClass = asset_class.parse().map_err(to_napi_error)?;
    let items = StandardChecklist.checklist(asset);
    serde_json::to_string(&items).map_err(to_napi_error)
}
