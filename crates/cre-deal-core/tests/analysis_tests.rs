use cre_deal_core::analysis::analyze_deal;
use cre_deal_core::benchmarks::{BenchmarkTable, DealTemplate, Metric};
use cre_deal_core::diligence::{ChecklistProvider, StandardChecklist};
use cre_deal_core::extraction::{draft_deal, DraftDefaults, ExtractedFields, DEFAULT_MIN_CONFIDENCE};
use cre_deal_core::{AssetClass, DealRecord};
use rust_decimal_macros::dec;

const MULTIFAMILY_DEAL: &str = r#"{
    "purchase_price": "24000000",
    "loan_amount": "16800000",
    "interest_rate": "0.0585",
    "amortization_years": 30,
    "io_months": 24,
    "noi": "1320000",
    "asset_class": "Multifamily",
    "market_tier": "Secondary",
    "submarket": "Riverside",
    "noi_growth_rate": "0.035",
    "exit_cap_rate": "0.0575"
}"#;

fn status(assessments: &[cre_deal_core::benchmarks::MetricAssessment], metric: Metric) -> &'static str {
    assessments
        .iter()
        .find(|a| a.metric == metric)
        .map(|a| a.status_label())
        .unwrap_or("missing")
}

#[test]
fn test_multifamily_deal_end_to_end() {
    let deal: DealRecord = serde_json::from_str(MULTIFAMILY_DEAL).unwrap();
    let out = analyze_deal(&deal, &BenchmarkTable::standard()).unwrap();
    let r = &out.result;

    // Full IO first year: constant is the coupon
    assert_eq!(r.mortgage_constant, dec!(0.0585));
    assert_eq!(r.annual_debt_service, dec!(982_800));
    assert_eq!(r.cap_rate, dec!(0.055));
    assert_eq!(r.ltv, dec!(0.7));
    // 1.32M / 982.8k
    assert!((r.dscr.unwrap() - dec!(1.3431)).abs() < dec!(0.0001));

    // Secondary multifamily: cap 5.0-7.0%, dscr 1.25-1.55, ltv 50-75%
    assert_eq!(status(&r.assessments, Metric::CapRate), "WITHIN");
    assert_eq!(status(&r.assessments, Metric::Dscr), "WITHIN");
    assert_eq!(status(&r.assessments, Metric::Ltv), "WITHIN");

    let hold = r.hold_period.as_ref().unwrap();
    // still inside IO at month 24, amortising afterwards
    assert!(hold.loan_balance_at_exit < dec!(16_800_000));
    assert!(hold.levered_irr.is_some());
    assert!(out.warnings.iter().any(|w| w.contains("Interest-only period ends after 24")));
}

#[test]
fn test_analysis_serialises_to_json() {
    let deal: DealRecord = serde_json::from_str(MULTIFAMILY_DEAL).unwrap();
    let out = analyze_deal(&deal, &BenchmarkTable::standard()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["asset_class"], "Multifamily");
    assert_eq!(json["result"]["proforma"].as_array().map(|a| a.len()), Some(5));
    assert_eq!(json["result"]["assessments"][0]["rating"]["status"], "rated");
    assert_eq!(json["result"]["assessments"][0]["rating"]["classification"], "WITHIN");
    assert!(json["metadata"]["version"].is_string());

    let sens = &json["result"]["sensitivities"];
    assert_eq!(sens["covenant_dscr"], "1.20");
    assert_eq!(sens["exit_cap"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(sens["noi"][0]["change"], "-0.10");
    assert_eq!(json["result"]["risks"].as_array().map(|a| a.len()), Some(0));
    assert_eq!(
        json["result"]["hold_period"]["debt_service_by_year"].as_array().map(|a| a.len()),
        Some(5)
    );
}

#[test]
fn test_offside_deal_ranks_risks() {
    let mut deal: serde_json::Value = serde_json::from_str(MULTIFAMILY_DEAL).unwrap();
    // 4.5% cap and ~1.10x coverage against a 5.0-7.0% / 1.25-1.55x market
    deal["noi"] = "1080000".into();
    let deal: DealRecord = serde_json::from_value(deal).unwrap();
    let out = analyze_deal(&deal, &BenchmarkTable::standard()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    let risks = json["result"]["risks"].as_array().unwrap();
    assert!(risks.len() >= 2);
    assert!(risks.iter().all(|r| r["severity"] == "HIGH"));
    assert_eq!(risks[0]["metric"], "cap_rate");
    assert_eq!(risks[0]["classification"], "BELOW");
}

#[test]
fn test_template_changes_analysis_outcome() {
    let deal: DealRecord = serde_json::from_str(MULTIFAMILY_DEAL).unwrap();
    let template = DealTemplate::from_json(
        r#"{
            "template_name": "Tight coverage",
            "created_date": "2025-01-15T00:00:00",
            "benchmark_overrides": {
                "Multifamily": {"Secondary": {"dscr": ["1.40", "1.50", "1.70"]}}
            }
        }"#,
    )
    .unwrap();
    let table = template.apply(&BenchmarkTable::standard()).unwrap();
    let out = analyze_deal(&deal, &table).unwrap();
    assert_eq!(status(&out.result.assessments, Metric::Dscr), "BELOW");
    assert_eq!(status(&out.result.assessments, Metric::CapRate), "WITHIN");
}

#[test]
fn test_extracted_deal_feeds_analysis() {
    let fields: ExtractedFields = serde_json::from_str(
        r#"{
            "Purchase Price": {"value": "$18,500,000", "confidence": 0.97},
            "NOI": {"value": "$1,202,500", "confidence": 0.91},
            "Cap Rate": {"value": "6.5%", "confidence": 0.88},
            "LTV": {"value": 60, "confidence": 0.82},
            "Interest Rate": {"value": "6.25%", "confidence": 0.9},
            "Property Type": {"value": "Industrial", "confidence": 0.99},
            "Clear Height": {"value": "32 ft", "confidence": 0.7},
            "Amortization": {"value": 25, "confidence": 0.45}
        }"#,
    )
    .unwrap();

    let draft = draft_deal(&fields, DEFAULT_MIN_CONFIDENCE);
    assert_eq!(draft.unrecognized, vec!["Clear Height".to_string()]);
    assert_eq!(draft.low_confidence, vec!["Amortization".to_string()]);
    assert_eq!(draft.loan_amount, Some(dec!(11_100_000)));

    let deal = draft.into_record(&DraftDefaults::default()).unwrap();
    assert_eq!(deal.asset_class(), AssetClass::Industrial);
    assert_eq!(deal.amortization_years(), 30);
    assert_eq!(deal.interest_rate(), dec!(0.0625));

    let out = analyze_deal(&deal, &BenchmarkTable::standard()).unwrap();
    assert_eq!(out.result.cap_rate, dec!(0.065));
    assert_eq!(status(&out.result.assessments, Metric::Ltv), "WITHIN");
}

#[test]
fn test_checklist_for_analysed_asset() {
    let deal: DealRecord = serde_json::from_str(MULTIFAMILY_DEAL).unwrap();
    let items = StandardChecklist.checklist(deal.asset_class());
    assert!(items.iter().any(|i| i.title == "Concession reports"));
}
