use cre_deal_core::benchmarks::{
    assess_all, evaluate, BenchmarkTable, Classification, DealTemplate, Metric,
};
use cre_deal_core::financing::cap_rate;
use cre_deal_core::{AssetClass, CreDealError, MarketTier};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const OFFICE_CAP_TEMPLATE: &str = r#"{
    "template_name": "Gateway office",
    "created_date": "2024-12-01T09:15:00Z",
    "benchmark_overrides": {
        "Office": {
            "Primary": {
                "cap_rate": ["0.050", "0.0575", "0.065", "Internal IC memo"]
            }
        }
    },
    "custom_dd_items": {},
    "profile_name": "Institutional"
}"#;

#[test]
fn test_cap_rate_reference_example_is_below() {
    let table = BenchmarkTable::standard();
    let value = cap_rate(dec!(500_000), dec!(10_000_000)).unwrap();
    let result = evaluate(&table, Metric::CapRate, value, AssetClass::Office, MarketTier::Primary).unwrap();
    assert_eq!(result.classification, Classification::Below);
    assert_eq!(result.benchmark.min(), dec!(0.055));
    assert_eq!(result.benchmark.max(), dec!(0.075));
    assert!(!result.within_preferred);
}

#[test]
fn test_evaluate_is_idempotent() {
    let table = BenchmarkTable::standard();
    let first = evaluate(&table, Metric::Dscr, dec!(1.38), AssetClass::Multifamily, MarketTier::Secondary);
    let second = evaluate(&table, Metric::Dscr, dec!(1.38), AssetClass::Multifamily, MarketTier::Secondary);
    assert_eq!(first.unwrap(), second.unwrap());
}

#[test]
fn test_tiers_shift_ranges() {
    let table = BenchmarkTable::standard();
    // Within the primary range but below the tertiary one
    let primary = evaluate(&table, Metric::CapRate, dec!(0.06), AssetClass::Industrial, MarketTier::Primary).unwrap();
    let tertiary = evaluate(&table, Metric::CapRate, dec!(0.055), AssetClass::Industrial, MarketTier::Tertiary).unwrap();
    assert_eq!(primary.classification, Classification::Within);
    assert_eq!(tertiary.classification, Classification::Below);
}

#[test]
fn test_unknown_benchmark_is_recoverable() {
    let table = BenchmarkTable::standard();
    let err = evaluate(&table, Metric::DebtYield, dec!(0.1), AssetClass::Hotel, MarketTier::Primary).unwrap_err();
    assert!(matches!(err, CreDealError::UnknownBenchmark { .. }));

    let assessments = assess_all(
        &table,
        vec![
            (Metric::DebtYield, Ok(dec!(0.1))),
            (Metric::CapRate, Ok(dec!(0.08))),
        ],
        AssetClass::Hotel,
        MarketTier::Primary,
    );
    assert_eq!(assessments[0].status_label(), "N/A");
    assert_eq!(assessments[1].status_label(), "WITHIN");
}

#[test]
fn test_template_only_touches_named_metric() {
    let base = BenchmarkTable::standard();
    let template = DealTemplate::from_json(OFFICE_CAP_TEMPLATE).unwrap();
    let merged = template.apply(&base).unwrap();

    let cap = merged.get(AssetClass::Office, MarketTier::Primary, Metric::CapRate).unwrap();
    assert_eq!(cap.preferred(), dec!(0.0575));
    assert_eq!(cap.source(), "Internal IC memo");

    for metric in [Metric::Dscr, Metric::Ltv, Metric::DebtYield] {
        assert_eq!(
            merged.get(AssetClass::Office, MarketTier::Primary, metric),
            base.get(AssetClass::Office, MarketTier::Primary, metric),
            "{metric} changed"
        );
    }
    // other tiers and classes untouched
    assert_eq!(
        merged.get(AssetClass::Office, MarketTier::Secondary, Metric::CapRate),
        base.get(AssetClass::Office, MarketTier::Secondary, Metric::CapRate)
    );
    assert_eq!(
        merged.get(AssetClass::Retail, MarketTier::Primary, Metric::CapRate),
        base.get(AssetClass::Retail, MarketTier::Primary, Metric::CapRate)
    );
}

#[test]
fn test_template_changes_classification() {
    let base = BenchmarkTable::standard();
    let merged = DealTemplate::from_json(OFFICE_CAP_TEMPLATE).unwrap().apply(&base).unwrap();
    let before = evaluate(&base, Metric::CapRate, dec!(0.052), AssetClass::Office, MarketTier::Primary).unwrap();
    let after = evaluate(&merged, Metric::CapRate, dec!(0.052), AssetClass::Office, MarketTier::Primary).unwrap();
    assert_eq!(before.classification, Classification::Below);
    assert_eq!(after.classification, Classification::Within);
}

#[test]
fn test_template_with_inverted_range_rejected() {
    let json = OFFICE_CAP_TEMPLATE.replace(r#""0.050", "0.0575""#, r#""0.060", "0.0575""#);
    let template = DealTemplate::from_json(&json).unwrap();
    assert!(matches!(
        template.apply(&BenchmarkTable::standard()),
        Err(CreDealError::InvalidInput { .. })
    ));
}
