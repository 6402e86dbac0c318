use cre_deal_core::benchmarks::{evaluate, BenchmarkTable, Metric};
use cre_deal_core::financing::{dscr, five_year_proforma, mortgage_constant};
use cre_deal_core::{AssetClass, MarketTier};
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

fn rate_from_bps(bps: u32) -> Decimal {
    Decimal::new(bps as i64, 4)
}

fn asset_class() -> impl Strategy<Value = AssetClass> {
    prop::sample::select(AssetClass::ALL.to_vec())
}

fn market_tier() -> impl Strategy<Value = MarketTier> {
    prop::sample::select(MarketTier::ALL.to_vec())
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn full_interest_only_constant_equals_rate(
        bps in 1_u32..2_500,
        years in 1_u32..=50,
        extra_io in 0_u32..600,
    ) {
        let rate = rate_from_bps(bps);
        let io_months = (years * 12 + extra_io).min(600);
        let mc = mortgage_constant(rate, years, io_months).unwrap();
        prop_assert_eq!(mc, rate);
    }

    #[test]
    fn dscr_increases_with_noi(
        noi in 1_i64..100_000_000,
        bump in 1_i64..10_000_000,
        loan in 1_i64..1_000_000_000,
        mc_bps in 1_u32..2_000,
    ) {
        let mc = rate_from_bps(mc_bps);
        let lower = dscr(Decimal::from(noi), Decimal::from(loan), mc).unwrap();
        let higher = dscr(Decimal::from(noi + bump), Decimal::from(loan), mc).unwrap();
        prop_assert!(higher > lower);
    }

    #[test]
    fn dscr_decreases_with_loan(
        noi in 1_i64..100_000_000,
        loan in 1_i64..1_000_000_000,
        bump in 1_i64..100_000_000,
        mc_bps in 1_u32..2_000,
    ) {
        let mc = rate_from_bps(mc_bps);
        let smaller_loan = dscr(Decimal::from(noi), Decimal::from(loan), mc).unwrap();
        let larger_loan = dscr(Decimal::from(noi), Decimal::from(loan + bump), mc).unwrap();
        prop_assert!(smaller_loan > larger_loan);
    }

    #[test]
    fn evaluate_is_idempotent(
        asset in asset_class(),
        tier in market_tier(),
        metric in prop::sample::select(vec![Metric::CapRate, Metric::Dscr, Metric::Ltv]),
        bps in 0_u32..30_000,
    ) {
        let table = BenchmarkTable::standard();
        let value = rate_from_bps(bps);
        let first = evaluate(&table, metric, value, asset, tier).unwrap();
        let second = evaluate(&table, metric, value, asset, tier).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn proforma_restarts_identically(
        noi in 1_i64..50_000_000,
        growth_bps in 0_u32..1_000,
        debt_service in 0_i64..50_000_000,
    ) {
        let pf = five_year_proforma(Decimal::from(noi), rate_from_bps(growth_bps), Decimal::from(debt_service)).unwrap();
        let first: Vec<_> = pf.iter().collect();
        let second: Vec<_> = pf.iter().collect();
        prop_assert_eq!(first.len(), 5);
        prop_assert_eq!(first, second);
    }
}
