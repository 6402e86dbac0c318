//! Built-in benchmark ranges.
//!
//! Primary-market values are the published survey figures named in each
//! row's source. Secondary and tertiary rows apply a fixed spread to all
//! three values: wider cap rates and debt yields, higher coverage, lower
//! leverage.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::metric::Metric;
use crate::types::{AssetClass, MarketTier};

/// (asset class, tier, metric, min, preferred, max, source)
pub type BenchmarkRow = (
    AssetClass,
    MarketTier,
    Metric,
    Decimal,
    Decimal,
    Decimal,
    &'static str,
);

pub const STANDARD_BENCHMARKS: &[BenchmarkRow] = &[
    // Office / Primary
    (AssetClass::Office, MarketTier::Primary, Metric::CapRate, dec!(0.055), dec!(0.065), dec!(0.075), "CBRE Q4 2024"),
    (AssetClass::Office, MarketTier::Primary, Metric::Dscr, dec!(1.25), dec!(1.4), dec!(1.6), "MBA Survey Q4 2024"),
    (AssetClass::Office, MarketTier::Primary, Metric::Ltv, dec!(0.5), dec!(0.65), dec!(0.75), "CMBS Market Report 2024"),
    (AssetClass::Office, MarketTier::Primary, Metric::DebtYield, dec!(0.08), dec!(0.095), dec!(0.11), "CMBS Market Report 2024"),
    // Office / Secondary
    (AssetClass::Office, MarketTier::Secondary, Metric::CapRate, dec!(0.06), dec!(0.07), dec!(0.08), "CBRE Q4 2024"),
    (AssetClass::Office, MarketTier::Secondary, Metric::Dscr, dec!(1.3), dec!(1.45), dec!(1.65), "MBA Survey Q4 2024"),
    (AssetClass::Office, MarketTier::Secondary, Metric::Ltv, dec!(0.45), dec!(0.6), dec!(0.7), "CMBS Market Report 2024"),
    (AssetClass::Office, MarketTier::Secondary, Metric::DebtYield, dec!(0.085), dec!(0.1), dec!(0.115), "CMBS Market Report 2024"),
    // Office / Tertiary
    (AssetClass::Office, MarketTier::Tertiary, Metric::CapRate, dec!(0.065), dec!(0.075), dec!(0.085), "CBRE Q4 2024"),
    (AssetClass::Office, MarketTier::Tertiary, Metric::Dscr, dec!(1.35), dec!(1.5), dec!(1.7), "MBA Survey Q4 2024"),
    (AssetClass::Office, MarketTier::Tertiary, Metric::Ltv, dec!(0.4), dec!(0.55), dec!(0.65), "CMBS Market Report 2024"),
    (AssetClass::Office, MarketTier::Tertiary, Metric::DebtYield, dec!(0.09), dec!(0.105), dec!(0.12), "CMBS Market Report 2024"),
    // Multifamily / Primary
    (AssetClass::Multifamily, MarketTier::Primary, Metric::CapRate, dec!(0.045), dec!(0.055), dec!(0.065), "RCA Analytics Q4 2024"),
    (AssetClass::Multifamily, MarketTier::Primary, Metric::Dscr, dec!(1.2), dec!(1.35), dec!(1.5), "Freddie Mac 2024"),
    (AssetClass::Multifamily, MarketTier::Primary, Metric::Ltv, dec!(0.55), dec!(0.7), dec!(0.8), "Fannie Mae Guidelines 2024"),
    (AssetClass::Multifamily, MarketTier::Primary, Metric::DebtYield, dec!(0.07), dec!(0.085), dec!(0.1), "Agency Guidelines 2024"),
    // Multifamily / Secondary
    (AssetClass::Multifamily, MarketTier::Secondary, Metric::CapRate, dec!(0.05), dec!(0.06), dec!(0.07), "RCA Analytics Q4 2024"),
    (AssetClass::Multifamily, MarketTier::Secondary, Metric::Dscr, dec!(1.25), dec!(1.4), dec!(1.55), "Freddie Mac 2024"),
    (AssetClass::Multifamily, MarketTier::Secondary, Metric::Ltv, dec!(0.5), dec!(0.65), dec!(0.75), "Fannie Mae Guidelines 2024"),
    (AssetClass::Multifamily, MarketTier::Secondary, Metric::DebtYield, dec!(0.075), dec!(0.09), dec!(0.105), "Agency Guidelines 2024"),
    // Multifamily / Tertiary
    (AssetClass::Multifamily, MarketTier::Tertiary, Metric::CapRate, dec!(0.055), dec!(0.065), dec!(0.075), "RCA Analytics Q4 2024"),
    (AssetClass::Multifamily, MarketTier::Tertiary, Metric::Dscr, dec!(1.3), dec!(1.45), dec!(1.6), "Freddie Mac 2024"),
    (AssetClass::Multifamily, MarketTier::Tertiary, Metric::Ltv, dec!(0.45), dec!(0.6), dec!(0.7), "Fannie Mae Guidelines 2024"),
    (AssetClass::Multifamily, MarketTier::Tertiary, Metric::DebtYield, dec!(0.08), dec!(0.095), dec!(0.11), "Agency Guidelines 2024"),
    // Industrial / Primary
    (AssetClass::Industrial, MarketTier::Primary, Metric::CapRate, dec!(0.05), dec!(0.06), dec!(0.07), "JLL Research Q4 2024"),
    (AssetClass::Industrial, MarketTier::Primary, Metric::Dscr, dec!(1.25), dec!(1.4), dec!(1.55), "Life Co Survey 2024"),
    (AssetClass::Industrial, MarketTier::Primary, Metric::Ltv, dec!(0.55), dec!(0.65), dec!(0.7), "CMBS Market Report 2024"),
    (AssetClass::Industrial, MarketTier::Primary, Metric::DebtYield, dec!(0.085), dec!(0.1), dec!(0.12), "Institutional Lenders 2024"),
    // Industrial / Secondary
    (AssetClass::Industrial, MarketTier::Secondary, Metric::CapRate, dec!(0.055), dec!(0.065), dec!(0.075), "JLL Research Q4 2024"),
    (AssetClass::Industrial, MarketTier::Secondary, Metric::Dscr, dec!(1.3), dec!(1.45), dec!(1.6), "Life Co Survey 2024"),
    (AssetClass::Industrial, MarketTier::Secondary, Metric::Ltv, dec!(0.5), dec!(0.6), dec!(0.65), "CMBS Market Report 2024"),
    (AssetClass::Industrial, MarketTier::Secondary, Metric::DebtYield, dec!(0.09), dec!(0.105), dec!(0.125), "Institutional Lenders 2024"),
    // Industrial / Tertiary
    (AssetClass::Industrial, MarketTier::Tertiary, Metric::CapRate, dec!(0.06), dec!(0.07), dec!(0.08), "JLL Research Q4 2024"),
    (AssetClass::Industrial, MarketTier::Tertiary, Metric::Dscr, dec!(1.35), dec!(1.5), dec!(1.65), "Life Co Survey 2024"),
    (AssetClass::Industrial, MarketTier::Tertiary, Metric::Ltv, dec!(0.45), dec!(0.55), dec!(0.6), "CMBS Market Report 2024"),
    (AssetClass::Industrial, MarketTier::Tertiary, Metric::DebtYield, dec!(0.095), dec!(0.11), dec!(0.13), "Institutional Lenders 2024"),
    // Retail / Primary
    (AssetClass::Retail, MarketTier::Primary, Metric::CapRate, dec!(0.06), dec!(0.07), dec!(0.08), "Cushman & Wakefield 2024"),
    (AssetClass::Retail, MarketTier::Primary, Metric::Dscr, dec!(1.35), dec!(1.5), dec!(1.75), "Regional Banks Survey"),
    (AssetClass::Retail, MarketTier::Primary, Metric::Ltv, dec!(0.5), dec!(0.6), dec!(0.65), "Insurance Co Guidelines"),
    (AssetClass::Retail, MarketTier::Primary, Metric::DebtYield, dec!(0.09), dec!(0.105), dec!(0.125), "Debt Funds Survey 2024"),
    // Retail / Secondary
    (AssetClass::Retail, MarketTier::Secondary, Metric::CapRate, dec!(0.065), dec!(0.075), dec!(0.085), "Cushman & Wakefield 2024"),
    (AssetClass::Retail, MarketTier::Secondary, Metric::Dscr, dec!(1.4), dec!(1.55), dec!(1.8), "Regional Banks Survey"),
    (AssetClass::Retail, MarketTier::Secondary, Metric::Ltv, dec!(0.45), dec!(0.55), dec!(0.6), "Insurance Co Guidelines"),
    (AssetClass::Retail, MarketTier::Secondary, Metric::DebtYield, dec!(0.095), dec!(0.11), dec!(0.13), "Debt Funds Survey 2024"),
    // Retail / Tertiary
    (AssetClass::Retail, MarketTier::Tertiary, Metric::CapRate, dec!(0.07), dec!(0.08), dec!(0.09), "Cushman & Wakefield 2024"),
    (AssetClass::Retail, MarketTier::Tertiary, Metric::Dscr, dec!(1.45), dec!(1.6), dec!(1.85), "Regional Banks Survey"),
    (AssetClass::Retail, MarketTier::Tertiary, Metric::Ltv, dec!(0.4), dec!(0.5), dec!(0.55), "Insurance Co Guidelines"),
    (AssetClass::Retail, MarketTier::Tertiary, Metric::DebtYield, dec!(0.1), dec!(0.115), dec!(0.135), "Debt Funds Survey 2024"),
    // Hotel / Primary
    (AssetClass::Hotel, MarketTier::Primary, Metric::CapRate, dec!(0.07), dec!(0.085), dec!(0.1), "STR/HVS Report 2024"),
    (AssetClass::Hotel, MarketTier::Primary, Metric::Dscr, dec!(1.3), dec!(1.45), dec!(1.6), "Hospitality Lenders 2024"),
    (AssetClass::Hotel, MarketTier::Primary, Metric::Ltv, dec!(0.5), dec!(0.6), dec!(0.65), "CMBS Hotel Loans 2024"),
    // Hotel / Secondary
    (AssetClass::Hotel, MarketTier::Secondary, Metric::CapRate, dec!(0.075), dec!(0.09), dec!(0.105), "STR/HVS Report 2024"),
    (AssetClass::Hotel, MarketTier::Secondary, Metric::Dscr, dec!(1.35), dec!(1.5), dec!(1.65), "Hospitality Lenders 2024"),
    (AssetClass::Hotel, MarketTier::Secondary, Metric::Ltv, dec!(0.45), dec!(0.55), dec!(0.6), "CMBS Hotel Loans 2024"),
    // Hotel / Tertiary
    (AssetClass::Hotel, MarketTier::Tertiary, Metric::CapRate, dec!(0.08), dec!(0.095), dec!(0.11), "STR/HVS Report 2024"),
    (AssetClass::Hotel, MarketTier::Tertiary, Metric::Dscr, dec!(1.4), dec!(1.55), dec!(1.7), "Hospitality Lenders 2024"),
    (AssetClass::Hotel, MarketTier::Tertiary, Metric::Ltv, dec!(0.4), dec!(0.5), dec!(0.55), "CMBS Hotel Loans 2024"),
];
