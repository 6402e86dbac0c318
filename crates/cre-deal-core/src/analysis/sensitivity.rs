//! What-if shifts around the base case: exit cap rate, NOI, interest rate
//! and leverage. Each shift recomputes only the figures it moves.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::HoldPeriodReturns;
use crate::deal::DealRecord;
use crate::financing::ratios::quotient;
use crate::financing::{dscr, mortgage_constant};
use crate::types::{Money, Multiple, Rate};
use crate::CreDealResult;

/// Exit cap rate shifts, in basis points.
pub const EXIT_CAP_SHIFTS_BPS: [u32; 2] = [50, 100];

/// Relative NOI shifts.
pub const NOI_SHIFTS: [Rate; 4] = [dec!(-0.10), dec!(-0.05), dec!(0.05), dec!(0.10)];

/// Interest rate shifts, in basis points.
pub const RATE_SHIFTS_BPS: [u32; 2] = [100, 200];

/// LTV shifts, in decimal points of leverage.
pub const LTV_SHIFTS: [Rate; 2] = [dec!(-0.05), dec!(0.05)];

const BASIS_POINT: Rate = dec!(0.0001);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitCapShift {
    pub shift_bps: u32,
    pub exit_cap_rate: Rate,
    pub exit_value: Money,
    /// Change against the base exit value
    pub value_change: Money,
    pub relative_change: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiShift {
    pub change: Rate,
    pub noi: Money,
    pub dscr: Option<Multiple>,
    /// DSCR falls below the covenant
    pub covenant_breach: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateShift {
    pub shift_bps: u32,
    pub interest_rate: Rate,
    pub annual_debt_service: Money,
    pub dscr: Option<Multiple>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LtvShift {
    pub change: Rate,
    pub ltv: Rate,
    pub loan_amount: Money,
    pub equity: Money,
    pub annual_debt_service: Money,
    pub dscr: Option<Multiple>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityAnalysis {
    pub covenant_dscr: Multiple,
    /// Empty unless the deal has an exit cap rate
    pub exit_cap: Vec<ExitCapShift>,
    pub noi: Vec<NoiShift>,
    /// Shifts that would push the rate to 100% or more are left out
    pub interest_rate: Vec<RateShift>,
    /// Shifts outside 0..=100% leverage are left out
    pub ltv: Vec<LtvShift>,
}

/// Shift one input at a time and report the metrics it moves.
///
/// `constant` is the year-1 mortgage constant the base case uses; rate
/// shifts recompute it with the deal's IO period so an interest-only first
/// year stays interest-only.
pub fn compute_sensitivities(
    deal: &DealRecord,
    constant: Rate,
    hold: Option<&HoldPeriodReturns>,
    covenant_dscr: Multiple,
) -> CreDealResult<SensitivityAnalysis> {
    let exit_cap = match hold {
        Some(hold) => exit_cap_shifts(hold)?,
        None => Vec::new(),
    };

    let noi = NOI_SHIFTS
        .iter()
        .map(|change| {
            let shifted = deal.noi() * (Decimal::ONE + change);
            let coverage = dscr(shifted, deal.loan_amount(), constant).ok();
            NoiShift {
                change: *change,
                noi: shifted,
                dscr: coverage,
                covenant_breach: coverage.map_or(false, |d| d < covenant_dscr),
            }
        })
        .collect();

    let mut interest_rate = Vec::with_capacity(RATE_SHIFTS_BPS.len());
    for bps in RATE_SHIFTS_BPS {
        let rate = deal.interest_rate() + Decimal::from(bps) * BASIS_POINT;
        let Ok(shifted) = mortgage_constant(rate, deal.amortization_years(), deal.io_months()) else {
            continue;
        };
        interest_rate.push(RateShift {
            shift_bps: bps,
            interest_rate: rate,
            annual_debt_service: deal.loan_amount() * shifted,
            dscr: dscr(deal.noi(), deal.loan_amount(), shifted).ok(),
        });
    }

    let base_ltv = quotient(deal.loan_amount(), deal.purchase_price(), "ltv")?;
    let ltv = LTV_SHIFTS
        .iter()
        .filter_map(|change| {
            let ltv = base_ltv + change;
            if ltv < Decimal::ZERO || ltv > Decimal::ONE {
                return None;
            }
            let loan_amount = deal.purchase_price() * ltv;
            Some(LtvShift {
                change: *change,
                ltv,
                loan_amount,
                equity: deal.purchase_price() - loan_amount,
                annual_debt_service: loan_amount * constant,
                dscr: dscr(deal.noi(), loan_amount, constant).ok(),
            })
        })
        .collect();

    Ok(SensitivityAnalysis {
        covenant_dscr,
        exit_cap,
        noi,
        interest_rate,
        ltv,
    })
}

fn exit_cap_shifts(hold: &HoldPeriodReturns) -> CreDealResult<Vec<ExitCapShift>> {
    EXIT_CAP_SHIFTS_BPS
        .iter()
        .map(|bps| {
            let exit_cap_rate = hold.exit_cap_rate + Decimal::from(*bps) * BASIS_POINT;
            let exit_value = quotient(hold.exit_noi, exit_cap_rate, "exit_cap_rate")?;
            let value_change = exit_value - hold.exit_value;
            Ok(ExitCapShift {
                shift_bps: *bps,
                exit_cap_rate,
                exit_value,
                value_change,
                relative_change: value_change.checked_div(hold.exit_value),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::DealInput;
    use crate::financing::loan_balance_after;
    use crate::types::{AssetClass, MarketTier};
    use pretty_assertions::assert_eq;

    fn deal(io_months: u32) -> DealRecord {
        DealRecord::new(DealInput {
            purchase_price: dec!(10_000_000),
            loan_amount: dec!(6_500_000),
            interest_rate: dec!(0.065),
            amortization_years: 30,
            io_months,
            noi: dec!(650_000),
            asset_class: AssetClass::Office,
            market_tier: MarketTier::Primary,
            submarket: "CBD".into(),
            noi_growth_rate: None,
            expense_ratio: None,
            exit_cap_rate: Some(dec!(0.065)),
        })
        .unwrap()
    }

    fn hold() -> HoldPeriodReturns {
        let exit_noi = dec!(650_000);
        let exit_value = exit_noi / dec!(0.065);
        HoldPeriodReturns {
            hold_years: 5,
            exit_cap_rate: dec!(0.065),
            exit_noi,
            exit_value,
            sale_costs: Decimal::ZERO,
            debt_service_by_year: Vec::new(),
            operating_cash_flows: Vec::new(),
            loan_balance_at_exit: loan_balance_after(dec!(6_500_000), dec!(0.065), 30, 0, 60).unwrap(),
            net_sale_proceeds: Decimal::ZERO,
            total_distributions: Decimal::ZERO,
            equity_multiple: None,
            levered_irr: None,
        }
    }

    fn base_constant() -> Rate {
        mortgage_constant(dec!(0.065), 30, 0).unwrap()
    }

    #[test]
    fn test_exit_cap_shifts_lower_value() {
        let s = compute_sensitivities(&deal(0), base_constant(), Some(&hold()), dec!(1.20)).unwrap();
        assert_eq!(s.exit_cap.len(), 2);
        let plus_50 = &s.exit_cap[0];
        assert_eq!(plus_50.exit_cap_rate, dec!(0.07));
        // 650k / 7% against 650k / 6.5%
        assert_eq!(plus_50.exit_value.round_dp(2), dec!(9_285_714.29));
        assert!(plus_50.value_change < Decimal::ZERO);
        let rel = plus_50.relative_change.unwrap();
        assert!((rel - dec!(-0.0714)).abs() < dec!(0.0001), "{rel}");
        assert!(s.exit_cap[1].exit_value < plus_50.exit_value);
    }

    #[test]
    fn test_no_exit_cap_shifts_without_hold() {
        let s = compute_sensitivities(&deal(0), base_constant(), None, dec!(1.20)).unwrap();
        assert!(s.exit_cap.is_empty());
        assert_eq!(s.noi.len(), 4);
    }

    #[test]
    fn test_noi_shifts_flag_covenant_breach() {
        let s = compute_sensitivities(&deal(0), base_constant(), None, dec!(1.20)).unwrap();
        let changes: Vec<Rate> = s.noi.iter().map(|n| n.change).collect();
        assert_eq!(changes, NOI_SHIFTS.to_vec());
        // 585k over ~493k of debt service is ~1.19x
        assert_eq!(s.noi[0].noi, dec!(585_000));
        assert!(s.noi[0].covenant_breach);
        // 617.5k is ~1.25x
        assert!(!s.noi[1].covenant_breach);
        assert!(s.noi[3].dscr.unwrap() > s.noi[2].dscr.unwrap());
    }

    #[test]
    fn test_rate_shifts_raise_debt_service() {
        let constant = base_constant();
        let s = compute_sensitivities(&deal(0), constant, None, dec!(1.20)).unwrap();
        let base_ads = dec!(6_500_000) * constant;
        assert_eq!(s.interest_rate[0].interest_rate, dec!(0.075));
        assert_eq!(s.interest_rate[1].interest_rate, dec!(0.085));
        assert!(s.interest_rate[0].annual_debt_service > base_ads);
        assert!(s.interest_rate[1].annual_debt_service > s.interest_rate[0].annual_debt_service);
        assert!(s.interest_rate[1].dscr.unwrap() < s.interest_rate[0].dscr.unwrap());
    }

    #[test]
    fn test_rate_shifts_stay_interest_only() {
        let s = compute_sensitivities(&deal(12), dec!(0.065), None, dec!(1.20)).unwrap();
        assert_eq!(s.interest_rate[0].annual_debt_service, dec!(487_500));
        assert_eq!(s.interest_rate[1].annual_debt_service, dec!(552_500));
    }

    #[test]
    fn test_ltv_shifts_move_loan_and_equity() {
        let s = compute_sensitivities(&deal(0), base_constant(), None, dec!(1.20)).unwrap();
        assert_eq!(s.ltv.len(), 2);
        assert_eq!(s.ltv[0].ltv, dec!(0.60));
        assert_eq!(s.ltv[0].loan_amount, dec!(6_000_000));
        assert_eq!(s.ltv[0].equity, dec!(4_000_000));
        assert_eq!(s.ltv[1].loan_amount, dec!(7_000_000));
        assert_eq!(s.ltv[1].equity, dec!(3_000_000));
        assert!(s.ltv[1].dscr.unwrap() < s.ltv[0].dscr.unwrap());
    }

    #[test]
    fn test_out_of_range_shifts_are_skipped() {
        let mut input = DealInput {
            purchase_price: dec!(1_000_000),
            loan_amount: dec!(980_000),
            interest_rate: dec!(0.985),
            amortization_years: 30,
            io_months: 0,
            noi: dec!(100_000),
            asset_class: AssetClass::Retail,
            market_tier: MarketTier::Primary,
            submarket: "Main St".into(),
            noi_growth_rate: None,
            expense_ratio: None,
            exit_cap_rate: None,
        };
        let constant = mortgage_constant(input.interest_rate, 30, 0).unwrap();
        let s = compute_sensitivities(&DealRecord::new(input.clone()).unwrap(), constant, None, dec!(1.20)).unwrap();
        // 98.5% + 200bp is no longer a decimal rate; 98% + 5 pts is over 100%
        assert_eq!(s.interest_rate.len(), 1);
        assert_eq!(s.ltv.len(), 1);
        assert_eq!(s.ltv[0].ltv, dec!(0.93));

        input.loan_amount = Decimal::ZERO;
        let s = compute_sensitivities(&DealRecord::new(input).unwrap(), constant, None, dec!(1.20)).unwrap();
        assert!(s.noi.iter().all(|n| n.dscr.is_none() && !n.covenant_breach));
        assert_eq!(s.ltv.len(), 1);
        assert_eq!(s.ltv[0].ltv, dec!(0.05));
    }
}
