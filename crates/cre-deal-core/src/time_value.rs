use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CreDealError;
use crate::types::{Money, Rate};
use crate::CreDealResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;

/// Net Present Value of annual cash flows, the first at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> CreDealResult<Money> {
    if rate <= dec!(-1) {
        return Err(CreDealError::invalid(
            "rate",
            "Discount rate must be greater than -100%",
        ));
    }

    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;
    let mut result = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r).ok_or_else(out_of_range)?;
        }
        if discount.is_zero() {
            return Err(CreDealError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        let pv = cf.checked_div(discount).ok_or_else(out_of_range)?;
        result = result.checked_add(pv).ok_or_else(out_of_range)?;
    }

    Ok(result)
}

/// Internal Rate of Return using Newton-Raphson.
///
/// Discount factors are built by repeated multiplication, so the hold
/// period stays exact in decimal arithmetic.
pub fn irr(cash_flows: &[Money], guess: Rate) -> CreDealResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(CreDealError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }
    let has_outflow = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    let has_inflow = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    if !has_outflow || !has_inflow {
        return Err(CreDealError::InsufficientData(
            "IRR requires at least one negative and one positive cash flow".into(),
        ));
    }

    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let one_plus_r = Decimal::ONE + rate;
        let mut discount = Decimal::ONE;
        let mut npv_val = Decimal::ZERO;
        let mut dnpv = Decimal::ZERO;

        for (t, cf) in cash_flows.iter().enumerate() {
            if t > 0 {
                discount = discount.checked_mul(one_plus_r).ok_or_else(out_of_range)?;
            }
            if discount.is_zero() {
                continue;
            }
            let pv = cf.checked_div(discount).ok_or_else(out_of_range)?;
            npv_val = npv_val.checked_add(pv).ok_or_else(out_of_range)?;
            if t > 0 {
                let slope = Decimal::from(t as u64)
                    .checked_mul(*cf)
                    .and_then(|weighted| weighted.checked_div(discount.checked_mul(one_plus_r)?))
                    .ok_or_else(out_of_range)?;
                dnpv = dnpv.checked_sub(slope).ok_or_else(out_of_range)?;
            }
        }

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.is_zero() {
            return Err(CreDealError::ConvergenceFailure {
                function: "IRR".into(),
                iterations: i,
                last_delta: npv_val,
            });
        }

        rate = npv_val
            .checked_div(dnpv)
            .and_then(|step| rate.checked_sub(step))
            .ok_or_else(out_of_range)?;

        // Guard against divergence
        if rate < dec!(-0.99) {
            rate = dec!(-0.99);
        } else if rate > dec!(10) {
            rate = dec!(10);
        }
    }

    Err(CreDealError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_IRR_ITERATIONS,
        last_delta: npv(rate, cash_flows).unwrap_or(Decimal::MAX),
    })
}

fn out_of_range() -> CreDealError {
    CreDealError::invalid("cash_flows", "Discounted values are too large to represent")
}
