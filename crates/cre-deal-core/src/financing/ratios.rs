use rust_decimal::Decimal;

use crate::error::CreDealError;
use crate::types::{Money, Multiple, Rate};
use crate::CreDealResult;

/// Debt service coverage: NOI / (loan amount * mortgage constant).
pub fn dscr(noi: Money, loan_amount: Money, mortgage_constant: Rate) -> CreDealResult<Multiple> {
    if loan_amount.is_zero() {
        return Err(CreDealError::DivisionByZero {
            context: "DSCR (loan amount is zero)".into(),
        });
    }
    let debt_service = loan_amount
        .checked_mul(mortgage_constant)
        .ok_or_else(|| CreDealError::invalid("loan_amount", "Debt service is too large to represent"))?;
    if debt_service.is_zero() {
        return Err(CreDealError::DivisionByZero {
            context: "DSCR (mortgage constant is zero)".into(),
        });
    }
    quotient(noi, debt_service, "dscr")
}

/// Going-in capitalisation rate: NOI / purchase price.
pub fn cap_rate(noi: Money, purchase_price: Money) -> CreDealResult<Rate> {
    if purchase_price <= Decimal::ZERO {
        return Err(CreDealError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    quotient(noi, purchase_price, "cap_rate")
}

/// Cash-on-cash return: annual cash flow after debt service / equity invested.
pub fn cash_on_cash(annual_cash_flow: Money, equity_invested: Money) -> CreDealResult<Rate> {
    if equity_invested <= Decimal::ZERO {
        return Err(CreDealError::invalid(
            "equity_invested",
            "Equity invested must be positive",
        ));
    }
    quotient(annual_cash_flow, equity_invested, "cash_on_cash")
}

/// Loan-to-value: loan amount / purchase price.
pub fn loan_to_value(loan_amount: Money, purchase_price: Money) -> CreDealResult<Rate> {
    if purchase_price <= Decimal::ZERO {
        return Err(CreDealError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    quotient(loan_amount, purchase_price, "ltv")
}

/// Debt yield: NOI / loan amount.
pub fn debt_yield(noi: Money, loan_amount: Money) -> CreDealResult<Rate> {
    if loan_amount.is_zero() {
        return Err(CreDealError::DivisionByZero {
            context: "debt yield (loan amount is zero)".into(),
        });
    }
    if loan_amount < Decimal::ZERO {
        return Err(CreDealError::invalid("loan_amount", "Loan amount cannot be negative"));
    }
    quotient(noi, loan_amount, "debt_yield")
}

/// `numerator / denominator` for a non-zero denominator, failing instead of
/// overflowing when the quotient is too large for a Decimal.
pub(crate) fn quotient(numerator: Decimal, denominator: Decimal, field: &str) -> CreDealResult<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| CreDealError::invalid(field, "Result is too large to represent"))
}
