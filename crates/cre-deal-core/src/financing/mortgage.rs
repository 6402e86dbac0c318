use rust_decimal::Decimal;

use crate::error::CreDealError;
use crate::types::{Money, Rate, MAX_AMORTIZATION_YEARS, MAX_IO_MONTHS};
use crate::CreDealResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Annual debt-service constant for the first loan year, as a fraction of
/// the original loan balance.
///
/// Months inside the interest-only period pay `rate / 12`; once IO expires
/// the loan pays the level annuity `r(1+r)^n / ((1+r)^n - 1)` with
/// `r = rate / 12` and `n = amortization_years * 12`. A first year that is
/// partly interest-only blends the two by month.
pub fn mortgage_constant(rate: Rate, amortization_years: u32, io_months: u32) -> CreDealResult<Rate> {
    mortgage_constant_for_year(rate, amortization_years, io_months, 1)
}

/// Annual debt-service constant for loan year `year` (1-based).
///
/// Amortization starts after the IO period and runs the full
/// `amortization_years`; months after the final payment contribute nothing.
pub fn mortgage_constant_for_year(
    rate: Rate,
    amortization_years: u32,
    io_months: u32,
    year: u32,
) -> CreDealResult<Rate> {
    validate_terms(rate, amortization_years, io_months)?;
    if year == 0 {
        return Err(CreDealError::invalid("year", "Loan years are numbered from 1"));
    }

    let year_start = (year - 1).saturating_mul(MONTHS_PER_YEAR);
    let year_end = year_start.saturating_add(MONTHS_PER_YEAR);
    let amortization_end = io_months + amortization_years * MONTHS_PER_YEAR;

    let io_in_year = overlap(year_start, year_end, 0, io_months);
    let amortizing_in_year = overlap(year_start, year_end, io_months, amortization_end);

    if amortizing_in_year == 0 {
        // Multiply before dividing so a full IO year returns the rate exactly
        return Ok(rate * Decimal::from(io_in_year) / Decimal::from(MONTHS_PER_YEAR));
    }

    let monthly_rate = rate / Decimal::from(MONTHS_PER_YEAR);
    let payment_factor = monthly_payment_factor(monthly_rate, amortization_years * MONTHS_PER_YEAR)?;

    Ok(rate * Decimal::from(io_in_year) / Decimal::from(MONTHS_PER_YEAR)
        + payment_factor * Decimal::from(amortizing_in_year))
}

/// Outstanding principal after `months_elapsed` monthly payments.
///
/// Interest-only months leave the balance untouched; afterwards the
/// standard remaining-balance identity applies:
/// `B_k = L * ((1+r)^n - (1+r)^k) / ((1+r)^n - 1)`.
pub fn loan_balance_after(
    loan_amount: Money,
    rate: Rate,
    amortization_years: u32,
    io_months: u32,
    months_elapsed: u32,
) -> CreDealResult<Money> {
    validate_terms(rate, amortization_years, io_months)?;
    if loan_amount < Decimal::ZERO {
        return Err(CreDealError::invalid("loan_amount", "Loan amount cannot be negative"));
    }

    if months_elapsed <= io_months || loan_amount.is_zero() {
        return Ok(loan_amount);
    }

    let total_payments = amortization_years * MONTHS_PER_YEAR;
    let payments_made = (months_elapsed - io_months).min(total_payments);
    if payments_made == total_payments {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = rate / Decimal::from(MONTHS_PER_YEAR);
    let growth_n = compound(monthly_rate, total_payments)?;
    let growth_k = compound(monthly_rate, payments_made)?;
    let denominator = growth_n - Decimal::ONE;

    if denominator.is_zero() {
        return Err(CreDealError::DivisionByZero {
            context: "remaining balance denominator".into(),
        });
    }

    // Remaining fraction is at most 1, so scaling the loan by it cannot overflow
    let remaining = (growth_n - growth_k) / denominator;
    Ok((loan_amount * remaining).max(Decimal::ZERO))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_terms(rate: Rate, amortization_years: u32, io_months: u32) -> CreDealResult<()> {
    if rate <= Decimal::ZERO {
        return Err(CreDealError::invalid("interest_rate", "Interest rate must be positive"));
    }
    if rate >= Decimal::ONE {
        return Err(CreDealError::invalid(
            "interest_rate",
            "Interest rate must be a decimal (0.065 for 6.5%)",
        ));
    }
    if amortization_years == 0 {
        return Err(CreDealError::invalid(
            "amortization_years",
            "Amortization term must be at least 1 year",
        ));
    }
    if amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(CreDealError::invalid(
            "amortization_years",
            format!("Amortization term cannot exceed {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    if io_months > MAX_IO_MONTHS {
        return Err(CreDealError::invalid(
            "io_months",
            format!("Interest-only period cannot exceed {MAX_IO_MONTHS} months"),
        ));
    }
    Ok(())
}

/// Monthly payment per unit of principal: r(1+r)^n / ((1+r)^n - 1)
fn monthly_payment_factor(monthly_rate: Rate, total_months: u32) -> CreDealResult<Decimal> {
    let growth = compound(monthly_rate, total_months)?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CreDealError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }
    Ok(monthly_rate * growth / denominator)
}

/// (1 + r)^n via iterative multiplication
fn compound(rate: Rate, periods: u32) -> CreDealResult<Decimal> {
    let one_plus_r = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..periods {
        result = result.checked_mul(one_plus_r).ok_or_else(|| {
            CreDealError::invalid("interest_rate", "Compounded rate is too large to represent")
        })?;
    }
    Ok(result)
}

/// Number of months shared by the half-open ranges [a0, a1) and [b0, b1).
fn overlap(a0: u32, a1: u32, b0: u32, b1: u32) -> u32 {
    let start = a0.max(b0);
    let end = a1.min(b1);
    end.saturating_sub(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    #[test]
    fn test_constant_30yr_6pct() {
        // Monthly payment on $1 at 6%/30yr is 0.0059955; x12 = 0.071946
        let mc = mortgage_constant(dec!(0.06), 30, 0).unwrap();
        assert_close(mc, dec!(0.071946), dec!(0.000001));
    }

    #[test]
    fn test_constant_exceeds_rate_when_amortizing() {
        let mc = mortgage_constant(dec!(0.065), 25, 0).unwrap();
        assert!(mc > dec!(0.065));
    }

    #[test]
    fn test_full_io_first_year_equals_rate() {
        assert_eq!(mortgage_constant(dec!(0.065), 30, 12).unwrap(), dec!(0.065));
        assert_eq!(mortgage_constant(dec!(0.0725), 10, 120).unwrap(), dec!(0.0725));
    }

    #[test]
    fn test_partial_io_blends_by_month() {
        let io = dec!(0.06);
        let amortizing = mortgage_constant(dec!(0.06), 30, 0).unwrap();
        let blended = mortgage_constant(dec!(0.06), 30, 6).unwrap();
        let expected = (io + amortizing) / dec!(2);
        assert_close(blended, expected, dec!(0.0000001));
    }

    #[test]
    fn test_constant_for_later_year_after_io() {
        // Two years IO, year 3 is fully amortizing
        let y1 = mortgage_constant_for_year(dec!(0.06), 30, 24, 1).unwrap();
        let y3 = mortgage_constant_for_year(dec!(0.06), 30, 24, 3).unwrap();
        assert_eq!(y1, dec!(0.06));
        assert_eq!(y3, mortgage_constant(dec!(0.06), 30, 0).unwrap());
    }

    #[test]
    fn test_constant_after_maturity_is_zero() {
        let mc = mortgage_constant_for_year(dec!(0.06), 5, 0, 6).unwrap();
        assert_eq!(mc, Decimal::ZERO);
    }

    #[test]
    fn test_year_zero_rejected() {
        assert!(mortgage_constant_for_year(dec!(0.06), 30, 0, 0).is_err());
    }

    #[test]
    fn test_invalid_rate_and_term() {
        let err = mortgage_constant(Decimal::ZERO, 30, 0).unwrap_err();
        assert!(matches!(err, CreDealError::InvalidInput { ref field, .. } if field == "interest_rate"));
        let err = mortgage_constant(dec!(-0.01), 30, 0).unwrap_err();
        assert!(matches!(err, CreDealError::InvalidInput { .. }));
        let err = mortgage_constant(dec!(0.05), 0, 0).unwrap_err();
        assert!(matches!(err, CreDealError::InvalidInput { ref field, .. } if field == "amortization_years"));
        assert!(mortgage_constant(dec!(0.05), MAX_AMORTIZATION_YEARS + 1, 0).is_err());
    }

    #[test]
    fn test_whole_percent_rate_rejected_not_overflowed() {
        let err = mortgage_constant(dec!(3), 50, 0).unwrap_err();
        assert!(matches!(err, CreDealError::InvalidInput { ref field, .. } if field == "interest_rate"));
        assert!(loan_balance_after(dec!(1_000_000), dec!(6.5), 30, 0, 60).is_err());
    }

    #[test]
    fn test_highest_rate_longest_term_is_representable() {
        let mc = mortgage_constant(dec!(0.9999), MAX_AMORTIZATION_YEARS, 0).unwrap();
        assert!(mc >= dec!(0.9999));
        let b = loan_balance_after(Decimal::MAX, dec!(0.9999), MAX_AMORTIZATION_YEARS, 0, 12).unwrap();
        assert!(b <= Decimal::MAX);
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        assert!(compound(dec!(1000), 600).is_err());
        assert_eq!(compound(dec!(0.5), 2).unwrap(), dec!(2.25));
    }

    #[test]
    fn test_balance_unchanged_during_io() {
        let b = loan_balance_after(dec!(1_000_000), dec!(0.06), 30, 24, 24).unwrap();
        assert_eq!(b, dec!(1_000_000));
    }

    #[test]
    fn test_balance_after_five_years() {
        // $1M at 6%/30yr: balance after 60 payments ~ $930,544
        let b = loan_balance_after(dec!(1_000_000), dec!(0.06), 30, 0, 60).unwrap();
        assert_close(b, dec!(930_543.57), dec!(0.01));
    }

    #[test]
    fn test_balance_zero_after_full_term() {
        let b = loan_balance_after(dec!(500_000), dec!(0.05), 10, 12, 12 + 120).unwrap();
        assert_eq!(b, Decimal::ZERO);
        let b = loan_balance_after(dec!(500_000), dec!(0.05), 10, 0, 500).unwrap();
        assert_eq!(b, Decimal::ZERO);
    }

    #[test]
    fn test_balance_negative_loan_rejected() {
        assert!(loan_balance_after(dec!(-1), dec!(0.05), 10, 0, 1).is_err());
    }
}
