use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::error::CreDealError;
use crate::types::{Money, Rate};
use crate::CreDealResult;

/// Standard projection horizon.
pub const PROFORMA_YEARS: u32 = 5;

/// Longest horizon a projection may run.
pub const MAX_PROFORMA_YEARS: u32 = 50;

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProformaYear {
    /// 1-based projection year
    pub year: u32,
    /// Income before operating expenses (equals NOI when no expense ratio is set)
    pub gross_income: Money,
    /// Net operating income
    pub noi: Money,
    /// NOI less debt service
    pub cash_flow: Money,
}

/// A lazily evaluated multi-year projection.
///
/// The value is `Copy`; every call to [`Proforma::iter`] starts again from
/// year 1, so the projection can be walked any number of times and always
/// yields the same rows. Construction walks the projection once with checked
/// arithmetic, so a `Proforma` that exists never overflows when iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proforma {
    noi: Money,
    growth_rate: Rate,
    debt_service: Money,
    expense_ratio: Rate,
    years: u32,
}

/// Five-year projection: year-1 NOI is `noi`, each later year grows by
/// `growth_rate`, and cash flow is NOI less a constant `debt_service`.
pub fn five_year_proforma(noi: Money, growth_rate: Rate, debt_service: Money) -> CreDealResult<Proforma> {
    Proforma::new(noi, growth_rate, debt_service, PROFORMA_YEARS)
}

impl Proforma {
    pub fn new(noi: Money, growth_rate: Rate, debt_service: Money, years: u32) -> CreDealResult<Self> {
        if years > MAX_PROFORMA_YEARS {
            return Err(CreDealError::invalid(
                "years",
                format!("Projection horizon cannot exceed {MAX_PROFORMA_YEARS} years"),
            ));
        }
        if growth_rate <= -Decimal::ONE {
            return Err(CreDealError::invalid(
                "growth_rate",
                "Growth rate must be greater than -100%",
            ));
        }
        let proforma = Proforma {
            noi,
            growth_rate,
            debt_service,
            expense_ratio: Decimal::ZERO,
            years,
        };
        proforma.check_representable()?;
        Ok(proforma)
    }

    /// Gross income is grossed up from NOI: `noi / (1 - expense_ratio)`.
    pub fn with_expense_ratio(mut self, expense_ratio: Rate) -> CreDealResult<Self> {
        if expense_ratio < Decimal::ZERO || expense_ratio >= Decimal::ONE {
            return Err(CreDealError::invalid(
                "expense_ratio",
                "Expense ratio must be between 0 and 1 (exclusive upper)",
            ));
        }
        self.expense_ratio = expense_ratio;
        self.check_representable()?;
        Ok(self)
    }

    /// Run every operation the iterator, `forward_noi` and `total_cash_flow`
    /// perform, in the same order, with checked arithmetic.
    fn check_representable(&self) -> CreDealResult<()> {
        let overflow = || {
            CreDealError::invalid(
                "growth_rate",
                "Projected values are too large to represent",
            )
        };
        let factor = Decimal::ONE.checked_add(self.growth_rate).ok_or_else(overflow)?;
        let retained = Decimal::ONE - self.expense_ratio;
        let mut noi = self.noi;
        let mut total = Decimal::ZERO;
        for _ in 0..self.years {
            noi.checked_div(retained).ok_or_else(overflow)?;
            let cash_flow = noi.checked_sub(self.debt_service).ok_or_else(overflow)?;
            total = total.checked_add(cash_flow).ok_or_else(overflow)?;
            noi = noi.checked_mul(factor).ok_or_else(overflow)?;
        }
        Ok(())
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn debt_service(&self) -> Money {
        self.debt_service
    }

    pub fn iter(&self) -> ProformaIter {
        ProformaIter {
            proforma: *self,
            next_year: 1,
            current_noi: self.noi,
        }
    }

    pub fn final_year(&self) -> Option<ProformaYear> {
        self.iter().last()
    }

    /// NOI one year past the horizon, the basis for a reversion value.
    pub fn forward_noi(&self) -> Money {
        let mut noi = self.noi;
        for _ in 0..self.years {
            noi *= Decimal::ONE + self.growth_rate;
        }
        noi
    }

    pub fn total_cash_flow(&self) -> Money {
        self.iter().map(|y| y.cash_flow).sum()
    }
}

impl IntoIterator for Proforma {
    type Item = ProformaYear;
    type IntoIter = ProformaIter;

    fn into_iter(self) -> ProformaIter {
        self.iter()
    }
}

impl IntoIterator for &Proforma {
    type Item = ProformaYear;
    type IntoIter = ProformaIter;

    fn into_iter(self) -> ProformaIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ProformaIter {
    proforma: Proforma,
    next_year: u32,
    current_noi: Money,
}

impl Iterator for ProformaIter {
    type Item = ProformaYear;

    fn next(&mut self) -> Option<ProformaYear> {
        if self.next_year > self.proforma.years {
            return None;
        }

        let noi = self.current_noi;
        let gross_income = noi / (Decimal::ONE - self.proforma.expense_ratio);
        let row = ProformaYear {
            year: self.next_year,
            gross_income,
            noi,
            cash_flow: noi - self.proforma.debt_service,
        };

        self.next_year += 1;
        self.current_noi *= Decimal::ONE + self.proforma.growth_rate;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.proforma.years + 1).saturating_sub(self.next_year) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProformaIter {}

impl FusedIterator for ProformaIter {}
