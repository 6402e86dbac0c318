//! Closed-form deal financing metrics: mortgage constant, coverage and
//! yield ratios, and the multi-year pro forma.

pub mod mortgage;
pub mod proforma;
pub mod ratios;

pub use mortgage::{loan_balance_after, mortgage_constant, mortgage_constant_for_year};
pub use proforma::{five_year_proforma, Proforma, ProformaYear, MAX_PROFORMA_YEARS, PROFORMA_YEARS};
pub use ratios::{cap_rate, cash_on_cash, debt_yield, dscr, loan_to_value};
