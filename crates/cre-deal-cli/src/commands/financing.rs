use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::Value;

use cre_deal_core::financing::{
    cap_rate, cash_on_cash, dscr, mortgage_constant, mortgage_constant_for_year, Proforma,
    ProformaYear, MAX_PROFORMA_YEARS,
};

/// Arguments for the mortgage constant
#[derive(Args)]
pub struct MortgageConstantArgs {
    /// Annual interest rate as a decimal (0.065 = 6.5%)
    #[arg(long)]
    pub rate: Decimal,

    /// Amortization term in years
    #[arg(long, default_value = "30")]
    pub amortization_years: u32,

    /// Interest-only months before amortization starts
    #[arg(long, default_value = "0")]
    pub io_months: u32,

    /// Loan year to report (1 = first year)
    #[arg(long, default_value = "1")]
    pub year: u32,
}

/// Arguments for DSCR
#[derive(Args)]
pub struct DscrArgs {
    /// Net operating income
    #[arg(long, allow_hyphen_values = true)]
    pub noi: Decimal,

    /// Loan amount
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Mortgage constant; computed from --rate when omitted
    #[arg(long)]
    pub mortgage_constant: Option<Decimal>,

    /// Annual interest rate as a decimal
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Amortization term in years
    #[arg(long, default_value = "30")]
    pub amortization_years: u32,

    /// Interest-only months
    #[arg(long, default_value = "0")]
    pub io_months: u32,
}

/// Arguments for cap rate
#[derive(Args)]
pub struct CapRateArgs {
    /// Net operating income
    #[arg(long, allow_hyphen_values = true)]
    pub noi: Decimal,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Decimal,
}

/// Arguments for cash-on-cash return
#[derive(Args)]
pub struct CashOnCashArgs {
    /// Annual cash flow after debt service
    #[arg(long, allow_hyphen_values = true)]
    pub cash_flow: Decimal,

    /// Equity invested
    #[arg(long)]
    pub equity: Decimal,
}

/// Arguments for the pro forma projection
#[derive(Args)]
pub struct ProformaArgs {
    /// Year-1 net operating income
    #[arg(long)]
    pub noi: Decimal,

    /// Annual NOI growth as a decimal
    #[arg(long, default_value = "0.03", allow_hyphen_values = true)]
    pub growth_rate: Decimal,

    /// Annual debt service, held constant
    #[arg(long, default_value = "0")]
    pub debt_service: Decimal,

    /// Operating expense ratio used to gross up income
    #[arg(long)]
    pub expense_ratio: Option<Decimal>,

    /// Projection horizon in years
    #[arg(
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=MAX_PROFORMA_YEARS as i64)
    )]
    pub years: u32,
}

#[derive(Debug, Serialize)]
struct MortgageConstantOutput {
    mortgage_constant: Decimal,
    rate: Decimal,
    amortization_years: u32,
    io_months: u32,
    year: u32,
}

#[derive(Debug, Serialize)]
struct DscrOutput {
    dscr: Decimal,
    mortgage_constant: Decimal,
    annual_debt_service: Decimal,
}

#[derive(Debug, Serialize)]
struct ProformaOutput {
    proforma: Vec<ProformaYear>,
    total_cash_flow: Decimal,
    forward_noi: Decimal,
}

pub fn run_mortgage_constant(args: MortgageConstantArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc = if args.year == 1 {
        mortgage_constant(args.rate, args.amortization_years, args.io_months)?
    } else {
        mortgage_constant_for_year(args.rate, args.amortization_years, args.io_months, args.year)?
    };
    Ok(serde_json::to_value(MortgageConstantOutput {
        mortgage_constant: mc,
        rate: args.rate,
        amortization_years: args.amortization_years,
        io_months: args.io_months,
        year: args.year,
    })?)
}

pub fn run_dscr(args: DscrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mc = match (args.mortgage_constant, args.rate) {
        (Some(mc), _) => mc,
        (None, Some(rate)) => mortgage_constant(rate, args.amortization_years, args.io_months)?,
        (None, None) => return Err("--mortgage-constant or --rate required for DSCR".into()),
    };
    let value = dscr(args.noi, args.loan_amount, mc)?;
    Ok(serde_json::to_value(DscrOutput {
        dscr: value,
        mortgage_constant: mc,
        annual_debt_service: args.loan_amount * mc,
    })?)
}

pub fn run_cap_rate(args: CapRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = cap_rate(args.noi, args.purchase_price)?;
    Ok(serde_json::json!({
        "cap_rate": value,
        "cap_rate_pct": (value * dec!(100)).round_dp(4),
    }))
}

pub fn run_cash_on_cash(args: CashOnCashArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = cash_on_cash(args.cash_flow, args.equity)?;
    Ok(serde_json::json!({ "cash_on_cash": value }))
}

pub fn run_proforma(args: ProformaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pf = Proforma::new(args.noi, args.growth_rate, args.debt_service, args.years)?;
    if let Some(ratio) = args.expense_ratio {
        pf = pf.with_expense_ratio(ratio)?;
    }
    Ok(serde_json::to_value(ProformaOutput {
        proforma: pf.iter().collect(),
        total_cash_flow: pf.total_cash_flow(),
        forward_noi: pf.forward_noi(),
    })?)
}
