pub mod risk;
pub mod sensitivity;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::benchmarks::{assess_all, BenchmarkTable, Metric, MetricAssessment, Rating};
use crate::deal::DealRecord;
use crate::error::CreDealError;
use crate::financing::proforma::PROFORMA_YEARS;
use crate::financing::ratios::quotient;
use crate::financing::{
    cap_rate, cash_on_cash, debt_yield, dscr, five_year_proforma, loan_balance_after,
    loan_to_value, mortgage_constant, mortgage_constant_for_year, Proforma, ProformaYear,
};
use crate::time_value::irr;
use crate::types::{with_metadata, AssetClass, ComputationOutput, MarketTier, Money, Multiple, Rate};
use crate::CreDealResult;

pub use risk::{rank_risks, RiskItem, RiskSeverity};
pub use sensitivity::{
    compute_sensitivities, ExitCapShift, LtvShift, NoiShift, RateShift, SensitivityAnalysis,
};

/// Broker and closing costs deducted from the exit value.
pub const SALE_COST_RATE: Rate = dec!(0.02);

/// Coverage below this draws a warning regardless of benchmarks.
pub const DSCR_WARNING_FLOOR: Multiple = dec!(1.20);

/// Leverage above this draws a warning regardless of benchmarks.
pub const LTV_WARNING_CEILING: Rate = dec!(0.80);

const IRR_GUESS: Rate = dec!(0.10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Returns from buying, holding for the projection horizon, and selling at
/// the exit cap rate.
#[derive(Debug, Clone, Serialize)]
pub struct HoldPeriodReturns {
    pub hold_years: u32,
    pub exit_cap_rate: Rate,
    /// NOI for the year after the hold, capitalised into the exit value
    pub exit_noi: Money,
    pub exit_value: Money,
    pub sale_costs: Money,
    /// Scheduled debt service for each hold year, stepping up once the
    /// interest-only period ends
    pub debt_service_by_year: Vec<Money>,
    /// NOI less scheduled debt service, per hold year
    pub operating_cash_flows: Vec<Money>,
    pub loan_balance_at_exit: Money,
    pub net_sale_proceeds: Money,
    /// Operating cash flows plus net sale proceeds
    pub total_distributions: Money,
    pub equity_multiple: Option<Multiple>,
    pub levered_irr: Option<Rate>,
}

/// Full metric set for one deal, with benchmark assessments.
///
/// Metrics that cannot be computed for this deal (for example DSCR on an
/// all-cash purchase) are `None` and appear as unrated assessments.
#[derive(Debug, Clone, Serialize)]
pub struct DealAnalysis {
    pub asset_class: AssetClass,
    pub market_tier: MarketTier,
    pub submarket: String,
    pub mortgage_constant: Rate,
    pub annual_debt_service: Money,
    pub dscr: Option<Multiple>,
    pub cap_rate: Rate,
    pub ltv: Rate,
    pub debt_yield: Option<Rate>,
    pub equity: Money,
    pub year_one_cash_flow: Money,
    pub cash_on_cash: Option<Rate>,
    pub proforma: Vec<ProformaYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_period: Option<HoldPeriodReturns>,
    pub assessments: Vec<MetricAssessment>,
    pub sensitivities: SensitivityAnalysis,
    /// Offside metrics, most severe first
    pub risks: Vec<RiskItem>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute every deal metric and rate it against `table`.
///
/// Recoverable failures (no benchmark, zero loan, zero equity, IRR that will
/// not converge, an exit value too large to represent) never abort the
/// analysis; they surface as `None` values, unrated assessments and warnings.
pub fn analyze_deal(
    deal: &DealRecord,
    table: &BenchmarkTable,
) -> CreDealResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let noi = deal.noi();
    let price = deal.purchase_price();
    let loan = deal.loan_amount();

    // --- Debt ---
    let constant = mortgage_constant(deal.interest_rate(), deal.amortization_years(), deal.io_months())?;
    let annual_debt_service = loan * constant;

    // --- Ratios ---
    let dscr_result = dscr(noi, loan, constant);
    let cap = cap_rate(noi, price)?;
    let ltv = loan_to_value(loan, price)?;
    let debt_yield_result = debt_yield(noi, loan);

    let equity = deal.equity();
    let year_one_cash_flow = noi - annual_debt_service;
    let coc_result = cash_on_cash(year_one_cash_flow, equity);

    let dscr_value = dscr_result.as_ref().ok().copied();
    let debt_yield_value = debt_yield_result.as_ref().ok().copied();
    let coc_value = coc_result.as_ref().ok().copied();

    if let Some(d) = dscr_value {
        if d < DSCR_WARNING_FLOOR {
            warnings.push(format!(
                "DSCR of {:.2}x is below the {DSCR_WARNING_FLOOR}x most lenders require",
                d
            ));
        }
    }
    if ltv > LTV_WARNING_CEILING {
        warnings.push(format!(
            "LTV of {:.1}% exceeds {}%",
            ltv * dec!(100),
            (LTV_WARNING_CEILING * dec!(100)).normalize()
        ));
    }
    if year_one_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Year-1 cash flow is negative ({year_one_cash_flow:.2}): NOI does not cover debt service"
        ));
    }
    if coc_value.is_none() {
        warnings.push("Cash-on-cash not computed: no equity invested".into());
    }
    let horizon_months = PROFORMA_YEARS * 12;
    if deal.io_months() > 0 && deal.io_months() < horizon_months && !loan.is_zero() {
        warnings.push(format!(
            "Interest-only period ends after {} months; the pro forma holds year-1 debt service flat, hold-period returns follow the amortization schedule",
            deal.io_months()
        ));
    }

    // --- Projection ---
    let mut proforma = five_year_proforma(noi, deal.noi_growth_rate(), annual_debt_service)?;
    if let Some(ratio) = deal.expense_ratio() {
        proforma = proforma.with_expense_ratio(ratio)?;
    }

    let hold_period = match deal.exit_cap_rate() {
        Some(exit_cap) => match hold_period_returns(deal, &proforma, exit_cap, &mut warnings) {
            Ok(hold) => Some(hold),
            Err(e) => {
                warnings.push(format!("Hold-period returns not computed: {e}"));
                None
            }
        },
        None => None,
    };
    let sensitivities = compute_sensitivities(deal, constant, hold_period.as_ref(), DSCR_WARNING_FLOOR)?;

    // --- Benchmarks ---
    let mut metrics: Vec<(Metric, CreDealResult<Decimal>)> = vec![
        (Metric::CapRate, Ok(cap)),
        (Metric::Dscr, dscr_result),
        (Metric::Ltv, Ok(ltv)),
        (Metric::DebtYield, debt_yield_result),
        (Metric::CashOnCash, coc_result),
    ];
    if let Some(hold) = &hold_period {
        if let Some(em) = hold.equity_multiple {
            metrics.push((Metric::EquityMultiple, Ok(em)));
        }
        if let Some(r) = hold.levered_irr {
            metrics.push((Metric::Irr, Ok(r)));
        }
    }
    let assessments = assess_all(table, metrics, deal.asset_class(), deal.market_tier());
    for a in &assessments {
        if let Rating::Unrated { reason } = &a.rating {
            warnings.push(format!("{} not rated: {reason}", a.metric));
        }
    }
    let risks = rank_risks(&assessments);

    debug!(
        asset_class = %deal.asset_class(),
        tier = %deal.market_tier(),
        rated = assessments.iter().filter(|a| a.is_rated()).count(),
        risks = risks.len(),
        "deal analysed"
    );

    let output = DealAnalysis {
        asset_class: deal.asset_class(),
        market_tier: deal.market_tier(),
        submarket: deal.submarket().to_string(),
        mortgage_constant: constant,
        annual_debt_service,
        dscr: dscr_value,
        cap_rate: cap,
        ltv,
        debt_yield: debt_yield_value,
        equity,
        year_one_cash_flow,
        cash_on_cash: coc_value,
        proforma: proforma.iter().collect(),
        hold_period,
        assessments,
        sensitivities,
        risks,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Commercial Real Estate Deal Analysis (Benchmark Evaluation)",
        deal,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Hold period
// ---------------------------------------------------------------------------

fn hold_period_returns(
    deal: &DealRecord,
    proforma: &Proforma,
    exit_cap_rate: Rate,
    warnings: &mut Vec<String>,
) -> CreDealResult<HoldPeriodReturns> {
    let hold_years = proforma.years();
    let exit_noi = proforma.forward_noi();
    let exit_value = quotient(exit_noi, exit_cap_rate, "exit_cap_rate")?;
    let sale_costs = exit_value * SALE_COST_RATE;
    let loan = deal.loan_amount();
    let loan_balance_at_exit = loan_balance_after(
        loan,
        deal.interest_rate(),
        deal.amortization_years(),
        deal.io_months(),
        hold_years * 12,
    )?;
    let net_sale_proceeds = exit_value - sale_costs - loan_balance_at_exit;

    // Same schedule the exit balance is computed on
    let debt_service_by_year = (1..=hold_years)
        .map(|year| {
            mortgage_constant_for_year(
                deal.interest_rate(),
                deal.amortization_years(),
                deal.io_months(),
                year,
            )
            .map(|constant| loan * constant)
        })
        .collect::<CreDealResult<Vec<Money>>>()?;
    let operating_cash_flows: Vec<Money> = proforma
        .iter()
        .zip(&debt_service_by_year)
        .map(|(year, debt_service)| year.noi - *debt_service)
        .collect();

    let too_large = || CreDealError::invalid("exit_cap_rate", "Sale proceeds are too large to represent");
    let total_distributions = operating_cash_flows
        .iter()
        .try_fold(net_sale_proceeds, |acc, cf| acc.checked_add(*cf))
        .ok_or_else(too_large)?;

    let equity = deal.equity();
    let (equity_multiple, levered_irr) = if equity > Decimal::ZERO {
        let mut flows: Vec<Money> = Vec::with_capacity(hold_years as usize + 1);
        flows.push(-equity);
        flows.extend(operating_cash_flows.iter().copied());
        if let Some(last) = flows.last_mut() {
            *last = last.checked_add(net_sale_proceeds).ok_or_else(too_large)?;
        }
        let levered_irr = match irr(&flows, IRR_GUESS) {
            Ok(r) => Some(r),
            Err(e) => {
                warnings.push(format!("Levered IRR not computed: {e}"));
                None
            }
        };
        let equity_multiple = match quotient(total_distributions, equity, "equity_multiple") {
            Ok(m) => Some(m),
            Err(e) => {
                warnings.push(format!("Equity multiple not computed: {e}"));
                None
            }
        };
        (equity_multiple, levered_irr)
    } else {
        warnings.push("Equity multiple and IRR not computed: no equity invested".into());
        (None, None)
    };

    if net_sale_proceeds < Decimal::ZERO {
        warnings.push(format!(
            "Exit value at a {:.2}% cap rate does not repay the loan balance",
            exit_cap_rate * dec!(100)
        ));
    }

    Ok(HoldPeriodReturns {
        hold_years,
        exit_cap_rate,
        exit_noi,
        exit_value,
        sale_costs,
        debt_service_by_year,
        operating_cash_flows,
        loan_balance_at_exit,
        net_sale_proceeds,
        total_distributions,
        equity_multiple,
        levered_irr,
    })
}
