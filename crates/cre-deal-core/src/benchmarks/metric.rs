use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CreDealError;
use crate::types::normalize_key;

/// A deal metric that can be benchmarked.
///
/// Rates are decimals (0.065 = 6.5%); coverage and multiples are plain ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CapRate,
    Dscr,
    Ltv,
    DebtYield,
    CashOnCash,
    MortgageConstant,
    EquityMultiple,
    Irr,
}

/// Display metadata for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricInfo {
    pub unit: &'static str,
    pub description: &'static str,
    pub why_it_matters: &'static str,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::CapRate,
        Metric::Dscr,
        Metric::Ltv,
        Metric::DebtYield,
        Metric::CashOnCash,
        Metric::MortgageConstant,
        Metric::EquityMultiple,
        Metric::Irr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CapRate => "cap_rate",
            Metric::Dscr => "dscr",
            Metric::Ltv => "ltv",
            Metric::DebtYield => "debt_yield",
            Metric::CashOnCash => "cash_on_cash",
            Metric::MortgageConstant => "mortgage_constant",
            Metric::EquityMultiple => "equity_multiple",
            Metric::Irr => "irr",
        }
    }

    /// True when the metric is stored as a decimal rate and shown as a percentage.
    pub fn is_percentage(&self) -> bool {
        !matches!(self, Metric::Dscr | Metric::EquityMultiple)
    }

    pub fn info(&self) -> MetricInfo {
        match self {
            Metric::CapRate => MetricInfo {
                unit: "%",
                description: "Net Operating Income divided by Purchase Price",
                why_it_matters: "Primary valuation metric showing annual return before debt. \
                                 Higher cap rates indicate higher risk/return profiles.",
            },
            Metric::Dscr => MetricInfo {
                unit: "x",
                description: "Net Operating Income divided by Annual Debt Service",
                why_it_matters: "Measures ability to cover debt payments. Lenders typically \
                                 require 1.25x minimum for loan approval.",
            },
            Metric::Ltv => MetricInfo {
                unit: "%",
                description: "Loan Amount divided by Property Value",
                why_it_matters: "Leverage ratio showing loan exposure. Lower LTV means more \
                                 equity cushion and lower default risk.",
            },
            Metric::DebtYield => MetricInfo {
                unit: "%",
                description: "Net Operating Income divided by Loan Amount",
                why_it_matters: "Rate-independent measure of the lender's return if it took \
                                 the property back on day one.",
            },
            Metric::CashOnCash => MetricInfo {
                unit: "%",
                description: "Annual cash flow after debt service divided by initial equity",
                why_it_matters: "Current yield on invested equity. Shows immediate cash \
                                 returns before sale.",
            },
            Metric::MortgageConstant => MetricInfo {
                unit: "%",
                description: "Annual debt service as a fraction of loan principal",
                why_it_matters: "Compares the cost of debt to the cap rate; a constant above \
                                 the cap rate means negative leverage.",
            },
            Metric::EquityMultiple => MetricInfo {
                unit: "x",
                description: "Total distributions divided by initial equity investment",
                why_it_matters: "Shows total return multiple over the hold period. 2.0x \
                                 means doubling your money.",
            },
            Metric::Irr => MetricInfo {
                unit: "%",
                description: "Internal Rate of Return accounting for timing of cash flows",
                why_it_matters: "Time-weighted return metric. Accounts for when you receive \
                                 distributions, not just how much.",
            },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CreDealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let metric = match normalize_key(s).as_str() {
            "cap_rate" | "cap" | "capitalization_rate" | "going_in_cap" => Metric::CapRate,
            "dscr" | "debt_service_coverage" | "dcr" => Metric::Dscr,
            "ltv" | "loan_to_value" => Metric::Ltv,
            "debt_yield" => Metric::DebtYield,
            "cash_on_cash" | "coc" => Metric::CashOnCash,
            "mortgage_constant" | "loan_constant" => Metric::MortgageConstant,
            "equity_multiple" | "moic" => Metric::EquityMultiple,
            "irr" | "levered_irr" => Metric::Irr,
            _ => {
                return Err(CreDealError::invalid(
                    "metric",
                    format!("unrecognised metric '{s}'"),
                ))
            }
        };
        Ok(metric)
    }
}
