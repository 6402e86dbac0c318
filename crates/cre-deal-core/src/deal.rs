use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CreDealError;
use crate::types::{
    AssetClass, MarketTier, Money, Rate, MAX_AMORTIZATION_YEARS, MAX_DEAL_AMOUNT, MAX_IO_MONTHS,
};
use crate::CreDealResult;

/// NOI growth assumed when a deal does not state one.
pub const DEFAULT_NOI_GROWTH: Rate = dec!(0.03);

/// Raw deal parameters as entered or extracted. Unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealInput {
    pub purchase_price: Money,
    pub loan_amount: Money,
    /// Annual nominal rate as a decimal (0.065, not 6.5)
    pub interest_rate: Rate,
    pub amortization_years: u32,
    #[serde(default)]
    pub io_months: u32,
    pub noi: Money,
    pub asset_class: AssetClass,
    pub market_tier: MarketTier,
    #[serde(default)]
    pub submarket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noi_growth_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_cap_rate: Option<Rate>,
}

/// A validated deal. The only way to obtain one is [`DealRecord::new`]
/// (serde goes through it as well), so every accessor can be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DealInput", into = "DealInput")]
pub struct DealRecord {
    input: DealInput,
}

impl DealRecord {
    pub fn new(input: DealInput) -> CreDealResult<Self> {
        validate(&input)?;
        Ok(DealRecord { input })
    }

    pub fn purchase_price(&self) -> Money {
        self.input.purchase_price
    }

    pub fn loan_amount(&self) -> Money {
        self.input.loan_amount
    }

    pub fn interest_rate(&self) -> Rate {
        self.input.interest_rate
    }

    pub fn amortization_years(&self) -> u32 {
        self.input.amortization_years
    }

    pub fn io_months(&self) -> u32 {
        self.input.io_months
    }

    pub fn noi(&self) -> Money {
        self.input.noi
    }

    pub fn asset_class(&self) -> AssetClass {
        self.input.asset_class
    }

    pub fn market_tier(&self) -> MarketTier {
        self.input.market_tier
    }

    pub fn submarket(&self) -> &str {
        &self.input.submarket
    }

    /// Stated growth, or [`DEFAULT_NOI_GROWTH`].
    pub fn noi_growth_rate(&self) -> Rate {
        self.input.noi_growth_rate.unwrap_or(DEFAULT_NOI_GROWTH)
    }

    pub fn expense_ratio(&self) -> Option<Rate> {
        self.input.expense_ratio
    }

    pub fn exit_cap_rate(&self) -> Option<Rate> {
        self.input.exit_cap_rate
    }

    /// Purchase price less loan.
    pub fn equity(&self) -> Money {
        self.input.purchase_price - self.input.loan_amount
    }

    pub fn as_input(&self) -> &DealInput {
        &self.input
    }
}

impl TryFrom<DealInput> for DealRecord {
    type Error = CreDealError;

    fn try_from(input: DealInput) -> CreDealResult<Self> {
        DealRecord::new(input)
    }
}

impl From<DealRecord> for DealInput {
    fn from(record: DealRecord) -> Self {
        record.input
    }
}

fn validate(input: &DealInput) -> CreDealResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(CreDealError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    if input.purchase_price > MAX_DEAL_AMOUNT {
        return Err(CreDealError::invalid(
            "purchase_price",
            format!("Purchase price cannot exceed {MAX_DEAL_AMOUNT}"),
        ));
    }
    if input.noi.abs() > MAX_DEAL_AMOUNT {
        return Err(CreDealError::invalid(
            "noi",
            format!("NOI cannot exceed {MAX_DEAL_AMOUNT} in magnitude"),
        ));
    }
    if input.loan_amount < Decimal::ZERO {
        return Err(CreDealError::invalid(
            "loan_amount",
            "Loan amount cannot be negative",
        ));
    }
    if input.loan_amount > input.purchase_price {
        return Err(CreDealError::invalid(
            "loan_amount",
            "Loan amount cannot exceed purchase price",
        ));
    }
    if input.interest_rate <= Decimal::ZERO {
        return Err(CreDealError::invalid(
            "interest_rate",
            "Interest rate must be positive",
        ));
    }
    if input.interest_rate >= Decimal::ONE {
        return Err(CreDealError::invalid(
            "interest_rate",
            "Interest rate must be a decimal (0.065 for 6.5%)",
        ));
    }
    if input.amortization_years == 0 || input.amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(CreDealError::invalid(
            "amortization_years",
            format!("Amortization must be between 1 and {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    if input.io_months > MAX_IO_MONTHS {
        return Err(CreDealError::invalid(
            "io_months",
            format!("Interest-only period cannot exceed {MAX_IO_MONTHS} months"),
        ));
    }
    if let Some(g) = input.noi_growth_rate {
        if g <= -Decimal::ONE || g > Decimal::ONE {
            return Err(CreDealError::invalid(
                "noi_growth_rate",
                "Growth rate must be greater than -100% and at most 100%",
            ));
        }
    }
    if let Some(r) = input.expense_ratio {
        if r < Decimal::ZERO || r >= Decimal::ONE {
            return Err(CreDealError::invalid(
                "expense_ratio",
                "Expense ratio must be between 0 and 1 (exclusive upper)",
            ));
        }
    }
    if let Some(c) = input.exit_cap_rate {
        if c <= Decimal::ZERO || c >= Decimal::ONE {
            return Err(CreDealError::invalid(
                "exit_cap_rate",
                "Exit cap rate must be a positive decimal below 1",
            ));
        }
    }
    Ok(())
}
