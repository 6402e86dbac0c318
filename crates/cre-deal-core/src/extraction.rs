//! Turning OCR output into a deal.
//!
//! Recognition happens elsewhere. This module receives a mapping of field
//! label to value plus a confidence score, works out which deal field each
//! label means, drops low-confidence readings, puts rates into decimal form,
//! cross-checks the figures that should agree, and assembles a
//! [`DealRecord`] once the required fields are present.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::deal::{DealInput, DealRecord};
use crate::error::CreDealError;
use crate::types::{normalize_key, AssetClass, MarketTier, Money, Rate};
use crate::CreDealResult;

/// Readings below this confidence are set aside unless the caller says otherwise.
pub const DEFAULT_MIN_CONFIDENCE: Decimal = dec!(0.6);

/// Stated cap rate may differ from NOI / price by this relative amount.
pub const CAP_RATE_TOLERANCE: Decimal = dec!(0.05);

/// Stated LTV may differ from loan / price by this relative amount.
pub const LTV_TOLERANCE: Decimal = dec!(0.02);

/// Aliases shorter than this never match by containment ("io", "noi", "pp").
const MIN_FUZZY_LEN: usize = 4;

/// Figures a draft does not take. They compete with aliases in the
/// containment match, so "Annual Debt Service" is not read as a loan amount.
const IGNORED_LABELS: [&str; 6] = [
    "debt_service",
    "debt_payment",
    "loan_payment",
    "mortgage_payment",
    "loan_constant",
    "mortgage_constant",
];

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A raw OCR value: already numeric, or text still to be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedValue {
    Number(Decimal),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub value: ExtractedValue,
    /// 0 = guess, 1 = certain
    pub confidence: Decimal,
}

/// Field label as printed on the document -> reading.
pub type ExtractedFields = BTreeMap<String, ExtractedField>;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Deal fields that can be read from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealField {
    PurchasePrice,
    Noi,
    CapRate,
    LoanAmount,
    InterestRate,
    AmortizationYears,
    IoMonths,
    IoYears,
    AssetClass,
    MarketTier,
    Submarket,
    Dscr,
    Ltv,
    ExitCapRate,
    ExpenseRatio,
}

impl DealField {
    pub const ALL: [DealField; 15] = [
        DealField::PurchasePrice,
        DealField::Noi,
        DealField::CapRate,
        DealField::LoanAmount,
        DealField::InterestRate,
        DealField::AmortizationYears,
        DealField::IoMonths,
        DealField::IoYears,
        DealField::AssetClass,
        DealField::MarketTier,
        DealField::Submarket,
        DealField::Dscr,
        DealField::Ltv,
        DealField::ExitCapRate,
        DealField::ExpenseRatio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealField::PurchasePrice => "purchase_price",
            DealField::Noi => "noi",
            DealField::CapRate => "cap_rate",
            DealField::LoanAmount => "loan_amount",
            DealField::InterestRate => "interest_rate",
            DealField::AmortizationYears => "amortization_years",
            DealField::IoMonths => "io_months",
            DealField::IoYears => "io_years",
            DealField::AssetClass => "asset_class",
            DealField::MarketTier => "market_tier",
            DealField::Submarket => "submarket",
            DealField::Dscr => "dscr",
            DealField::Ltv => "ltv",
            DealField::ExitCapRate => "exit_cap_rate",
            DealField::ExpenseRatio => "expense_ratio",
        }
    }

    /// Normalised labels that mean this field, canonical name first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            DealField::PurchasePrice => &[
                "purchase_price",
                "price",
                "pp",
                "acquisition_price",
                "contract_price",
                "sale_price",
                "sales_price",
                "asking_price",
                "acquisition_cost",
                "purchase_amount",
                "deal_size",
                "transaction_value",
            ],
            DealField::Noi => &[
                "noi",
                "net_operating_income",
                "annual_noi",
                "operating_income",
                "in_place_noi",
                "current_noi",
                "trailing_noi",
                "t12_noi",
                "ttm_noi",
            ],
            DealField::CapRate => &[
                "cap_rate",
                "cap",
                "capitalization_rate",
                "going_in_cap",
                "entry_cap",
                "acquisition_cap",
                "initial_yield",
            ],
            DealField::LoanAmount => &[
                "loan_amount",
                "loan",
                "debt",
                "mortgage",
                "mortgage_amount",
                "loan_proceeds",
                "loan_size",
                "debt_amount",
                "senior_debt",
            ],
            DealField::InterestRate => &[
                "interest_rate",
                "rate",
                "coupon",
                "all_in_rate",
                "loan_rate",
                "mortgage_rate",
                "note_rate",
            ],
            DealField::AmortizationYears => &[
                "amortization_years",
                "amortization",
                "amort",
                "amort_years",
                "amortization_period",
            ],
            DealField::IoMonths => &[
                "io_months",
                "io",
                "i/o",
                "io_period",
                "interest_only",
                "interest_only_period",
                "interest_only_months",
            ],
            DealField::IoYears => &["io_years", "interest_only_years", "io_term_years"],
            DealField::AssetClass => &[
                "asset_class",
                "property_type",
                "asset_type",
                "product_type",
            ],
            DealField::MarketTier => &["market_tier", "tier", "market_class"],
            DealField::Submarket => &["submarket", "sub_market", "market", "location"],
            DealField::Dscr => &[
                "dscr",
                "dcr",
                "debt_service_coverage",
                "debt_service_coverage_ratio",
                "coverage_ratio",
            ],
            DealField::Ltv => &["ltv", "loan_to_value", "ltv_ratio", "leverage"],
            DealField::ExitCapRate => &[
                "exit_cap_rate",
                "exit_cap",
                "terminal_cap",
                "reversion_cap",
                "residual_cap",
            ],
            DealField::ExpenseRatio => &[
                "expense_ratio",
                "opex_ratio",
                "operating_expense_ratio",
            ],
        }
    }

    /// Values that are rates and may arrive as whole percentages.
    fn is_rate(&self) -> bool {
        matches!(
            self,
            DealField::CapRate
                | DealField::InterestRate
                | DealField::Ltv
                | DealField::ExitCapRate
                | DealField::ExpenseRatio
        )
    }
}

impl fmt::Display for DealField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a printed label onto a deal field.
///
/// Tries an exact alias match first, then the longest alias contained in the
/// label, then a label contained in exactly one field's aliases. Labels for
/// debt service and loan payments map to nothing.
pub fn normalize_field_name(raw: &str) -> Option<DealField> {
    let key = normalize_key(raw).replace(['.', ':', '(', ')'], "");
    let key = key.trim_matches('_');
    if key.is_empty() {
        return None;
    }

    if let Some(field) = DealField::ALL
        .into_iter()
        .find(|f| f.aliases().contains(&key))
    {
        return Some(field);
    }

    let contained = DealField::ALL
        .into_iter()
        .flat_map(|f| f.aliases().iter().map(move |a| (Some(f), *a)))
        .chain(IGNORED_LABELS.into_iter().map(|a| (None, a)))
        .filter(|(_, a)| a.len() >= MIN_FUZZY_LEN && key.contains(a))
        .max_by_key(|(_, a)| a.len());
    if let Some((field, _)) = contained {
        return field;
    }

    if key.len() >= MIN_FUZZY_LEN {
        let mut candidates = DealField::ALL
            .into_iter()
            .filter(|f| f.aliases().iter().any(|a| a.contains(key)));
        if let (Some(field), None) = (candidates.next(), candidates.next()) {
            return Some(field);
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Value parsing
// ---------------------------------------------------------------------------

/// Parse a printed figure: `$12.5M`, `1,250,000`, `6.25%`, `850k`, `1.35x`.
///
/// A trailing `%` divides by 100. Returns `None` for anything else.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let mut clean: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' ' | '_'))
        .collect();

    let mut percent = false;
    if let Some(stripped) = clean.strip_suffix('%') {
        percent = true;
        clean = stripped.to_string();
    }
    if let Some(stripped) = clean.strip_suffix('x') {
        clean = stripped.to_string();
    }

    let suffixes: [(&str, Decimal); 8] = [
        ("billion", dec!(1_000_000_000)),
        ("million", dec!(1_000_000)),
        ("thousand", dec!(1_000)),
        ("bn", dec!(1_000_000_000)),
        ("mm", dec!(1_000_000)),
        ("b", dec!(1_000_000_000)),
        ("m", dec!(1_000_000)),
        ("k", dec!(1_000)),
    ];
    let mut multiplier = Decimal::ONE;
    for (suffix, factor) in suffixes {
        if let Some(stripped) = clean.strip_suffix(suffix) {
            multiplier = factor;
            clean = stripped.to_string();
            break;
        }
    }

    let value = Decimal::from_str(&clean).ok()?.checked_mul(multiplier)?;
    Some(if percent { value / dec!(100) } else { value })
}

/// Whole percentages (6.5) become decimals (0.065); decimals pass through.
pub fn normalize_rate(value: Decimal) -> Rate {
    if value > Decimal::ONE {
        value / dec!(100)
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// Everything usable that was read, plus a record of what was set aside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DealDraft {
    pub purchase_price: Option<Money>,
    pub loan_amount: Option<Money>,
    pub interest_rate: Option<Rate>,
    pub amortization_years: Option<u32>,
    pub io_months: Option<u32>,
    pub noi: Option<Money>,
    pub asset_class: Option<AssetClass>,
    pub market_tier: Option<MarketTier>,
    pub submarket: Option<String>,
    pub stated_cap_rate: Option<Rate>,
    pub stated_dscr: Option<Decimal>,
    pub stated_ltv: Option<Rate>,
    pub exit_cap_rate: Option<Rate>,
    pub expense_ratio: Option<Rate>,
    /// Canonical names of the fields that were used
    pub accepted: Vec<DealField>,
    /// Labels read below the confidence threshold
    pub low_confidence: Vec<String>,
    /// Labels that match no deal field
    pub unrecognized: Vec<String>,
    pub warnings: Vec<String>,
    /// Mean confidence of the accepted readings
    pub overall_confidence: Option<Decimal>,
}

/// Values used for loan terms the document did not state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDefaults {
    pub interest_rate: Rate,
    pub amortization_years: u32,
    pub io_months: u32,
    pub market_tier: MarketTier,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        DraftDefaults {
            interest_rate: dec!(0.065),
            amortization_years: 30,
            io_months: 0,
            market_tier: MarketTier::Primary,
        }
    }
}

/// Build a draft from OCR readings.
///
/// When the same field is read under several labels the most confident
/// reading wins.
pub fn draft_deal(fields: &ExtractedFields, min_confidence: Decimal) -> DealDraft {
    let mut draft = DealDraft::default();
    let mut best: BTreeMap<DealField, (&str, &ExtractedField)> = BTreeMap::new();

    for (label, field) in fields {
        if field.confidence < Decimal::ZERO || field.confidence > Decimal::ONE {
            draft.warnings.push(format!(
                "Ignored '{label}': confidence {} is outside 0..1",
                field.confidence
            ));
            continue;
        }
        let Some(deal_field) = normalize_field_name(label) else {
            draft.unrecognized.push(label.clone());
            continue;
        };
        if field.confidence < min_confidence {
            draft.low_confidence.push(label.clone());
            continue;
        }
        let replace = best
            .get(&deal_field)
            .map_or(true, |(_, current)| field.confidence > current.confidence);
        if replace {
            best.insert(deal_field, (label.as_str(), field));
        }
    }

    let mut confidence_sum = Decimal::ZERO;
    for (&deal_field, &(label, field)) in &best {
        match apply_field(&mut draft, deal_field, &field.value) {
            Ok(()) => {
                draft.accepted.push(deal_field);
                confidence_sum += field.confidence;
            }
            Err(reason) => draft
                .warnings
                .push(format!("Could not read '{label}' as {deal_field}: {reason}")),
        }
    }
    if !draft.accepted.is_empty() {
        draft.overall_confidence =
            Some(confidence_sum / Decimal::from(draft.accepted.len() as u64));
    }

    cross_validate(&mut draft);
    derive_missing(&mut draft);

    debug!(
        accepted = draft.accepted.len(),
        low_confidence = draft.low_confidence.len(),
        unrecognized = draft.unrecognized.len(),
        "extraction drafted"
    );
    draft
}

fn apply_field(draft: &mut DealDraft, field: DealField, value: &ExtractedValue) -> Result<(), String> {
    match field {
        DealField::AssetClass => {
            draft.asset_class = Some(text_of(value)?.parse::<AssetClass>().map_err(|e| e.to_string())?);
        }
        DealField::MarketTier => {
            draft.market_tier = Some(text_of(value)?.parse::<MarketTier>().map_err(|e| e.to_string())?);
        }
        DealField::Submarket => {
            draft.submarket = Some(text_of(value)?.trim().to_string());
        }
        _ => {
            let mut n = number_of(value)?;
            if field.is_rate() {
                n = normalize_rate(n);
            }
            match field {
                DealField::PurchasePrice => draft.purchase_price = Some(n),
                DealField::Noi => draft.noi = Some(n),
                DealField::CapRate => draft.stated_cap_rate = Some(n),
                DealField::LoanAmount => draft.loan_amount = Some(n),
                DealField::InterestRate => draft.interest_rate = Some(n),
                DealField::AmortizationYears => draft.amortization_years = Some(whole(n)?),
                DealField::IoMonths => draft.io_months = Some(whole(n)?),
                DealField::IoYears => {
                    // an explicit month count wins over years
                    if draft.io_months.is_none() {
                        let months = n.checked_mul(dec!(12)).ok_or_else(|| format!("{n} is out of range"))?;
                        draft.io_months = Some(whole(months)?);
                    }
                }
                DealField::Dscr => draft.stated_dscr = Some(n),
                DealField::Ltv => draft.stated_ltv = Some(n),
                DealField::ExitCapRate => draft.exit_cap_rate = Some(n),
                DealField::ExpenseRatio => draft.expense_ratio = Some(n),
                DealField::AssetClass | DealField::MarketTier | DealField::Submarket => {}
            }
        }
    }
    Ok(())
}

fn text_of(value: &ExtractedValue) -> Result<&str, String> {
    match value {
        ExtractedValue::Text(s) => Ok(s),
        ExtractedValue::Number(n) => Err(format!("expected text, found number {n}")),
    }
}

fn number_of(value: &ExtractedValue) -> Result<Decimal, String> {
    match value {
        ExtractedValue::Number(n) => Ok(*n),
        ExtractedValue::Text(s) => parse_number(s).ok_or_else(|| format!("'{s}' is not a number")),
    }
}

fn whole(n: Decimal) -> Result<u32, String> {
    if !n.fract().is_zero() {
        return Err(format!("{n} is not a whole number"));
    }
    n.to_u32().ok_or_else(|| format!("{n} is out of range"))
}

fn cross_validate(draft: &mut DealDraft) {
    if let (Some(stated), Some(noi), Some(price)) = (draft.stated_cap_rate, draft.noi, draft.purchase_price) {
        let implied = noi.checked_div(price).filter(|_| price > Decimal::ZERO);
        let variance = implied
            .zip(Some(stated).filter(|s| *s > Decimal::ZERO))
            .and_then(|(implied, stated)| implied.checked_sub(stated)?.abs().checked_div(stated));
        if let (Some(implied), Some(variance)) = (implied, variance) {
            if variance > CAP_RATE_TOLERANCE {
                draft.warnings.push(format!(
                    "Stated cap rate {:.2}% differs from NOI / price {:.2}% ({:.1}% variance)",
                    stated.saturating_mul(dec!(100)),
                    implied.saturating_mul(dec!(100)),
                    variance.saturating_mul(dec!(100))
                ));
            }
        }
    }

    if let (Some(ltv), Some(price), Some(loan)) = (draft.stated_ltv, draft.purchase_price, draft.loan_amount) {
        let expected = ltv.checked_mul(price).filter(|e| *e > Decimal::ZERO);
        let variance = expected.and_then(|e| e.checked_sub(loan)?.abs().checked_div(e));
        if let (Some(expected), Some(variance)) = (expected, variance) {
            if variance > LTV_TOLERANCE {
                draft.warnings.push(format!(
                    "LTV {:.1}% implies a loan of {:.0}, but the loan reads {:.0} ({:.1}% variance)",
                    ltv.saturating_mul(dec!(100)),
                    expected,
                    loan,
                    variance.saturating_mul(dec!(100))
                ));
            }
        }
    }
}

fn derive_missing(draft: &mut DealDraft) {
    if let Some(cap) = draft.stated_cap_rate.filter(|c| *c > Decimal::ZERO) {
        match (draft.purchase_price, draft.noi) {
            (None, Some(noi)) => {
                if let Some(price) = noi.checked_div(cap) {
                    draft.purchase_price = Some(price);
                    draft.warnings.push("Purchase price derived from NOI / cap rate".into());
                }
            }
            (Some(price), None) => {
                if let Some(noi) = price.checked_mul(cap) {
                    draft.noi = Some(noi);
                    draft.warnings.push("NOI derived from purchase price x cap rate".into());
                }
            }
            _ => {}
        }
    }
    if let (None, Some(ltv), Some(price)) = (draft.loan_amount, draft.stated_ltv, draft.purchase_price) {
        if let Some(loan) = ltv.checked_mul(price) {
            draft.loan_amount = Some(loan);
            draft.warnings.push("Loan amount derived from LTV x purchase price".into());
        }
    }
}

impl DealDraft {
    /// Required fields still missing after derivation.
    pub fn missing_fields(&self) -> Vec<DealField> {
        let mut missing = Vec::new();
        if self.purchase_price.is_none() {
            missing.push(DealField::PurchasePrice);
        }
        if self.noi.is_none() {
            missing.push(DealField::Noi);
        }
        if self.loan_amount.is_none() {
            missing.push(DealField::LoanAmount);
        }
        if self.asset_class.is_none() {
            missing.push(DealField::AssetClass);
        }
        missing
    }

    /// Fill loan-term gaps from `defaults` and validate.
    pub fn into_record(self, defaults: &DraftDefaults) -> CreDealResult<DealRecord> {
        let missing = self.missing_fields();
        let (Some(purchase_price), Some(noi), Some(loan_amount), Some(asset_class)) =
            (self.purchase_price, self.noi, self.loan_amount, self.asset_class)
        else {
            let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            return Err(CreDealError::InsufficientData(format!(
                "missing required fields: {}",
                names.join(", ")
            )));
        };

        DealRecord::new(DealInput {
            purchase_price,
            loan_amount,
            interest_rate: self.interest_rate.unwrap_or(defaults.interest_rate),
            amortization_years: self.amortization_years.unwrap_or(defaults.amortization_years),
            io_months: self.io_months.unwrap_or(defaults.io_months),
            noi,
            asset_class,
            market_tier: self.market_tier.unwrap_or(defaults.market_tier),
            submarket: self.submarket.unwrap_or_default(),
            noi_growth_rate: None,
            expense_ratio: self.expense_ratio,
            exit_cap_rate: self.exit_cap_rate,
        })
    }
}
