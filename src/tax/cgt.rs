use crate::core::{
    AgeCategory, AssetType, CapitalGainInput, CiiTable, FinancialYear, TaxRegime, Warning,
};
use crate::tax::slab::{compute_slab_tax, marginal_rate};
use crate::tax::surcharge::apply_surcharge_and_cess;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

/// Long-term gains on equity are exempt up to this amount
pub const EQUITY_LTCG_EXEMPTION: Decimal = dec!(100000);

const EQUITY_STCG_RATE: Decimal = dec!(15);
const EQUITY_LTCG_RATE: Decimal = dec!(10);
const INDEXED_LTCG_RATE: Decimal = dec!(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GainType {
    ShortTerm,
    LongTerm,
}

impl GainType {
    pub fn display(&self) -> &'static str {
        match self {
            GainType::ShortTerm => "STCG",
            GainType::LongTerm => "LTCG",
        }
    }
}

impl fmt::Display for GainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// How the filer's other income enters short-term slab-rate gains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherIncomeMode {
    /// Tax the gain on top of other income through the slabs, and count other
    /// income towards the surcharge threshold
    Include,
    /// Apply the marginal rate of other income flatly to the gain; surcharge is
    /// judged on the gain alone
    #[default]
    ApproximateMarginalRate,
}

/// Where the applied rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    Flat,
    SlabIntegrated,
    ApproximateMarginalRate,
}

/// Tables and filer circumstances shared by every disposal in a computation
#[derive(Debug, Clone, Copy)]
pub struct CgtContext<'a> {
    pub regime: &'a TaxRegime,
    pub age: AgeCategory,
    pub cii: &'a CiiTable,
    pub other_income: Decimal,
    pub mode: OtherIncomeMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapitalGainResult {
    pub asset_type: AssetType,
    pub acquisition_date: NaiveDate,
    pub disposal_date: NaiveDate,
    pub holding_days: i64,
    pub gain_type: GainType,
    pub purchase_year: FinancialYear,
    pub sale_year: FinancialYear,
    pub sale_price: Decimal,
    pub expenses: Decimal,
    /// Cost of acquisition used for the gain, indexed when `indexation_applied`
    pub indexed_cost: Decimal,
    pub indexation_applied: bool,
    pub capital_gain: Decimal,
    pub exemption: Decimal,
    pub taxable_gain: Decimal,
    /// Percentage; for slab-rate gains the marginal rate at the top of the gain
    pub tax_rate: Decimal,
    pub rate_basis: RateBasis,
    pub tax_amount: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

/// Calendar days between acquisition and disposal
pub fn holding_days(acquisition: NaiveDate, disposal: NaiveDate) -> i64 {
    (disposal - acquisition).num_days().abs()
}

/// Holding period an asset must exceed to be long term
pub fn long_term_threshold_days(asset_type: AssetType) -> i64 {
    match asset_type {
        AssetType::Equity => 365,
        AssetType::Property => 730,
        AssetType::Debt | AssetType::Gold => 1095,
    }
}

pub fn classify_gain(asset_type: AssetType, holding_days: i64) -> GainType {
    if holding_days > long_term_threshold_days(asset_type) {
        GainType::LongTerm
    } else {
        GainType::ShortTerm
    }
}

/// Compute the gain and tax on one disposal
pub fn compute_capital_gains_tax(
    input: &CapitalGainInput,
    ctx: &CgtContext,
) -> CapitalGainResult {
    let days = holding_days(input.acquisition_date, input.disposal_date);
    let gain_type = classify_gain(input.asset_type, days);
    // holding period is symmetric, so index from the earlier date to the later
    let (earlier, later) = if input.disposal_date < input.acquisition_date {
        (input.disposal_date, input.acquisition_date)
    } else {
        (input.acquisition_date, input.disposal_date)
    };
    let purchase_year = FinancialYear::from_date(earlier);
    let sale_year = FinancialYear::from_date(later);
    let mut warnings = Vec::new();

    let indexation_applied =
        gain_type == GainType::LongTerm && input.asset_type != AssetType::Equity;
    let cost = if indexation_applied {
        for year in [purchase_year, sale_year] {
            let warning = Warning::MissingCostInflationIndex {
                financial_year: year,
            };
            if !ctx.cii.contains(year) && !warnings.contains(&warning) {
                warnings.push(warning);
            }
        }
        ctx.cii
            .indexed_cost(input.purchase_price, purchase_year, sale_year)
    } else {
        input.purchase_price
    };

    let capital_gain = (input.sale_price - cost - input.expenses).max(Decimal::ZERO);
    let taxable_gain = match (input.asset_type, gain_type) {
        (AssetType::Equity, GainType::LongTerm) => {
            (capital_gain - EQUITY_LTCG_EXEMPTION).max(Decimal::ZERO)
        }
        _ => capital_gain,
    };

    let slabs = ctx.regime.slabs_for(ctx.age);
    let other_income = ctx.other_income.max(Decimal::ZERO);
    let (tax_rate, rate_basis, base_tax) = match (input.asset_type, gain_type) {
        (AssetType::Equity, GainType::ShortTerm) => (
            EQUITY_STCG_RATE,
            RateBasis::Flat,
            taxable_gain * EQUITY_STCG_RATE / dec!(100),
        ),
        (AssetType::Equity, GainType::LongTerm) => (
            EQUITY_LTCG_RATE,
            RateBasis::Flat,
            taxable_gain * EQUITY_LTCG_RATE / dec!(100),
        ),
        (_, GainType::LongTerm) => (
            INDEXED_LTCG_RATE,
            RateBasis::Flat,
            taxable_gain * INDEXED_LTCG_RATE / dec!(100),
        ),
        (_, GainType::ShortTerm) => match ctx.mode {
            OtherIncomeMode::Include => {
                let with_gain = compute_slab_tax(other_income + taxable_gain, slabs);
                let without_gain = compute_slab_tax(other_income, slabs);
                (
                    marginal_rate(other_income + taxable_gain, slabs),
                    RateBasis::SlabIntegrated,
                    with_gain - without_gain,
                )
            }
            OtherIncomeMode::ApproximateMarginalRate => {
                let rate = marginal_rate(other_income, slabs);
                (
                    rate,
                    RateBasis::ApproximateMarginalRate,
                    taxable_gain * rate / dec!(100),
                )
            }
        },
    };

    let surcharge_basis = match ctx.mode {
        OtherIncomeMode::Include => other_income + taxable_gain,
        OtherIncomeMode::ApproximateMarginalRate => taxable_gain,
    };
    let liability = apply_surcharge_and_cess(base_tax, surcharge_basis, ctx.regime);

    log::debug!(
        "{} {} held {} days: gain {} taxable {} @ {}% = {}",
        input.asset_type,
        gain_type,
        days,
        capital_gain,
        taxable_gain,
        tax_rate,
        liability.total_tax
    );

    CapitalGainResult {
        asset_type: input.asset_type,
        acquisition_date: input.acquisition_date,
        disposal_date: input.disposal_date,
        holding_days: days,
        gain_type,
        purchase_year,
        sale_year,
        sale_price: input.sale_price,
        expenses: input.expenses,
        indexed_cost: cost,
        indexation_applied,
        capital_gain,
        exemption: capital_gain - taxable_gain,
        taxable_gain,
        tax_rate,
        rate_basis,
        tax_amount: liability.base_tax,
        surcharge: liability.surcharge,
        cess: liability.cess,
        total_tax: liability.total_tax,
        description: input.description.clone(),
        warnings,
    }
}

/// Results for a batch of disposals
#[derive(Debug, Clone, Default, Serialize)]
pub struct CgtReport {
    pub results: Vec<CapitalGainResult>,
}

impl CgtReport {
    pub fn total_capital_gain(&self, gain_type: Option<GainType>) -> Decimal {
        self.filter(gain_type).map(|r| r.capital_gain).sum()
    }

    pub fn total_taxable_gain(&self, gain_type: Option<GainType>) -> Decimal {
        self.filter(gain_type).map(|r| r.taxable_gain).sum()
    }

    pub fn total_tax(&self, gain_type: Option<GainType>) -> Decimal {
        self.filter(gain_type).map(|r| r.total_tax).sum()
    }

    pub fn disposal_count(&self, gain_type: Option<GainType>) -> usize {
        self.filter(gain_type).count()
    }

    fn filter(&self, gain_type: Option<GainType>) -> impl Iterator<Item = &CapitalGainResult> {
        self.results
            .iter()
            .filter(move |r| gain_type.is_none_or(|g| r.gain_type == g))
    }
}

/// Compute every disposal independently; the equity exemption applies per disposal
pub fn calculate_gains(inputs: &[CapitalGainInput], ctx: &CgtContext) -> CgtReport {
    CgtReport {
        results: inputs
            .iter()
            .map(|input| compute_capital_gains_tax(input, ctx))
            .collect(),
    }
}
