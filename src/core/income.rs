use super::{check_amount, AgeCategory, AssessmentYear, RegimeKind, TaxError};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Income by head for the financial year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IncomeData {
    /// Gross salary
    #[schemars(with = "f64")]
    pub salary: Decimal,
    /// Net income from house property; negative for a loss
    #[schemars(with = "f64")]
    pub house_property: Decimal,
    #[schemars(with = "f64")]
    pub capital_gains: Decimal,
    /// Interest, dividends and other sources
    #[schemars(with = "f64")]
    pub other_sources: Decimal,
}

impl IncomeData {
    pub fn total(&self) -> Decimal {
        self.salary + self.house_property + self.capital_gains + self.other_sources
    }
}

/// Section 80C investments and payments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Deductions80C {
    #[schemars(with = "f64")]
    pub life_insurance: Decimal,
    #[schemars(with = "f64")]
    pub ppf: Decimal,
    #[schemars(with = "f64")]
    pub epf: Decimal,
    #[schemars(with = "f64")]
    pub elss: Decimal,
    #[schemars(with = "f64")]
    pub nsc: Decimal,
    #[schemars(with = "f64")]
    pub tuition_fees: Decimal,
    #[schemars(with = "f64")]
    pub home_loan_principal: Decimal,
    #[schemars(with = "f64")]
    pub tax_saver_deposit: Decimal,
    #[schemars(with = "f64")]
    pub other: Decimal,
}

impl Deductions80C {
    /// Sum of the components, each floored at zero
    pub fn total(&self) -> Decimal {
        [
            self.life_insurance,
            self.ppf,
            self.epf,
            self.elss,
            self.nsc,
            self.tuition_fees,
            self.home_loan_principal,
            self.tax_saver_deposit,
            self.other,
        ]
        .into_iter()
        .map(|amount| amount.max(Decimal::ZERO))
        .sum()
    }
}

/// Section 80D health insurance premiums
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Deductions80D {
    /// Self, spouse and children
    #[schemars(with = "f64")]
    pub self_and_family: Decimal,
    #[schemars(with = "f64")]
    pub parents: Decimal,
    /// Parents are 60 or older
    pub parents_senior: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OtherDeductions {
    /// Additional NPS contribution, 80CCD(1B)
    #[schemars(with = "f64")]
    pub nps_80ccd_1b: Decimal,
    #[schemars(with = "f64")]
    pub education_loan_interest_80e: Decimal,
    /// Eligible amount of donations, 80G
    #[schemars(with = "f64")]
    pub donations_80g: Decimal,
    /// Savings interest, 80TTA (80TTB for senior citizens)
    #[schemars(with = "f64")]
    pub savings_interest_80tta: Decimal,
    /// Interest on a self-occupied home loan, 24(b)
    #[schemars(with = "f64")]
    pub home_loan_interest_24b: Decimal,
    #[schemars(with = "f64")]
    pub hra_exemption: Decimal,
}

/// Taxes already paid for the year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TaxPaid {
    #[schemars(with = "f64")]
    pub tds: Decimal,
    #[schemars(with = "f64")]
    pub advance_tax: Decimal,
    #[schemars(with = "f64")]
    pub self_assessment_tax: Decimal,
}

impl TaxPaid {
    pub fn total(&self) -> Decimal {
        self.tds + self.advance_tax + self.self_assessment_tax
    }
}

/// Everything needed to compute a year's tax summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxSummaryInput {
    pub assessment_year: AssessmentYear,
    #[serde(default)]
    pub age: AgeCategory,
    /// Regime the filer opts for; the cheaper one when absent
    #[serde(default)]
    pub regime: Option<RegimeKind>,
    #[serde(default)]
    pub income: IncomeData,
    #[serde(default)]
    pub deductions_80c: Deductions80C,
    #[serde(default)]
    pub deductions_80d: Deductions80D,
    #[serde(default)]
    pub other_deductions: OtherDeductions,
    #[serde(default)]
    pub tax_paid: TaxPaid,
}

impl TaxSummaryInput {
    /// Every amount, named by its JSON field
    pub fn amounts(&self) -> [(&'static str, Decimal); 24] {
        let (income, c, d, other, paid) = (
            &self.income,
            &self.deductions_80c,
            &self.deductions_80d,
            &self.other_deductions,
            &self.tax_paid,
        );
        [
            ("salary", income.salary),
            ("house_property", income.house_property),
            ("capital_gains", income.capital_gains),
            ("other_sources", income.other_sources),
            ("life_insurance", c.life_insurance),
            ("ppf", c.ppf),
            ("epf", c.epf),
            ("elss", c.elss),
            ("nsc", c.nsc),
            ("tuition_fees", c.tuition_fees),
            ("home_loan_principal", c.home_loan_principal),
            ("tax_saver_deposit", c.tax_saver_deposit),
            ("other", c.other),
            ("self_and_family", d.self_and_family),
            ("parents", d.parents),
            ("nps_80ccd_1b", other.nps_80ccd_1b),
            ("education_loan_interest_80e", other.education_loan_interest_80e),
            ("donations_80g", other.donations_80g),
            ("savings_interest_80tta", other.savings_interest_80tta),
            ("home_loan_interest_24b", other.home_loan_interest_24b),
            ("hra_exemption", other.hra_exemption),
            ("tds", paid.tds),
            ("advance_tax", paid.advance_tax),
            ("self_assessment_tax", paid.self_assessment_tax),
        ]
    }

    pub fn check(&self) -> Result<(), TaxError> {
        for (field, amount) in self.amounts() {
            check_amount(field, amount)?;
        }
        Ok(())
    }
}

pub fn read_summary_input_json<R: Read>(reader: R) -> anyhow::Result<TaxSummaryInput> {
    let input: TaxSummaryInput = serde_json::from_reader(reader)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn minimal_input_defaults_everything_else() {
        let input =
            read_summary_input_json(r#"{"assessment_year": "2025-26"}"#.as_bytes()).unwrap();
        assert_eq!(input.assessment_year, AssessmentYear(2025));
        assert_eq!(input.age, AgeCategory::BelowSixty);
        assert_eq!(input.regime, None);
        assert_eq!(input.income.total(), Decimal::ZERO);
        assert_eq!(input.tax_paid.total(), Decimal::ZERO);
    }

    #[test]
    fn totals() {
        let input = read_summary_input_json(
            r#"{
                "assessment_year": "2024-25",
                "age": "senior",
                "regime": "old",
                "income": {"salary": 1200000, "house_property": -50000, "other_sources": 20000},
                "deductions_80c": {"ppf": 100000, "elss": 80000},
                "tax_paid": {"tds": 90000, "advance_tax": 10000}
            }"#
            .as_bytes(),
        )
        .unwrap();
        assert_eq!(input.age, AgeCategory::Senior);
        assert_eq!(input.regime, Some(RegimeKind::Old));
        assert_eq!(input.income.total(), dec!(1170000));
        assert_eq!(input.deductions_80c.total(), dec!(180000));
        assert_eq!(input.tax_paid.total(), dec!(100000));
    }

    #[test]
    fn negative_80c_component_does_not_offset_others() {
        let deductions = Deductions80C {
            ppf: dec!(150000),
            elss: dec!(-100000),
            epf: dec!(20000),
            ..Default::default()
        };
        assert_eq!(deductions.total(), dec!(170000));
    }

    #[test]
    fn check_names_out_of_range_field() {
        let mut input =
            read_summary_input_json(r#"{"assessment_year": "2025-26"}"#.as_bytes()).unwrap();
        assert_eq!(input.check(), Ok(()));
        input.tax_paid.tds = Decimal::MAX;
        assert_eq!(
            input.check(),
            Err(TaxError::AmountOutOfRange {
                field: "tds",
                amount: Decimal::MAX
            })
        );
    }
}
