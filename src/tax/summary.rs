//! Regime comparison and the year's aggregate tax position

use crate::core::{
    AgeCategory, AssessmentYear, RegimeKind, SlabTable, TaxError, TaxRegime, TaxSummaryInput,
    Warning,
};
use crate::tax::slab::compute_slab_tax;
use crate::tax::surcharge::apply_surcharge_and_cess;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

pub const LIMIT_80C: Decimal = dec!(150000);
pub const LIMIT_80CCD_1B: Decimal = dec!(50000);
pub const LIMIT_80D: Decimal = dec!(25000);
pub const LIMIT_80D_SENIOR: Decimal = dec!(50000);
pub const LIMIT_80TTA: Decimal = dec!(10000);
pub const LIMIT_80TTB: Decimal = dec!(50000);
pub const LIMIT_24B: Decimal = dec!(200000);

/// One old-regime deduction line after its statutory limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionLine {
    pub section: &'static str,
    pub claimed: Decimal,
    pub allowed: Decimal,
}

/// Tax under one regime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeComputation {
    pub regime: RegimeKind,
    pub name: String,
    pub gross_total_income: Decimal,
    pub standard_deduction: Decimal,
    /// Chapter VI-A deductions plus the old regime's 24(b) interest and HRA exemption
    pub chapter_via_deductions: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub base_tax: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    pub assessment_year: AssessmentYear,
    pub age: AgeCategory,
    pub gross_total_income: Decimal,
    pub old_regime: RegimeComputation,
    pub new_regime: RegimeComputation,
    pub recommended_regime: RegimeKind,
    pub selected_regime: RegimeKind,
    /// Difference between the two regimes' total tax
    pub savings: Decimal,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub total_tax_liability: Decimal,
    pub total_tax_paid: Decimal,
    pub tax_payable: Decimal,
    pub refund_due: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl TaxSummary {
    pub fn regime(&self, kind: RegimeKind) -> &RegimeComputation {
        match kind {
            RegimeKind::Old => &self.old_regime,
            RegimeKind::New => &self.new_regime,
        }
    }

    pub fn selected(&self) -> &RegimeComputation {
        self.regime(self.selected_regime)
    }
}

fn capped(
    section: &'static str,
    claimed: Decimal,
    limit: Option<Decimal>,
    warnings: &mut Vec<Warning>,
) -> DeductionLine {
    let claimed = claimed.max(Decimal::ZERO);
    let allowed = limit.map_or(claimed, |limit| claimed.min(limit));
    if allowed < claimed {
        log::debug!("{} claim {} capped at {}", section, claimed, allowed);
        warnings.push(Warning::DeductionCapped {
            section: section.to_string(),
            claimed,
            allowed,
        });
    }
    DeductionLine {
        section,
        claimed,
        allowed,
    }
}

/// Old-regime deductions with their statutory limits applied
pub fn old_regime_deductions(input: &TaxSummaryInput) -> (Vec<DeductionLine>, Vec<Warning>) {
    let senior = input.age.is_senior();
    let d80d = &input.deductions_80d;
    let other = &input.other_deductions;
    let mut warnings = Vec::new();

    let self_limit = if senior { LIMIT_80D_SENIOR } else { LIMIT_80D };
    let parents_limit = if d80d.parents_senior {
        LIMIT_80D_SENIOR
    } else {
        LIMIT_80D
    };
    let (interest_section, interest_limit) = if senior {
        ("80TTB", LIMIT_80TTB)
    } else {
        ("80TTA", LIMIT_80TTA)
    };

    let lines = vec![
        capped("80C", input.deductions_80c.total(), Some(LIMIT_80C), &mut warnings),
        capped("80CCD(1B)", other.nps_80ccd_1b, Some(LIMIT_80CCD_1B), &mut warnings),
        capped("80D", d80d.self_and_family, Some(self_limit), &mut warnings),
        capped("80D (parents)", d80d.parents, Some(parents_limit), &mut warnings),
        capped("80E", other.education_loan_interest_80e, None, &mut warnings),
        capped("80G", other.donations_80g, None, &mut warnings),
        capped(
            interest_section,
            other.savings_interest_80tta,
            Some(interest_limit),
            &mut warnings,
        ),
        capped("24(b)", other.home_loan_interest_24b, Some(LIMIT_24B), &mut warnings),
        capped("HRA", other.hra_exemption, None, &mut warnings),
    ];
    (lines, warnings)
}

fn compute_regime(
    regime: &TaxRegime,
    age: AgeCategory,
    gross_total_income: Decimal,
    salary: Decimal,
    chapter_via_deductions: Decimal,
) -> RegimeComputation {
    let standard_deduction = salary.max(Decimal::ZERO).min(regime.standard_deduction);
    let total_deductions = standard_deduction + chapter_via_deductions;
    let taxable_income = (gross_total_income - total_deductions).max(Decimal::ZERO);
    let base_tax = compute_slab_tax(taxable_income, regime.slabs_for(age));
    let liability = apply_surcharge_and_cess(base_tax, taxable_income, regime);

    RegimeComputation {
        regime: regime.kind,
        name: regime.name.clone(),
        gross_total_income,
        standard_deduction,
        chapter_via_deductions,
        total_deductions,
        taxable_income,
        base_tax: liability.base_tax,
        surcharge: liability.surcharge,
        cess: liability.cess,
        total_tax: liability.total_tax,
    }
}

/// Compute tax under both regimes, recommend the cheaper one and settle the
/// selected regime's liability against taxes already paid.
///
/// The new regime allows only the standard deduction. Ties go to the year's
/// default regime.
pub fn calculate_tax_summary(
    input: &TaxSummaryInput,
    table: &SlabTable,
) -> Result<TaxSummary, TaxError> {
    input.check()?;
    let year = input.assessment_year;
    let slabs_year = table.year(year)?;
    let old = table.regime(year, RegimeKind::Old)?;
    let new = table.regime(year, RegimeKind::New)?;

    let gross_total_income = input.income.total().max(Decimal::ZERO);
    let salary = input.income.salary;
    let (deductions, warnings) = old_regime_deductions(input);
    let chapter_via: Decimal = deductions.iter().map(|d| d.allowed).sum();

    let old_regime = compute_regime(old, input.age, gross_total_income, salary, chapter_via);
    let new_regime = compute_regime(new, input.age, gross_total_income, salary, Decimal::ZERO);

    let recommended_regime = if old_regime.total_tax < new_regime.total_tax {
        RegimeKind::Old
    } else if new_regime.total_tax < old_regime.total_tax {
        RegimeKind::New
    } else {
        slabs_year
            .default_regime()
            .map_or(RegimeKind::New, |r| r.kind)
    };
    let selected_regime = input.regime.unwrap_or(recommended_regime);
    let savings = (old_regime.total_tax - new_regime.total_tax).abs();

    let selected = match selected_regime {
        RegimeKind::Old => &old_regime,
        RegimeKind::New => &new_regime,
    };
    let total_deductions = selected.total_deductions;
    let taxable_income = selected.taxable_income;
    let total_tax_liability = selected.total_tax;
    let total_tax_paid = input.tax_paid.total();
    let tax_payable = (total_tax_liability - total_tax_paid).max(Decimal::ZERO);
    let refund_due = (total_tax_paid - total_tax_liability).max(Decimal::ZERO);

    log::debug!(
        "AY {}: old {} vs new {}, recommending {}",
        year,
        old_regime.total_tax,
        new_regime.total_tax,
        recommended_regime
    );

    Ok(TaxSummary {
        assessment_year: year,
        age: input.age,
        gross_total_income,
        old_regime,
        new_regime,
        recommended_regime,
        selected_regime,
        savings,
        deductions,
        total_deductions,
        taxable_income,
        total_tax_liability,
        total_tax_paid,
        tax_payable,
        refund_due,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Deductions80C, Deductions80D, IncomeData, OtherDeductions, TaxPaid};

    fn input(year: i32, salary: Decimal) -> TaxSummaryInput {
        TaxSummaryInput {
            assessment_year: AssessmentYear(year),
            age: AgeCategory::BelowSixty,
            regime: None,
            income: IncomeData {
                salary,
                ..Default::default()
            },
            deductions_80c: Deductions80C::default(),
            deductions_80d: Deductions80D::default(),
            other_deductions: OtherDeductions::default(),
            tax_paid: TaxPaid::default(),
        }
    }

    #[test]
    fn new_regime_wins_without_deductions() {
        let summary =
            calculate_tax_summary(&input(2025, dec!(1200000)), &SlabTable::builtin()).unwrap();

        // 11.25L after the 75k standard deduction
        assert_eq!(summary.new_regime.taxable_income, dec!(1125000));
        assert_eq!(summary.new_regime.base_tax, dec!(68750));
        assert_eq!(summary.new_regime.total_tax, dec!(71500));
        assert_eq!(summary.old_regime.taxable_income, dec!(1150000));
        assert_eq!(summary.old_regime.total_tax, dec!(163800));
        assert_eq!(summary.recommended_regime, RegimeKind::New);
        assert_eq!(summary.selected_regime, RegimeKind::New);
        assert_eq!(summary.savings, dec!(92300));
        assert_eq!(summary.total_tax_liability, dec!(71500));
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn old_regime_wins_with_large_deductions() {
        let mut input = input(2024, dec!(1000000));
        input.deductions_80c.ppf = dec!(150000);
        input.deductions_80d.self_and_family = dec!(25000);
        input.other_deductions.home_loan_interest_24b = dec!(200000);
        input.other_deductions.nps_80ccd_1b = dec!(50000);

        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();

        assert_eq!(summary.old_regime.chapter_via_deductions, dec!(425000));
        assert_eq!(summary.old_regime.taxable_income, dec!(525000));
        assert_eq!(summary.old_regime.total_tax, dec!(18200));
        assert_eq!(summary.new_regime.taxable_income, dec!(950000));
        assert_eq!(summary.new_regime.chapter_via_deductions, Decimal::ZERO);
        assert_eq!(summary.new_regime.total_tax, dec!(54600));
        assert_eq!(summary.recommended_regime, RegimeKind::Old);
        assert_eq!(summary.savings, dec!(36400));
        assert_eq!(summary.total_deductions, dec!(475000));
    }

    #[test]
    fn explicit_regime_overrides_recommendation() {
        let mut input = input(2025, dec!(1200000));
        input.regime = Some(RegimeKind::Old);
        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(summary.recommended_regime, RegimeKind::New);
        assert_eq!(summary.selected_regime, RegimeKind::Old);
        assert_eq!(summary.total_tax_liability, dec!(163800));
        assert_eq!(summary.selected().taxable_income, dec!(1150000));
    }

    #[test]
    fn refund_when_paid_exceeds_liability() {
        let mut input = input(2025, dec!(1200000));
        input.tax_paid.tds = dec!(80000);
        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(summary.total_tax_paid, dec!(80000));
        assert_eq!(summary.refund_due, dec!(8500));
        assert_eq!(summary.tax_payable, Decimal::ZERO);
    }

    #[test]
    fn payable_when_liability_exceeds_paid() {
        let mut input = input(2025, dec!(1200000));
        input.tax_paid.tds = dec!(40000);
        input.tax_paid.advance_tax = dec!(10000);
        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(summary.tax_payable, dec!(21500));
        assert_eq!(summary.refund_due, Decimal::ZERO);
    }

    #[test]
    fn payable_and_refund_are_exclusive() {
        for tds in [dec!(0), dec!(50000), dec!(71500), dec!(100000)] {
            let mut input = input(2025, dec!(1200000));
            input.tax_paid.tds = tds;
            let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
            assert!(summary.tax_payable.is_zero() || summary.refund_due.is_zero());
            assert_eq!(
                summary.total_tax_liability - summary.total_tax_paid,
                summary.tax_payable - summary.refund_due
            );
        }
    }

    #[test]
    fn unknown_assessment_year() {
        let result = calculate_tax_summary(&input(2010, dec!(500000)), &SlabTable::builtin());
        assert_eq!(
            result.unwrap_err(),
            TaxError::UnknownAssessmentYear(AssessmentYear(2010))
        );
    }

    #[test]
    fn tie_goes_to_default_regime() {
        let summary =
            calculate_tax_summary(&input(2025, Decimal::ZERO), &SlabTable::builtin()).unwrap();
        assert_eq!(summary.old_regime.total_tax, Decimal::ZERO);
        assert_eq!(summary.new_regime.total_tax, Decimal::ZERO);
        assert_eq!(summary.recommended_regime, RegimeKind::New);
    }

    #[test]
    fn house_property_loss_cannot_make_income_negative() {
        let mut input = input(2025, Decimal::ZERO);
        input.income.house_property = dec!(-200000);
        input.income.other_sources = dec!(50000);
        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(summary.gross_total_income, Decimal::ZERO);
        assert_eq!(summary.taxable_income, Decimal::ZERO);
    }

    #[test]
    fn standard_deduction_limited_to_salary() {
        let mut input = input(2025, dec!(30000));
        input.income.other_sources = dec!(500000);
        let summary = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(summary.new_regime.standard_deduction, dec!(30000));
        assert_eq!(summary.old_regime.standard_deduction, dec!(30000));
    }

    #[test]
    fn caps_emit_warnings() {
        let mut input = input(2025, dec!(2000000));
        input.deductions_80c.elss = dec!(120000);
        input.deductions_80c.life_insurance = dec!(80000);
        input.deductions_80d.self_and_family = dec!(40000);
        input.other_deductions.savings_interest_80tta = dec!(30000);

        let (lines, warnings) = old_regime_deductions(&input);
        let allowed = |section: &str| lines.iter().find(|l| l.section == section).unwrap().allowed;
        assert_eq!(allowed("80C"), dec!(150000));
        assert_eq!(allowed("80D"), dec!(25000));
        assert_eq!(allowed("80TTA"), dec!(10000));
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings[0],
            Warning::DeductionCapped {
                section: "80C".to_string(),
                claimed: dec!(200000),
                allowed: dec!(150000),
            }
        );
    }

    #[test]
    fn negative_80c_component_is_ignored_before_cap() {
        let mut input = input(2025, dec!(2000000));
        input.deductions_80c.ppf = dec!(200000);
        input.deductions_80c.elss = dec!(-100000);

        let (lines, warnings) = old_regime_deductions(&input);
        assert_eq!(lines[0].section, "80C");
        assert_eq!(lines[0].claimed, dec!(200000));
        assert_eq!(lines[0].allowed, dec!(150000));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn rejects_amounts_beyond_supported_range() {
        let result = calculate_tax_summary(&input(2025, Decimal::MAX), &SlabTable::builtin());
        assert_eq!(
            result.unwrap_err(),
            TaxError::AmountOutOfRange {
                field: "salary",
                amount: Decimal::MAX
            }
        );
    }

    #[test]
    fn senior_limits_are_higher() {
        let mut input = input(2025, dec!(2000000));
        input.age = AgeCategory::Senior;
        input.deductions_80d.self_and_family = dec!(40000);
        input.deductions_80d.parents = dec!(60000);
        input.deductions_80d.parents_senior = true;
        input.other_deductions.savings_interest_80tta = dec!(30000);

        let (lines, warnings) = old_regime_deductions(&input);
        let allowed = |section: &str| lines.iter().find(|l| l.section == section).unwrap().allowed;
        assert_eq!(allowed("80D"), dec!(40000));
        assert_eq!(allowed("80D (parents)"), dec!(50000));
        assert_eq!(allowed("80TTB"), dec!(30000));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn uncapped_sections_pass_through() {
        let mut input = input(2025, dec!(2000000));
        input.other_deductions.education_loan_interest_80e = dec!(300000);
        input.other_deductions.donations_80g = dec!(250000);
        input.other_deductions.hra_exemption = dec!(180000);
        let (lines, warnings) = old_regime_deductions(&input);
        let total: Decimal = lines.iter().map(|l| l.allowed).sum();
        assert_eq!(total, dec!(730000));
        assert!(warnings.is_empty());
    }

    #[test]
    fn senior_slabs_apply_to_old_regime() {
        let mut input = input(2025, Decimal::ZERO);
        input.income.other_sources = dec!(300000);
        let below_sixty = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        // 50k @ 5% plus cess
        assert_eq!(below_sixty.old_regime.total_tax, dec!(2600));

        input.age = AgeCategory::Senior;
        let senior = calculate_tax_summary(&input, &SlabTable::builtin()).unwrap();
        assert_eq!(senior.old_regime.total_tax, Decimal::ZERO);
    }

    #[test]
    fn surcharge_applies_on_taxable_income() {
        let summary =
            calculate_tax_summary(&input(2025, dec!(6075000)), &SlabTable::builtin()).unwrap();
        // new regime: 60L taxable, 10% surcharge band
        assert_eq!(summary.new_regime.taxable_income, dec!(6000000));
        assert_eq!(summary.new_regime.surcharge, summary.new_regime.base_tax / dec!(10));
    }
}
