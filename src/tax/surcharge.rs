use crate::core::TaxRegime;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Base tax with surcharge and cess layered on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaxLiability {
    pub base_tax: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

/// Round to paise
pub(crate) fn paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Surcharge rate for the highest band whose threshold does not exceed `income`
pub fn surcharge_rate(income: Decimal, regime: &TaxRegime) -> Decimal {
    let mut bands: Vec<_> = regime.surcharge.iter().collect();
    bands.sort_by(|a, b| b.threshold.cmp(&a.threshold));
    bands
        .into_iter()
        .find(|band| band.threshold <= income)
        .map_or(Decimal::ZERO, |band| band.rate)
}

/// Layer surcharge (by income band) and cess onto `base_tax`.
///
/// No marginal relief is applied at the surcharge thresholds. Each component is
/// rounded to paise so `total_tax` is exactly their sum.
pub fn apply_surcharge_and_cess(
    base_tax: Decimal,
    income_for_surcharge: Decimal,
    regime: &TaxRegime,
) -> TaxLiability {
    let base_tax = paise(base_tax.max(Decimal::ZERO));
    let rate = surcharge_rate(income_for_surcharge, regime);
    let surcharge = paise(base_tax * rate / dec!(100));
    let cess = paise((base_tax + surcharge) * regime.cess / dec!(100));
    let total_tax = base_tax + surcharge + cess;
    log::debug!(
        "{} regime: base {} + surcharge {} ({}% on income {}) + cess {} = {}",
        regime.kind,
        base_tax,
        surcharge,
        rate,
        income_for_surcharge,
        cess,
        total_tax
    );
    TaxLiability {
        base_tax,
        surcharge,
        cess,
        total_tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssessmentYear, RegimeKind, SlabTable};

    fn regime(year: i32, kind: RegimeKind) -> TaxRegime {
        SlabTable::builtin()
            .regime(AssessmentYear(year), kind)
            .unwrap()
            .clone()
    }

    #[test]
    fn cess_only_below_first_threshold() {
        let old = regime(2025, RegimeKind::Old);
        let liability = apply_surcharge_and_cess(dec!(100000), dec!(1000000), &old);
        assert_eq!(liability.surcharge, Decimal::ZERO);
        assert_eq!(liability.cess, dec!(4000));
        assert_eq!(liability.total_tax, dec!(104000));
    }

    #[test]
    fn threshold_is_inclusive() {
        let old = regime(2025, RegimeKind::Old);
        assert_eq!(surcharge_rate(dec!(4999999), &old), dec!(0));
        assert_eq!(surcharge_rate(dec!(5000000), &old), dec!(10));
        assert_eq!(surcharge_rate(dec!(10000000), &old), dec!(15));
        assert_eq!(surcharge_rate(dec!(60000000), &old), dec!(37));
    }

    #[test]
    fn new_regime_surcharge_capped_at_25() {
        let new = regime(2025, RegimeKind::New);
        assert_eq!(surcharge_rate(dec!(60000000), &new), dec!(25));
        let legacy = regime(2023, RegimeKind::New);
        assert_eq!(surcharge_rate(dec!(60000000), &legacy), dec!(37));
    }

    #[test]
    fn surcharge_then_cess_on_both() {
        let old = regime(2025, RegimeKind::Old);
        let liability = apply_surcharge_and_cess(dec!(1000000), dec!(6000000), &old);
        assert_eq!(liability.surcharge, dec!(100000));
        // 4% of 11L
        assert_eq!(liability.cess, dec!(44000));
        assert_eq!(liability.total_tax, dec!(1144000));
    }

    #[test]
    fn unsorted_bands_still_pick_highest_threshold() {
        let mut old = regime(2025, RegimeKind::Old);
        old.surcharge.reverse();
        assert_eq!(surcharge_rate(dec!(25000000), &old), dec!(25));
    }

    #[test]
    fn no_bands_means_no_surcharge() {
        let mut old = regime(2025, RegimeKind::Old);
        old.surcharge.clear();
        let liability = apply_surcharge_and_cess(dec!(5000000), dec!(100000000), &old);
        assert_eq!(liability.surcharge, Decimal::ZERO);
        assert_eq!(liability.total_tax, dec!(5200000));
    }

    #[test]
    fn non_decreasing_in_income() {
        let old = regime(2025, RegimeKind::Old);
        let base = dec!(250000);
        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;
        while income <= dec!(70000000) {
            let total = apply_surcharge_and_cess(base, income, &old).total_tax;
            assert!(total >= previous);
            previous = total;
            income += dec!(1000000);
        }
    }

    #[test]
    fn total_is_sum_of_rounded_parts() {
        let old = regime(2025, RegimeKind::Old);
        let liability = apply_surcharge_and_cess(dec!(12345.675), dec!(5500000), &old);
        assert_eq!(liability.base_tax, dec!(12345.68));
        assert_eq!(
            liability.total_tax,
            liability.base_tax + liability.surcharge + liability.cess
        );
    }
}
