use crate::core::TaxSlab;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tax on `income` under progressive slabs: the sum of each slab's marginal
/// contribution.
///
/// Slabs must be ascending and contiguous with the last one unbounded; this is
/// checked when tables are loaded, not here.
pub fn compute_slab_tax(income: Decimal, slabs: &[TaxSlab]) -> Decimal {
    slabs
        .iter()
        .filter(|slab| income > slab.income_from)
        .map(|slab| {
            let upper = slab.income_to.map_or(income, |to| income.min(to));
            (upper - slab.income_from) * slab.tax_rate / dec!(100)
        })
        .sum()
}

/// Rate of the slab that taxes the last rupee of `income`
pub fn marginal_rate(income: Decimal, slabs: &[TaxSlab]) -> Decimal {
    slabs
        .iter()
        .find(|slab| {
            income > slab.income_from && slab.income_to.is_none_or(|to| income <= to)
        })
        .or_else(|| slabs.first())
        .map_or(Decimal::ZERO, |slab| slab.tax_rate)
}
