use super::{AssessmentYear, FinancialYear, RegimeKind};
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid year label '{0}' (expected e.g. 2024-25)")]
    InvalidYear(String),
    #[error("no tax slabs for assessment year {0}")]
    UnknownAssessmentYear(AssessmentYear),
    #[error("assessment year {year} has no {regime} regime")]
    MissingRegime {
        year: AssessmentYear,
        regime: RegimeKind,
    },
    #[error("unknown asset type '{0}' (expected equity, debt, property or gold)")]
    UnknownAssetType(String),
    #[error("unknown regime '{0}' (expected old or new)")]
    UnknownRegime(String),
    #[error("unknown age category '{0}'")]
    UnknownAgeCategory(String),
    #[error("{field} {amount} is out of range (at most 10^15 in magnitude)")]
    AmountOutOfRange { field: &'static str, amount: Decimal },
}

/// Structural problems in a slab or CII table
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{year} {regime}: no slabs")]
    EmptySlabs {
        year: AssessmentYear,
        regime: RegimeKind,
    },
    #[error("{year} {regime}: first slab starts at {from} instead of 0")]
    FirstSlabNotZero {
        year: AssessmentYear,
        regime: RegimeKind,
        from: Decimal,
    },
    #[error("{year} {regime}: slab {index} starts at {from}, previous slab ends at {previous_to}")]
    NonContiguousSlabs {
        year: AssessmentYear,
        regime: RegimeKind,
        index: usize,
        from: Decimal,
        previous_to: Decimal,
    },
    #[error("{year} {regime}: slab {index} is unbounded but is not the last slab")]
    UnboundedSlabNotLast {
        year: AssessmentYear,
        regime: RegimeKind,
        index: usize,
    },
    #[error("{year} {regime}: last slab must be unbounded")]
    BoundedFinalSlab {
        year: AssessmentYear,
        regime: RegimeKind,
    },
    #[error("{year} {regime}: slab {index} is empty or inverted")]
    EmptySlabRange {
        year: AssessmentYear,
        regime: RegimeKind,
        index: usize,
    },
    #[error("{year} {regime}: rate {rate}% is outside 0..=100")]
    RateOutOfRange {
        year: AssessmentYear,
        regime: RegimeKind,
        rate: Decimal,
    },
    #[error("{year} {regime}: negative surcharge band (threshold {threshold}, rate {rate}%)")]
    NegativeSurcharge {
        year: AssessmentYear,
        regime: RegimeKind,
        threshold: Decimal,
        rate: Decimal,
    },
    #[error("{year}: expected exactly one default regime, found {count}")]
    DefaultRegimeCount { year: AssessmentYear, count: usize },
    #[error("{year}: {regime} regime defined more than once")]
    DuplicateRegime {
        year: AssessmentYear,
        regime: RegimeKind,
    },
    #[error("assessment year {0} defined more than once")]
    DuplicateYear(AssessmentYear),
    #[error("cost inflation index table is empty")]
    EmptyCostInflationIndex,
    #[error("cost inflation index for {0} is zero")]
    ZeroCostInflationIndex(FinancialYear),
    #[error("cost inflation index {index} for {year} is not above {previous} for {previous_year}")]
    NonIncreasingCostInflationIndex {
        year: FinancialYear,
        index: u32,
        previous_year: FinancialYear,
        previous: u32,
    },
}
