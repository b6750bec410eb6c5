use super::FinancialYear;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain warnings attached to computation results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// No cost inflation index for a year; the fallback index was used.
    MissingCostInflationIndex { financial_year: FinancialYear },
    /// A deduction claim exceeded its statutory limit and was reduced.
    DeductionCapped {
        section: String,
        #[schemars(with = "f64")]
        claimed: Decimal,
        #[schemars(with = "f64")]
        allowed: Decimal,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingCostInflationIndex { financial_year } => write!(
                f,
                "no cost inflation index for FY {}, indexation used {}",
                financial_year,
                super::cii::FALLBACK_INDEX
            ),
            Warning::DeductionCapped {
                section,
                claimed,
                allowed,
            } => write!(f, "{} claim of {} capped at {}", section, claimed, allowed),
        }
    }
}
