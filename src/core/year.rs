use chrono::{Datelike, NaiveDate};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::TaxError;

/// Indian Financial Year (runs 1 April to 31 March)
/// The year value is the calendar year the FY starts in (e.g., 2023 = FY 2023-24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FinancialYear(pub i32);

/// Assessment Year, the year in which income of the preceding FY is assessed.
/// Uses the same representation as [`FinancialYear`]: AY 2024-25 = `AssessmentYear(2024)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssessmentYear(pub i32);

impl FinancialYear {
    /// Financial year containing a date
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            FinancialYear(date.year())
        } else {
            FinancialYear(date.year() - 1)
        }
    }

    pub fn assessment_year(&self) -> AssessmentYear {
        AssessmentYear(self.0 + 1)
    }

    /// Display as "2023-24"
    pub fn label(&self) -> String {
        year_label(self.0)
    }
}

impl AssessmentYear {
    pub fn financial_year(&self) -> FinancialYear {
        FinancialYear(self.0 - 1)
    }

    pub fn label(&self) -> String {
        year_label(self.0)
    }
}

fn year_label(start: i32) -> String {
    format!("{}-{:02}", start, (start + 1).rem_euclid(100))
}

/// Parse "2023-24" (or "2023-2024") into the starting calendar year.
///
/// Only four-digit starting years are accepted, so every label parsed here
/// has a representable successor and predecessor.
fn parse_label(s: &str) -> Result<i32, TaxError> {
    let invalid = || TaxError::InvalidYear(s.to_string());
    let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
    let start: i32 = start.parse().map_err(|_| invalid())?;
    if !(1000..=9998).contains(&start) {
        return Err(invalid());
    }
    let next = start + 1;
    match end.len() {
        2 if end.parse::<i32>().ok() == Some(next.rem_euclid(100)) => Ok(start),
        4 if end.parse::<i32>().ok() == Some(next) => Ok(start),
        _ => Err(invalid()),
    }
}

impl FromStr for FinancialYear {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s).map(FinancialYear)
    }
}

impl FromStr for AssessmentYear {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s).map(AssessmentYear)
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for AssessmentYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Labels are used both as values and as JSON map keys (CII tables).
macro_rules! label_serde {
    ($ty:ty) => {
        impl JsonSchema for $ty {
            fn schema_name() -> String {
                stringify!($ty).to_string()
            }

            fn json_schema(gen: &mut SchemaGenerator) -> Schema {
                String::json_schema(gen)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_serde!(FinancialYear);
label_serde!(AssessmentYear);
