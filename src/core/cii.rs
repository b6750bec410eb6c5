use super::{FinancialYear, TableError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index assumed for a financial year missing from the table. Yields a 1:1 ratio
/// against another missing year.
pub const FALLBACK_INDEX: u32 = 100;

/// Cost Inflation Index values notified by CBDT (base year 2001-02 = 100)
const NOTIFIED: &[(i32, u32)] = &[
    (2001, 100),
    (2002, 105),
    (2003, 109),
    (2004, 113),
    (2005, 117),
    (2006, 122),
    (2007, 129),
    (2008, 137),
    (2009, 148),
    (2010, 167),
    (2011, 184),
    (2012, 200),
    (2013, 220),
    (2014, 240),
    (2015, 254),
    (2016, 264),
    (2017, 272),
    (2018, 280),
    (2019, 289),
    (2020, 301),
    (2021, 317),
    (2022, 331),
    (2023, 348),
    (2024, 363),
    (2025, 376),
];

/// Cost Inflation Index by financial year.
///
/// Values are non-zero and strictly increasing with the year; both are checked
/// when the table is built, so the indexation ratio never divides by zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<FinancialYear, u32>", into = "BTreeMap<FinancialYear, u32>")]
pub struct CiiTable {
    entries: BTreeMap<FinancialYear, u32>,
}

impl CiiTable {
    pub fn new(entries: BTreeMap<FinancialYear, u32>) -> Result<Self, TableError> {
        match Self::check_entries(&entries).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(CiiTable { entries }),
        }
    }

    /// Collect every problem with a set of entries
    pub fn check_entries(entries: &BTreeMap<FinancialYear, u32>) -> Vec<TableError> {
        let mut issues = Vec::new();
        if entries.is_empty() {
            issues.push(TableError::EmptyCostInflationIndex);
        }
        let mut previous: Option<(FinancialYear, u32)> = None;
        for (&year, &index) in entries {
            if index == 0 {
                issues.push(TableError::ZeroCostInflationIndex(year));
            }
            if let Some((previous_year, previous_index)) = previous {
                if index <= previous_index {
                    issues.push(TableError::NonIncreasingCostInflationIndex {
                        year,
                        index,
                        previous_year,
                        previous: previous_index,
                    });
                }
            }
            previous = Some((year, index));
        }
        issues
    }

    pub fn get(&self, year: FinancialYear) -> Option<u32> {
        self.entries.get(&year).copied()
    }

    pub fn contains(&self, year: FinancialYear) -> bool {
        self.entries.contains_key(&year)
    }

    /// Index for a year, falling back to [`FALLBACK_INDEX`] when the year is missing
    pub fn index_or_fallback(&self, year: FinancialYear) -> u32 {
        self.get(year).unwrap_or_else(|| {
            log::warn!(
                "No cost inflation index for FY {}, assuming {}",
                year,
                FALLBACK_INDEX
            );
            FALLBACK_INDEX
        })
    }

    /// Cost of acquisition scaled by `CII(sale) / CII(purchase)`, rounded to whole rupees
    pub fn indexed_cost(
        &self,
        cost: Decimal,
        purchase_year: FinancialYear,
        sale_year: FinancialYear,
    ) -> Decimal {
        let purchase_index = self.index_or_fallback(purchase_year);
        let sale_index = self.index_or_fallback(sale_year);
        if purchase_index == 0 {
            // table indices are non-zero by construction
            return cost;
        }
        let indexed = (cost * Decimal::from(sale_index) / Decimal::from(purchase_index))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        log::debug!(
            "Indexed cost {} ({} -> {}, {}/{}): {}",
            cost,
            purchase_year,
            sale_year,
            sale_index,
            purchase_index,
            indexed
        );
        indexed
    }

    pub fn iter(&self) -> impl Iterator<Item = (FinancialYear, u32)> + '_ {
        self.entries.iter().map(|(&year, &index)| (year, index))
    }
}

impl Default for CiiTable {
    fn default() -> Self {
        CiiTable {
            entries: NOTIFIED
                .iter()
                .map(|&(year, index)| (FinancialYear(year), index))
                .collect(),
        }
    }
}

impl TryFrom<BTreeMap<FinancialYear, u32>> for CiiTable {
    type Error = TableError;

    fn try_from(entries: BTreeMap<FinancialYear, u32>) -> Result<Self, Self::Error> {
        CiiTable::new(entries)
    }
}

impl From<CiiTable> for BTreeMap<FinancialYear, u32> {
    fn from(table: CiiTable) -> Self {
        table.entries
    }
}

/// Free-function form of [`CiiTable::indexed_cost`]
pub fn indexed_cost(
    cost: Decimal,
    purchase_year: FinancialYear,
    sale_year: FinancialYear,
    cii: &CiiTable,
) -> Decimal {
    cii.indexed_cost(cost, purchase_year, sale_year)
}
