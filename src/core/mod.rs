pub mod cii;
pub mod disposal;
pub mod error;
pub mod income;
pub mod slabs;
pub mod warnings;
pub mod year;

// Flat public surface for domain types.
pub use cii::CiiTable;
pub use disposal::{
    read_disposals_csv, read_disposals_json, AssetType, CapitalGainInput, DisposalInput,
    DisposalRecord,
};
pub use error::{TableError, TaxError};
pub use income::{
    read_summary_input_json, Deductions80C, Deductions80D, IncomeData, OtherDeductions, TaxPaid,
    TaxSummaryInput,
};
pub use slabs::{
    AgeCategory, RegimeKind, SlabTable, SurchargeBand, TaxRegime, TaxSlab, TaxSlabsYear,
};
pub use warnings::Warning;
pub use year::{AssessmentYear, FinancialYear};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest rupee amount, positive or negative, accepted from input
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Reject an input amount beyond `MAX_AMOUNT`
pub fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal, TaxError> {
    if amount.abs() > MAX_AMOUNT {
        return Err(TaxError::AmountOutOfRange { field, amount });
    }
    Ok(amount)
}

/// Description of one CSV input column, generated by `#[derive(CsvColumns)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumn {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}
