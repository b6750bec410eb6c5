pub mod cgt;
pub mod slab;
pub mod summary;
pub mod surcharge;

pub use cgt::{
    calculate_gains, classify_gain, compute_capital_gains_tax, holding_days, CapitalGainResult,
    CgtContext, CgtReport, GainType, OtherIncomeMode, RateBasis,
};
pub use slab::{compute_slab_tax, marginal_rate};
pub use summary::{calculate_tax_summary, RegimeComputation, TaxSummary};
pub use surcharge::{apply_surcharge_and_cess, TaxLiability};
