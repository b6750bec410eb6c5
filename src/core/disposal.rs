use super::{check_amount, TaxError};
use chrono::NaiveDate;
use itaxc_derive::CsvColumns;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Asset class, which decides the holding-period threshold and rate treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Listed shares and equity-oriented mutual funds
    Equity,
    /// Debt mutual funds, bonds
    Debt,
    /// Land and buildings
    Property,
    /// Physical gold, gold funds
    Gold,
}

impl AssetType {
    pub fn display(&self) -> &'static str {
        match self {
            AssetType::Equity => "Equity",
            AssetType::Debt => "Debt",
            AssetType::Property => "Property",
            AssetType::Gold => "Gold",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for AssetType {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equity" => Ok(AssetType::Equity),
            "debt" => Ok(AssetType::Debt),
            "property" => Ok(AssetType::Property),
            "gold" => Ok(AssetType::Gold),
            _ => Err(TaxError::UnknownAssetType(s.to_string())),
        }
    }
}

/// A single asset disposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CapitalGainInput {
    pub asset_type: AssetType,
    pub acquisition_date: NaiveDate,
    pub disposal_date: NaiveDate,
    #[schemars(with = "f64")]
    pub purchase_price: Decimal,
    #[schemars(with = "f64")]
    pub sale_price: Decimal,
    /// Transfer expenses (brokerage, stamp duty, ...)
    #[serde(default)]
    #[schemars(with = "f64")]
    pub expenses: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CapitalGainInput {
    pub fn check(&self) -> Result<(), TaxError> {
        check_amount("purchase_price", self.purchase_price)?;
        check_amount("sale_price", self.sale_price)?;
        check_amount("expenses", self.expenses)?;
        Ok(())
    }
}

/// Input root for disposal JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DisposalInput {
    pub disposals: Vec<CapitalGainInput>,
}

/// Row of a disposals CSV file
#[derive(Debug, Clone, Deserialize, CsvColumns)]
pub struct DisposalRecord {
    /// equity, debt, property or gold
    pub asset_type: String,
    /// Purchase date (YYYY-MM-DD)
    pub acquisition_date: NaiveDate,
    /// Sale date (YYYY-MM-DD)
    pub disposal_date: NaiveDate,
    /// Cost of acquisition in rupees
    pub purchase_price: Decimal,
    /// Sale consideration in rupees
    pub sale_price: Decimal,
    /// Transfer expenses in rupees (default 0)
    pub expenses: Option<Decimal>,
    /// Free text
    pub description: Option<String>,
}

impl TryFrom<DisposalRecord> for CapitalGainInput {
    type Error = TaxError;

    fn try_from(record: DisposalRecord) -> Result<Self, Self::Error> {
        let input = CapitalGainInput {
            asset_type: record.asset_type.parse()?,
            acquisition_date: record.acquisition_date,
            disposal_date: record.disposal_date,
            purchase_price: record.purchase_price,
            sale_price: record.sale_price,
            expenses: record.expenses.unwrap_or_default(),
            description: record.description.filter(|d| !d.is_empty()),
        };
        input.check()?;
        Ok(input)
    }
}

/// Read disposals from JSON (`{"disposals": [...]}`)
pub fn read_disposals_json<R: Read>(reader: R) -> anyhow::Result<Vec<CapitalGainInput>> {
    let input: DisposalInput = serde_json::from_reader(reader)?;
    for (i, disposal) in input.disposals.iter().enumerate() {
        disposal
            .check()
            .map_err(|e| anyhow::anyhow!("disposal {}: {}", i + 1, e))?;
    }
    Ok(input.disposals)
}

/// Read disposals from CSV with a header row
pub fn read_disposals_csv<R: Read>(reader: R) -> anyhow::Result<Vec<CapitalGainInput>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut disposals = Vec::new();
    for (row, record) in rdr.deserialize::<DisposalRecord>().enumerate() {
        let record = record.map_err(|e| anyhow::anyhow!("row {}: {}", row + 1, e))?;
        let input = CapitalGainInput::try_from(record)
            .map_err(|e| anyhow::anyhow!("row {}: {}", row + 1, e))?;
        disposals.push(input);
    }
    Ok(disposals)
}
