pub mod cii;
pub mod gains;
pub mod schema;
pub mod slabs;
pub mod summary;
pub mod validate;

use crate::core::{CiiTable, FinancialYear, SlabTable};
use clap::Args;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Table overrides accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// JSON slab table to use instead of the built-in one
    #[arg(long = "slabs", global = true, value_name = "FILE")]
    pub slabs_file: Option<PathBuf>,

    /// JSON cost inflation index table, e.g. {"2015-16": 254}
    #[arg(long = "cii", global = true, value_name = "FILE")]
    pub cii_file: Option<PathBuf>,
}

/// Tables a computation runs against
#[derive(Debug, Clone)]
pub struct Tables {
    pub slabs: SlabTable,
    pub cii: CiiTable,
}

impl TableArgs {
    /// Load and validate the tables, falling back to the built-in ones
    pub fn load(&self) -> anyhow::Result<Tables> {
        let slabs = self.slab_table()?;
        let issues = slabs.check();
        if let Some(first) = issues.first() {
            anyhow::bail!(
                "slab table has {} issue(s), first: {}. Run `itaxc validate` for the full list.",
                issues.len(),
                first
            );
        }
        let cii = match &self.cii_file {
            Some(path) => CiiTable::new(self.cii_entries_from(path)?)?,
            None => CiiTable::default(),
        };
        log::debug!("slab table digest {}", slabs.digest());
        Ok(Tables { slabs, cii })
    }

    /// Slab table without validation
    pub fn slab_table(&self) -> anyhow::Result<SlabTable> {
        match &self.slabs_file {
            Some(path) => {
                let table = serde_json::from_slice(&read_input(path)?)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
                Ok(table)
            }
            None => Ok(SlabTable::builtin()),
        }
    }

    /// Raw CII entries without validation
    pub fn cii_entries(&self) -> anyhow::Result<BTreeMap<FinancialYear, u32>> {
        match &self.cii_file {
            Some(path) => self.cii_entries_from(path),
            None => Ok(CiiTable::default().iter().collect()),
        }
    }

    fn cii_entries_from(&self, path: &Path) -> anyhow::Result<BTreeMap<FinancialYear, u32>> {
        serde_json::from_slice(&read_input(path)?)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }
}

/// Read a whole input file, or stdin when the path is "-"
pub fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        Ok(buffer)
    } else {
        fs::read(path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }
}

/// Rupees with Indian digit grouping, e.g. ₹12,34,567.00
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}₹{}.{}", sign, group_indian(whole), fraction)
}

/// Plain two-decimal amount for CSV and JSON output
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn indian_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹0.00");
        assert_eq!(format_inr(dec!(999)), "₹999.00");
        assert_eq!(format_inr(dec!(1000)), "₹1,000.00");
        assert_eq!(format_inr(dec!(150000)), "₹1,50,000.00");
        assert_eq!(format_inr(dec!(1234567.891)), "₹12,34,567.89");
        assert_eq!(format_inr(dec!(100000000)), "₹10,00,00,000.00");
    }

    #[test]
    fn negative_amounts() {
        assert_eq!(format_inr(dec!(-250000.5)), "-₹2,50,000.50");
        assert_eq!(format_inr(dec!(-0.001)), "₹0.00");
    }

    #[test]
    fn rates_drop_trailing_zeros() {
        assert_eq!(format_rate(dec!(30)), "30%");
        assert_eq!(format_rate(dec!(12.50)), "12.5%");
    }

    #[test]
    fn missing_override_uses_builtin_tables() {
        let tables = TableArgs::default().load().unwrap();
        assert_eq!(tables.slabs, SlabTable::builtin());
        assert_eq!(tables.cii, CiiTable::default());
    }
}
