//! Schema command - print expected input formats

use crate::core::{DisposalInput, DisposalRecord, SlabTable, TaxSummaryInput};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-summary")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for summary input
    JsonSummary,
    /// JSON Schema for a disposals file
    JsonGains,
    /// JSON Schema for a slab table override
    JsonSlabs,
    /// CSV header row for a disposals file
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSummary => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(TaxSummaryInput))?)
            }
            SchemaFormat::JsonGains => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(DisposalInput))?)
            }
            SchemaFormat::JsonSlabs => {
                println!("{}", serde_json::to_string_pretty(&schema_for!(SlabTable))?)
            }
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
        Ok(())
    }

    fn print_csv_header(&self) {
        let names: Vec<&str> = DisposalRecord::csv_columns()
            .iter()
            .map(|column| column.name)
            .collect();
        println!("{}", names.join(","));
    }

    fn print_csv_fields(&self) {
        println!("CSV Input Format");
        println!("================");
        println!();
        for column in DisposalRecord::csv_columns() {
            let req = if column.required { "required" } else { "optional" };
            println!("{:20} ({:8})  {}", column.name, req, column.description);
        }
        println!();
        println!("Amounts are in rupees; dates are YYYY-MM-DD");
    }
}
