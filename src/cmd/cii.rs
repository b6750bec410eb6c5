//! CII command - list cost inflation indices or index a cost

use crate::cmd::{format_inr, TableArgs};
use crate::core::cii::{indexed_cost, FALLBACK_INDEX};
use crate::core::{check_amount, FinancialYear};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CiiCommand {
    /// Cost of acquisition to index
    #[arg(long, requires_all = ["purchase_year", "sale_year"])]
    cost: Option<Decimal>,

    /// Financial year of purchase (e.g. 2015-16)
    #[arg(long)]
    purchase_year: Option<FinancialYear>,

    /// Financial year of sale (e.g. 2023-24)
    #[arg(long)]
    sale_year: Option<FinancialYear>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct IndexedCostOutput {
    cost: Decimal,
    purchase_year: FinancialYear,
    purchase_index: u32,
    sale_year: FinancialYear,
    sale_index: u32,
    indexed_cost: Decimal,
}

#[derive(Debug, Tabled)]
struct IndexRow {
    #[tabled(rename = "Financial Year")]
    year: FinancialYear,
    #[tabled(rename = "Index")]
    index: u32,
}

impl CiiCommand {
    pub fn exec(&self, tables: &TableArgs) -> anyhow::Result<()> {
        let cii = tables.load()?.cii;

        if let (Some(cost), Some(purchase_year), Some(sale_year)) =
            (self.cost, self.purchase_year, self.sale_year)
        {
            let cost = check_amount("cost", cost)?;
            let output = IndexedCostOutput {
                cost,
                purchase_year,
                purchase_index: cii.get(purchase_year).unwrap_or(FALLBACK_INDEX),
                sale_year,
                sale_index: cii.get(sale_year).unwrap_or(FALLBACK_INDEX),
                indexed_cost: indexed_cost(cost, purchase_year, sale_year, &cii),
            };
            if self.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "{} indexed from FY {} ({}) to FY {} ({}): {}",
                    format_inr(output.cost),
                    output.purchase_year,
                    output.purchase_index,
                    output.sale_year,
                    output.sale_index,
                    format_inr(output.indexed_cost)
                );
            }
            return Ok(());
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&cii)?);
            return Ok(());
        }

        let rows: Vec<IndexRow> = cii
            .iter()
            .map(|(year, index)| IndexRow { year, index })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
