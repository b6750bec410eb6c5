//! Summary command - both regimes side by side and the year's payable or refund

use crate::cmd::{format_inr, read_input, TableArgs};
use crate::core::{read_summary_input_json, RegimeKind};
use crate::tax::summary::{calculate_tax_summary, RegimeComputation, TaxSummary};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Summary input JSON. Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Regime to settle the year under, overriding the input file
    #[arg(short, long)]
    regime: Option<RegimeKind>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SummaryOutput<'a> {
    #[serde(flatten)]
    summary: &'a TaxSummary,
    slab_table_digest: String,
}

#[derive(Debug, Tabled)]
struct ComparisonRow {
    #[tabled(rename = "")]
    item: &'static str,
    #[tabled(rename = "Old Regime")]
    old: String,
    #[tabled(rename = "New Regime")]
    new: String,
}

#[derive(Debug, Tabled)]
struct DeductionRow {
    #[tabled(rename = "Section")]
    section: &'static str,
    #[tabled(rename = "Claimed")]
    claimed: String,
    #[tabled(rename = "Allowed")]
    allowed: String,
}

impl SummaryCommand {
    pub fn exec(&self, tables: &TableArgs) -> anyhow::Result<()> {
        let tables = tables.load()?;
        let mut input = read_summary_input_json(read_input(&self.file)?.as_slice())?;
        if self.regime.is_some() {
            input.regime = self.regime;
        }
        let summary = calculate_tax_summary(&input, &tables.slabs)?;

        if self.json {
            let output = SummaryOutput {
                summary: &summary,
                slab_table_digest: tables.slabs.digest(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_summary(&summary, &tables.slabs.digest());
        }
        Ok(())
    }

    fn print_summary(&self, summary: &TaxSummary, digest: &str) {
        println!();
        println!(
            "TAX SUMMARY (AY {}, FY {}, {})",
            summary.assessment_year,
            summary.assessment_year.financial_year(),
            summary.age.display()
        );
        println!();

        let old = &summary.old_regime;
        let new = &summary.new_regime;
        let line = |item, pick: fn(&RegimeComputation) -> Decimal| ComparisonRow {
            item,
            old: format_inr(pick(old)),
            new: format_inr(pick(new)),
        };
        let rows = vec![
            line("Gross total income", |r| r.gross_total_income),
            line("Standard deduction", |r| r.standard_deduction),
            line("Other deductions", |r| r.chapter_via_deductions),
            line("Taxable income", |r| r.taxable_income),
            line("Tax on slabs", |r| r.base_tax),
            line("Surcharge", |r| r.surcharge),
            line("Cess", |r| r.cess),
            line("Total tax", |r| r.total_tax),
        ];
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        let deductions: Vec<DeductionRow> = summary
            .deductions
            .iter()
            .filter(|d| !d.claimed.is_zero())
            .map(|d| DeductionRow {
                section: d.section,
                claimed: format_inr(d.claimed),
                allowed: format_inr(d.allowed),
            })
            .collect();
        if !deductions.is_empty() {
            println!("OLD REGIME DEDUCTIONS");
            let table = Table::new(deductions)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();
        }

        println!(
            "Recommended: {} regime (saves {})",
            summary.recommended_regime,
            format_inr(summary.savings)
        );
        println!("Selected:    {}", summary.selected().name);
        println!();
        println!("  Tax liability: {}", format_inr(summary.total_tax_liability));
        println!("  Tax paid:      {}", format_inr(summary.total_tax_paid));
        if summary.refund_due > Decimal::ZERO {
            println!("  Refund due:    {}", format_inr(summary.refund_due));
        } else {
            println!("  Tax payable:   {}", format_inr(summary.tax_payable));
        }

        if !summary.warnings.is_empty() {
            println!();
            println!("\u{26A0} {} warning(s):", summary.warnings.len());
            for warning in &summary.warnings {
                println!("  {}", warning);
            }
        }
        println!();
        println!("Slab table {}", digest);
        println!();
    }
}
