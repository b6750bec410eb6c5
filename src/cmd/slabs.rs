//! Slabs command - list slab rates, surcharge bands and cess for a year

use crate::cmd::{format_inr, format_rate, TableArgs};
use crate::core::{AgeCategory, AssessmentYear, RegimeKind, TaxRegime};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SlabsCommand {
    /// Assessment year (e.g. 2025-26); latest when omitted
    #[arg(short, long)]
    year: Option<AssessmentYear>,

    /// Only show one regime
    #[arg(short, long)]
    regime: Option<RegimeKind>,

    /// Age in years or a category (below_sixty, senior, super_senior)
    #[arg(long)]
    age: Option<AgeCategory>,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SlabsOutput<'a> {
    assessment_year: AssessmentYear,
    age: AgeCategory,
    slab_table_digest: String,
    regimes: Vec<&'a TaxRegime>,
}

#[derive(Debug, Tabled)]
struct SlabRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl SlabsCommand {
    pub fn exec(&self, tables: &TableArgs) -> anyhow::Result<()> {
        let slabs = tables.load()?.slabs;
        let year = match self.year {
            Some(year) => year,
            None => slabs
                .latest_year()
                .ok_or_else(|| anyhow::anyhow!("slab table has no years"))?,
        };
        let age = self.age.unwrap_or_default();
        let regimes: Vec<&TaxRegime> = slabs
            .year(year)?
            .regimes
            .iter()
            .filter(|r| self.regime.is_none_or(|kind| r.kind == kind))
            .collect();
        if regimes.is_empty() {
            anyhow::bail!("No matching regime for assessment year {}", year);
        }

        if self.json {
            let output = SlabsOutput {
                assessment_year: year,
                age,
                slab_table_digest: slabs.digest(),
                regimes,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!("TAX SLABS (AY {}, {})", year, age.display());
        for regime in regimes {
            print_regime(regime, age);
        }
        println!();
        println!("Slab table {}", slabs.digest());
        println!();
        Ok(())
    }
}

fn print_regime(regime: &TaxRegime, age: AgeCategory) {
    println!();
    if regime.is_default {
        println!("{} (default)", regime.name);
    } else {
        println!("{}", regime.name);
    }

    let rows: Vec<SlabRow> = regime
        .slabs_for(age)
        .iter()
        .map(|slab| SlabRow {
            from: format_inr(slab.income_from),
            to: slab.income_to.map_or("-".to_string(), format_inr),
            rate: format_rate(slab.tax_rate),
        })
        .collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);

    println!(
        "  Standard deduction: {} | Cess: {}",
        format_inr(regime.standard_deduction),
        format_rate(regime.cess)
    );
    if regime.surcharge.is_empty() {
        println!("  Surcharge: none");
    } else {
        let bands: Vec<String> = regime
            .surcharge
            .iter()
            .map(|band| format!("{} from {}", format_rate(band.rate), format_inr(band.threshold)))
            .collect();
        println!("  Surcharge: {}", bands.join(", "));
    }
    if !regime.deductions.is_empty() {
        println!("  Deductions: {}", regime.deductions.join(", "));
    }
}
