//! Gains command - capital gains tax per disposal

use crate::cmd::{format_amount, format_inr, format_rate, read_input, TableArgs};
use crate::core::{
    check_amount, read_disposals_csv, read_disposals_json, AgeCategory, AssessmentYear, AssetType,
    CapitalGainInput, FinancialYear, RegimeKind, SlabTable,
};
use crate::tax::cgt::{
    calculate_gains, CapitalGainResult, CgtContext, CgtReport, GainType, OtherIncomeMode,
};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct GainsCommand {
    /// Disposals file, CSV or JSON by extension ("-" reads JSON from stdin)
    #[arg(short, long, conflicts_with_all = ["asset_type", "acquired", "disposed", "cost", "sale"])]
    file: Option<PathBuf>,

    /// Asset type of a single disposal: equity, debt, property or gold
    #[arg(long, requires_all = ["acquired", "disposed", "cost", "sale"])]
    asset_type: Option<AssetType>,

    /// Acquisition date (YYYY-MM-DD)
    #[arg(long)]
    acquired: Option<NaiveDate>,

    /// Disposal date (YYYY-MM-DD)
    #[arg(long)]
    disposed: Option<NaiveDate>,

    /// Purchase price in rupees
    #[arg(long)]
    cost: Option<Decimal>,

    /// Sale price in rupees
    #[arg(long)]
    sale: Option<Decimal>,

    /// Transfer expenses in rupees
    #[arg(long, default_value = "0")]
    expenses: Decimal,

    /// Assessment year for slab rates and surcharge (e.g. 2025-26). Defaults to
    /// the year of the latest disposal, or the latest year in the slab table.
    #[arg(short, long)]
    year: Option<AssessmentYear>,

    /// Regime for slab-rate gains; the year's default when omitted
    #[arg(short, long)]
    regime: Option<RegimeKind>,

    /// Age in years or a category (below_sixty, senior, super_senior)
    #[arg(long)]
    age: Option<AgeCategory>,

    /// Other taxable income for the year
    #[arg(long, default_value = "0")]
    other_income: Decimal,

    /// Stack short-term slab-rate gains on top of other income instead of
    /// applying its marginal rate
    #[arg(long)]
    include_other_income: bool,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct GainsOutput<'a> {
    assessment_year: AssessmentYear,
    regime: RegimeKind,
    slab_table_digest: String,
    disposals: &'a [CapitalGainResult],
    short_term: Totals,
    long_term: Totals,
    total: Totals,
}

#[derive(Debug, Serialize)]
struct Totals {
    disposal_count: usize,
    capital_gain: Decimal,
    taxable_gain: Decimal,
    total_tax: Decimal,
}

impl Totals {
    fn of(report: &CgtReport, gain_type: Option<GainType>) -> Self {
        Totals {
            disposal_count: report.disposal_count(gain_type),
            capital_gain: report.total_capital_gain(gain_type),
            taxable_gain: report.total_taxable_gain(gain_type),
            total_tax: report.total_tax(gain_type),
        }
    }
}

impl GainsCommand {
    pub fn exec(&self, tables: &TableArgs) -> anyhow::Result<()> {
        let tables = tables.load()?;
        let inputs = self.inputs()?;
        if inputs.is_empty() {
            anyhow::bail!("No disposals found");
        }

        let year = match self.year {
            Some(year) => year,
            None => default_year(&tables.slabs, &inputs)?,
        };
        let slabs_year = tables.slabs.year(year)?;
        let regime = match self.regime {
            Some(kind) => tables.slabs.regime(year, kind)?,
            None => slabs_year
                .default_regime()
                .ok_or_else(|| anyhow::anyhow!("assessment year {} has no default regime", year))?,
        };

        let ctx = CgtContext {
            regime,
            age: self.age.unwrap_or_default(),
            cii: &tables.cii,
            other_income: check_amount("other_income", self.other_income)?,
            mode: if self.include_other_income {
                OtherIncomeMode::Include
            } else {
                OtherIncomeMode::ApproximateMarginalRate
            },
        };
        let report = calculate_gains(&inputs, &ctx);

        if self.json {
            let output = GainsOutput {
                assessment_year: year,
                regime: regime.kind,
                slab_table_digest: tables.slabs.digest(),
                disposals: &report.results,
                short_term: Totals::of(&report, Some(GainType::ShortTerm)),
                long_term: Totals::of(&report, Some(GainType::LongTerm)),
                total: Totals::of(&report, None),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        } else if self.csv {
            self.write_csv(&report)
        } else {
            self.print_table(&report, year, regime.name.as_str());
            Ok(())
        }
    }

    fn inputs(&self) -> anyhow::Result<Vec<CapitalGainInput>> {
        if let Some(path) = &self.file {
            let bytes = read_input(path)?;
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            return if is_csv {
                read_disposals_csv(bytes.as_slice())
            } else {
                read_disposals_json(bytes.as_slice())
            };
        }

        match (self.asset_type, self.acquired, self.disposed, self.cost, self.sale) {
            (Some(asset_type), Some(acquired), Some(disposed), Some(cost), Some(sale)) => {
                let input = CapitalGainInput {
                    asset_type,
                    acquisition_date: acquired,
                    disposal_date: disposed,
                    purchase_price: cost,
                    sale_price: sale,
                    expenses: self.expenses,
                    description: None,
                };
                input.check()?;
                Ok(vec![input])
            }
            _ => anyhow::bail!(
                "Provide --file, or --asset-type with --acquired, --disposed, --cost and --sale"
            ),
        }
    }

    fn print_table(&self, report: &CgtReport, year: AssessmentYear, regime: &str) {
        println!();
        println!("CAPITAL GAINS (AY {}, {})", year, regime);
        println!();

        let rows: Vec<GainRow> = report
            .results
            .iter()
            .enumerate()
            .map(|(i, r)| GainRow::new(i + 1, r, format_inr))
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();

        for (label, gain_type) in [
            ("Short term", Some(GainType::ShortTerm)),
            ("Long term", Some(GainType::LongTerm)),
            ("Total", None),
        ] {
            println!(
                "  {:10} {} disposal(s) | Gain: {} | Taxable: {} | Tax: {}",
                label,
                report.disposal_count(gain_type),
                format_inr(report.total_capital_gain(gain_type)),
                format_inr(report.total_taxable_gain(gain_type)),
                format_inr(report.total_tax(gain_type))
            );
        }

        let warnings: Vec<_> = report
            .results
            .iter()
            .enumerate()
            .flat_map(|(i, r)| r.warnings.iter().map(move |w| (i + 1, w)))
            .collect();
        if !warnings.is_empty() {
            println!();
            println!("\u{26A0} {} warning(s):", warnings.len());
            for (row, warning) in warnings {
                println!("  #{}: {}", row, warning);
            }
        }
        println!();
    }

    fn write_csv(&self, report: &CgtReport) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for (i, result) in report.results.iter().enumerate() {
            wtr.serialize(GainRow::new(i + 1, result, format_amount))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Assessment year of the latest disposal when the slab table covers it
fn default_year(slabs: &SlabTable, inputs: &[CapitalGainInput]) -> anyhow::Result<AssessmentYear> {
    let latest_disposal = inputs
        .iter()
        .map(|i| FinancialYear::from_date(i.disposal_date).assessment_year())
        .max();
    match latest_disposal {
        Some(year) if slabs.year(year).is_ok() => Ok(year),
        _ => slabs
            .latest_year()
            .ok_or_else(|| anyhow::anyhow!("slab table has no years")),
    }
}

/// Row for the gains table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
struct GainRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    row_num: usize,

    #[tabled(rename = "Asset")]
    asset_type: String,

    #[tabled(rename = "Acquired")]
    acquisition_date: String,

    #[tabled(rename = "Disposed")]
    disposal_date: String,

    #[tabled(rename = "Days")]
    holding_days: i64,

    #[tabled(rename = "Type")]
    gain_type: String,

    #[tabled(rename = "Cost")]
    cost: String,

    #[tabled(rename = "Indexed")]
    indexed: String,

    #[tabled(rename = "Sale")]
    sale_price: String,

    #[tabled(rename = "Gain")]
    capital_gain: String,

    #[tabled(rename = "Taxable")]
    taxable_gain: String,

    #[tabled(rename = "Rate")]
    tax_rate: String,

    #[tabled(rename = "Tax")]
    total_tax: String,
}

impl GainRow {
    fn new(row_num: usize, r: &CapitalGainResult, money: fn(Decimal) -> String) -> Self {
        GainRow {
            row_num,
            asset_type: r.asset_type.to_string(),
            acquisition_date: r.acquisition_date.format("%Y-%m-%d").to_string(),
            disposal_date: r.disposal_date.format("%Y-%m-%d").to_string(),
            holding_days: r.holding_days,
            gain_type: r.gain_type.to_string(),
            cost: money(r.indexed_cost),
            indexed: if r.indexation_applied { "yes" } else { "" }.to_string(),
            sale_price: money(r.sale_price),
            capital_gain: money(r.capital_gain),
            taxable_gain: money(r.taxable_gain),
            tax_rate: format_rate(r.tax_rate),
            total_tax: money(r.total_tax),
        }
    }
}
