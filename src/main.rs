mod cmd;
mod core;
mod tax;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "itaxc",
    version,
    about = "Indian income tax and capital gains calculator"
)]
struct Cli {
    #[command(flatten)]
    tables: cmd::TableArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capital gains tax on a single disposal or a file of disposals
    Gains(cmd::gains::GainsCommand),
    /// Compare the old and new regimes and settle the year against taxes paid
    Summary(cmd::summary::SummaryCommand),
    /// List slab rates, surcharge and cess for an assessment year
    Slabs(cmd::slabs::SlabsCommand),
    /// List cost inflation indices or index a cost
    Cii(cmd::cii::CiiCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// Check the slab and CII tables for structural problems
    Validate(cmd::validate::ValidateCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Gains(c) => c.exec(&cli.tables),
        Command::Summary(c) => c.exec(&cli.tables),
        Command::Slabs(c) => c.exec(&cli.tables),
        Command::Cii(c) => c.exec(&cli.tables),
        Command::Schema(c) => c.exec(),
        Command::Validate(c) => c.exec(&cli.tables),
    }
}
