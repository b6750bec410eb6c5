//! Validate command - report every structural problem in the slab and CII tables

use crate::cmd::TableArgs;
use crate::core::CiiTable;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    table: &'static str,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    slab_table_digest: String,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self, tables: &TableArgs) -> anyhow::Result<()> {
        let slabs = tables.slab_table()?;
        let cii_entries = tables.cii_entries()?;

        let issues: Vec<ValidationIssue> = slabs
            .check()
            .into_iter()
            .map(|e| ValidationIssue {
                table: "slabs",
                message: e.to_string(),
            })
            .chain(
                CiiTable::check_entries(&cii_entries)
                    .into_iter()
                    .map(|e| ValidationIssue {
                        table: "cii",
                        message: e.to_string(),
                    }),
            )
            .collect();

        if self.json {
            let output = ValidationOutput {
                slab_table_digest: slabs.digest(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_text(&issues, &slabs.digest());
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue], digest: &str) {
        println!();
        println!("VALIDATION RESULTS (slab table {})", digest);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();
            for (i, issue) in issues.iter().enumerate() {
                println!("  {}. [{}] {}", i + 1, issue.table, issue.message);
            }
        }
        println!();
    }
}
