use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

mod aggregate;
mod config;
mod error;
mod ingest;
mod layout;
mod models;
mod report;

use aggregate::RecordFilter;
use config::{PageGeometry, Thresholds};
use models::Tier;

#[derive(Parser)]
#[command(name = "immunization-coverage-report")]
#[command(about = "Unit coverage summaries and paginated reports from immunization records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    facility: Option<String>,
    /// May be given multiple times; no occurrences means all doses.
    #[arg(long = "dose")]
    doses: Vec<u32>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn into_filter(self) -> RecordFilter {
        RecordFilter {
            district: self.district,
            facility: self.facility,
            doses: self.doses,
            due_from: self.from,
            due_to: self.to,
        }
    }
}

#[derive(Args)]
struct ThresholdArgs {
    /// Ratio at or above which a unit is on target (GREEN).
    #[arg(long, default_value_t = 90.0)]
    target: f64,
    /// Ratio below which a unit is critical (RED).
    #[arg(long, default_value_t = 70.0)]
    floor: f64,
}

impl ThresholdArgs {
    fn into_thresholds(self) -> anyhow::Result<Thresholds> {
        Ok(Thresholds::new(self.floor, self.target)?)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RatioOrder {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize completion per unit
    Summarize {
        #[arg(long)]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long, value_enum)]
        sort_ratio: Option<RatioOrder>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Roll units up to facilities and flag the at-risk ones
    Facilities {
        #[arg(long)]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        /// Show only facilities with at least one RED unit, worst first
        #[arg(long)]
        at_risk_only: bool,
        #[arg(long)]
        json: bool,
    },
    /// Write a paginated fixed-width report document
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        /// Render the at-risk facility view instead of the unit summary
        #[arg(long)]
        at_risk: bool,
        #[arg(long, default_value = "Immunization Coverage Report")]
        title: String,
        #[arg(long, default_value = "report.txt")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            csv,
            filter,
            thresholds,
            sort_ratio,
            limit,
            json,
        } => {
            let thresholds = thresholds.into_thresholds()?;
            let outcome = ingest::load_records(&csv)?;
            let mut summaries = aggregate::summarize_units(&outcome.records, &filter.into_filter());
            if let Some(order) = sort_ratio {
                aggregate::sort_by_ratio(&mut summaries, matches!(order, RatioOrder::Asc));
            }
            summaries.truncate(limit);

            if outcome.skipped > 0 {
                eprintln!("Skipped {} rows without a due date.", outcome.skipped);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }
            if summaries.is_empty() {
                println!("No records match the given filters.");
                return Ok(());
            }
            for summary in &summaries {
                println!(
                    "- {} / {} / {}: {}/{} ({:.2}%) {}",
                    summary.district,
                    summary.facility,
                    summary.unit,
                    summary.completed,
                    summary.target,
                    summary.ratio,
                    Tier::classify(summary.ratio, &thresholds).label()
                );
            }
        }
        Commands::Facilities {
            csv,
            filter,
            thresholds,
            at_risk_only,
            json,
        } => {
            let thresholds = thresholds.into_thresholds()?;
            let outcome = ingest::load_records(&csv)?;
            let summaries = aggregate::summarize_units(&outcome.records, &filter.into_filter());
            let rollup = aggregate::summarize_facilities(&summaries, &thresholds);
            let facilities = if at_risk_only {
                aggregate::at_risk_facilities(&rollup)
            } else {
                rollup
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&facilities)?);
                return Ok(());
            }
            if facilities.is_empty() {
                println!("No facilities to show.");
                return Ok(());
            }
            for facility in &facilities {
                println!(
                    "- {} / {}: {} red, {} yellow, {} green of {} units{}",
                    facility.district,
                    facility.facility,
                    facility.red,
                    facility.yellow,
                    facility.green,
                    facility.total_units,
                    if facility.at_risk() { " [AT RISK]" } else { "" }
                );
            }
        }
        Commands::Report {
            csv,
            filter,
            thresholds,
            at_risk,
            title,
            out,
        } => {
            let thresholds = thresholds.into_thresholds()?;
            let geometry = PageGeometry::a4_landscape();

            let outcome = ingest::load_records(&csv)?;
            let summaries = aggregate::summarize_units(&outcome.records, &filter.into_filter());
            let table = if at_risk {
                let rollup = aggregate::summarize_facilities(&summaries, &thresholds);
                report::at_risk_table(&aggregate::at_risk_facilities(&rollup))?
            } else {
                report::unit_summary_table(&summaries, &thresholds)?
            };

            let document = report::render_document(&title, &table, &geometry);
            std::fs::write(&out, document)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
