use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use saldo_ingest::IngestCache;
use std::path::PathBuf;

mod config;
mod llm;
mod report;

use report::Prepared;

#[derive(Parser, Debug)]
#[command(name = "saldo", version, about = "Personal finance dashboard over CSV exports")]
struct Cli {
    /// Config file (default: ./saldo.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV exports (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the dashboard: KPIs, monthly flow, categories, detail
    Report {
        /// Start of the date range (YYYY-MM-DD, default: earliest statement)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End of the date range (YYYY-MM-DD, default: latest statement)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Headline balance is the statement total alone, no netting
        #[arg(long)]
        cash_only: bool,

        /// Load only the bank statement source
        #[arg(long)]
        statements_only: bool,
    },

    /// Ask the configured model to summarize the totals in prose
    Insights {
        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        cfg.data_dir = dir;
    }

    let mut cache = IngestCache::new();

    match cli.command {
        Command::Report {
            from,
            to,
            cash_only,
            statements_only,
        } => {
            if cash_only {
                cfg.balance = config::BalanceMode::CashOnly;
            }
            if statements_only {
                cfg.include_secondary_sources = false;
            }

            match report::prepare(&mut cache, &cfg, from, to)? {
                Prepared::Ready(dash) => {
                    print_warnings(&dash.sources.warnings);
                    report::render(&dash, &cfg);
                }
                Prepared::NoData(warnings) => {
                    print_warnings(&warnings);
                    println!("{}", report::NO_DATA_GUIDANCE);
                }
            }
        }

        Command::Insights { from, to } => {
            let Some(api_key) = config::api_key() else {
                println!(
                    "Insights are hidden: set {} to enable them.",
                    config::API_KEY_VAR
                );
                return Ok(());
            };

            match report::prepare(&mut cache, &cfg, from, to)? {
                Prepared::Ready(dash) => {
                    print_warnings(&dash.sources.warnings);
                    let prompt = report::build_insights_prompt(&dash.totals, dash.range.end);
                    match llm::chat_complete(&cfg.llm.model, &api_key, &prompt).await {
                        Ok(text) => println!("{text}"),
                        // Service failures never take the dashboard down.
                        Err(e) => println!("insight unavailable: {e:#}"),
                    }
                }
                Prepared::NoData(warnings) => {
                    print_warnings(&warnings);
                    println!("{}", report::NO_DATA_GUIDANCE);
                }
            }
        }
    }

    Ok(())
}

fn print_warnings(warnings: &[saldo_ingest::IngestWarning]) {
    for w in warnings {
        eprintln!("warning: {w}");
    }
}
