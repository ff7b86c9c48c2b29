//! Coorte CLI binary entrypoint.
//!
//! Dollar-cost-averaging backtests over historical daily closing prices.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use coorte_cli::{ingest, report, runner};
use coorte_core::api::YahooClient;
use coorte_core::config::Config;
use coorte_core::types::BacktestRequest;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "coorte",
    about = "Dollar-cost-averaging backtests over daily closing prices",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single backtest from command-line parameters.
    Run {
        /// Ticker in provider format (e.g. PETR4.SA, AAPL).
        #[arg(long)]
        ticker: String,
        /// First simulation day (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
        /// Last simulation day (YYYY-MM-DD).
        #[arg(long)]
        end: NaiveDate,
        /// Amount contributed each month.
        #[arg(long)]
        amount: f64,
        /// Print the full evolution table.
        #[arg(long)]
        evolution: bool,
    },
    /// Run every request row of a CSV batch file.
    Batch {
        /// CSV file with ticker,start_date,end_date,monthly_amount columns.
        file: PathBuf,
    },
    /// Extract parameters from a labelled text sheet and run the backtest.
    Extract {
        /// Parameter sheet with ticker, start/end date and amount fields.
        file: PathBuf,
        /// Print the full evolution table.
        #[arg(long)]
        evolution: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coorte_cli=info,coorte_core=info,backtester=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = YahooClient::new(config.provider.base_url.clone(), config.provider.timeout_secs);

    match cli.command {
        Command::Run {
            ticker,
            start,
            end,
            amount,
            evolution,
        } => {
            let request = BacktestRequest::new(ticker, start, end, amount);
            let outcome = runner::execute(&client, &request).await?;
            present_outcome(&outcome, evolution, &config, "manual")?;
        }
        Command::Batch { file } => {
            let batch_file = ingest::read_csv_requests(&file)?;
            for (row, error) in &batch_file.row_errors {
                warn!(row = row, error = %error, "Skipping unparsable CSV row");
            }

            let mut batch = runner::run_batch(&client, &batch_file.requests).await;
            batch.totals.failed += batch_file.row_errors.len();

            for outcome in &batch.outcomes {
                let path = report::report_path(&config.report.output_dir, &outcome.request);
                report::write_report(
                    &path,
                    &report::render_full_report("batch", &outcome.request, &outcome.summary),
                )?;
                info!(ticker = %outcome.request.ticker, path = %path.display(), "Report written");
            }

            println!("{}", report::render_batch_totals(&batch.totals));
        }
        Command::Extract { file, evolution } => {
            let text = std::fs::read_to_string(&file)?;
            let request = ingest::extract_request(&text)?;
            info!(
                ticker = %request.ticker,
                start = %request.start,
                end = %request.end,
                "Extracted parameters from sheet"
            );
            let outcome = runner::execute(&client, &request).await?;
            present_outcome(&outcome, evolution, &config, "sheet")?;
        }
    }

    Ok(())
}

fn present_outcome(
    outcome: &runner::RunOutcome,
    show_evolution: bool,
    config: &Config,
    mode: &str,
) -> Result<()> {
    println!("{}", report::render_simple_report(&outcome.summary));
    println!("Return: {:.2}%", outcome.summary.return_pct);

    if show_evolution {
        println!("{}", report::render_evolution_table(&outcome.evolution));
    }

    let path = report::report_path(&config.report.output_dir, &outcome.request);
    report::write_report(
        &path,
        &report::render_full_report(mode, &outcome.request, &outcome.summary),
    )?;
    info!(path = %path.display(), "Report written");

    Ok(())
}
