//! Backtest run orchestration.
//!
//! Drives one request through fetch → series → simulation → summary, and
//! batches of requests strictly sequentially with per-row failure isolation.

use backtester::{EvolutionRecord, PortfolioSimulator, PriceSeries, SummaryMetrics};
use coorte_core::api::PriceProvider;
use coorte_core::types::BacktestRequest;
use coorte_core::{Error, Result};
use tracing::{error, info};

/// Everything the presentation layer needs from one completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub request: BacktestRequest,
    pub evolution: Vec<EvolutionRecord>,
    pub summary: SummaryMetrics,
}

/// Batch totals, folded only from runs that completed.
#[derive(Debug, Default)]
pub struct BatchTotals {
    pub final_value: f64,
    pub total_invested: f64,
    pub gross_profit: f64,
    pub completed: usize,
    pub failed: usize,
}

impl BatchTotals {
    fn fold(&mut self, summary: &SummaryMetrics) {
        self.final_value += summary.final_value;
        self.total_invested += summary.total_invested;
        self.gross_profit += summary.gross_profit;
        self.completed += 1;
    }
}

/// Per-row outcomes of a batch run plus the folded totals.
#[derive(Debug, Default)]
pub struct BatchRun {
    pub outcomes: Vec<RunOutcome>,
    pub failures: Vec<(String, Error)>,
    pub totals: BatchTotals,
}

/// Execute a single backtest request end to end.
pub async fn execute(provider: &dyn PriceProvider, request: &BacktestRequest) -> Result<RunOutcome> {
    request.validate()?;

    info!(
        ticker = %request.ticker,
        start = %request.start,
        end = %request.end,
        amount = request.monthly_amount,
        "Fetching daily closes"
    );
    let closes = provider
        .daily_closes(&request.ticker, request.start, request.end)
        .await?;

    let series = PriceSeries::from_points(closes.iter().map(|c| (c.date, c.close)));
    if series.is_empty() {
        return Err(Error::EmptyData {
            symbol: request.ticker.clone(),
            start: request.start,
            end: request.end,
        });
    }

    let simulator = PortfolioSimulator::new(request.monthly_amount);
    let evolution = simulator.simulate(&series, request.start, request.end)?;
    if evolution.is_empty() {
        return Err(Error::NoContributions {
            start: request.start,
            end: request.end,
        });
    }

    let summary = SummaryMetrics::summarize(&evolution)?;
    info!(
        ticker = %request.ticker,
        contributions = evolution.len(),
        final_value = summary.final_value,
        return_pct = summary.return_pct,
        "Backtest completed"
    );

    Ok(RunOutcome {
        request: request.clone(),
        evolution,
        summary,
    })
}

/// Run a batch of requests sequentially.
///
/// Each row is an isolated simulation: a failure is logged and recorded,
/// never aborting the remaining rows. Totals are folded only after a row
/// completes.
pub async fn run_batch(provider: &dyn PriceProvider, requests: &[BacktestRequest]) -> BatchRun {
    let mut batch = BatchRun::default();

    for request in requests {
        match execute(provider, request).await {
            Ok(outcome) => {
                batch.totals.fold(&outcome.summary);
                batch.outcomes.push(outcome);
            }
            Err(e) => {
                error!(ticker = %request.ticker, error = %e, "Backtest failed");
                batch.totals.failed += 1;
                batch.failures.push((request.ticker.clone(), e));
            }
        }
    }

    info!(
        completed = batch.totals.completed,
        failed = batch.totals.failed,
        "Batch finished"
    );

    batch
}
