//! Report rendering and currency formatting.
//!
//! The simulation core carries full-precision values; every rounding and
//! formatting decision lives here.

use std::path::{Path, PathBuf};

use backtester::{EvolutionRecord, SummaryMetrics};
use coorte_core::types::BacktestRequest;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::runner::BatchTotals;

const RULE_HEAVY: &str =
    "============================================================";
const RULE_LIGHT: &str =
    "------------------------------------------------------------";

/// Format a monetary value as Brazilian reais ("R$ 1.234,56").
pub fn format_brl(value: f64) -> String {
    let rounded = Decimal::from_f64(value).unwrap_or_default().round_dp(2);
    let formatted = format!("{:.2}", rounded.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac}")
}

/// Full report: parameters plus the final summary.
pub fn render_full_report(mode: &str, request: &BacktestRequest, summary: &SummaryMetrics) -> String {
    format!(
        "{RULE_HEAVY}\n\
         \x20               COMPLETE BACKTEST REPORT\n\
         {RULE_HEAVY}\n\
         \n\
         Parameters\n\
         - Mode: {mode}\n\
         - Ticker: {ticker}\n\
         - Start date: {start}\n\
         - End date: {end}\n\
         - Monthly contribution: {amount}\n\
         {RULE_LIGHT}\n\
         FINAL SUMMARY\n\
         - Final value: {final_value}\n\
         - Total invested: {invested}\n\
         - Gross profit: {profit}\n\
         - Return: {return_pct:.2}%\n\
         {RULE_HEAVY}\n",
        mode = mode,
        ticker = request.ticker,
        start = request.start,
        end = request.end,
        amount = format_brl(request.monthly_amount),
        final_value = format_brl(summary.final_value),
        invested = format_brl(summary.total_invested),
        profit = format_brl(summary.gross_profit),
        return_pct = summary.return_pct,
    )
}

/// Simple report: final value and contributed capital only.
pub fn render_simple_report(summary: &SummaryMetrics) -> String {
    format!(
        "{RULE_HEAVY}\n\
         \x20               SIMPLE BACKTEST REPORT\n\
         {RULE_HEAVY}\n\
         FINAL SUMMARY\n\
         - Final value: {final_value}\n\
         - Total invested: {invested}\n\
         {RULE_HEAVY}\n",
        final_value = format_brl(summary.final_value),
        invested = format_brl(summary.total_invested),
    )
}

/// Batch totals block, printed after every row has run.
pub fn render_batch_totals(totals: &BatchTotals) -> String {
    format!(
        "{RULE_HEAVY}\n\
         \x20               BATCH TOTALS\n\
         {RULE_HEAVY}\n\
         - Completed runs: {completed}\n\
         - Failed runs: {failed}\n\
         - Final value: {final_value}\n\
         - Total invested: {invested}\n\
         - Gross profit: {profit}\n\
         {RULE_HEAVY}\n",
        completed = totals.completed,
        failed = totals.failed,
        final_value = format_brl(totals.final_value),
        invested = format_brl(totals.total_invested),
        profit = format_brl(totals.gross_profit),
    )
}

/// Evolution table for stdout.
pub fn render_evolution_table(evolution: &[EvolutionRecord]) -> String {
    let mut out = String::from("date          total invested     portfolio value\n");
    for record in evolution {
        out.push_str(&format!(
            "{}  {:>18}  {:>18}\n",
            record.date,
            format_brl(record.total_invested),
            format_brl(record.portfolio_value),
        ));
    }
    out
}

/// Report file path for one run, keyed by ticker and start date.
pub fn report_path(dir: &Path, request: &BacktestRequest) -> PathBuf {
    dir.join(format!("report_{}_{}.txt", request.ticker, request.start))
}

/// Write a rendered report to disk.
pub fn write_report(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
