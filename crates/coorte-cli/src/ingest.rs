//! Request ingestion from CSV batch files and labelled text parameter sheets.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use coorte_core::types::BacktestRequest;
use coorte_core::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// One row of a CSV batch file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    ticker: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    monthly_amount: f64,
}

/// Parsed batch file: usable requests plus the rows that failed to parse.
#[derive(Debug, Default)]
pub struct BatchFile {
    pub requests: Vec<BacktestRequest>,
    /// 1-based data row numbers that failed to parse, with the cause.
    pub row_errors: Vec<(usize, Error)>,
}

/// Read a CSV batch file with `ticker,start_date,end_date,monthly_amount`
/// columns. A malformed row is recorded and skipped, not a file-level error;
/// request validation itself happens later, per row, inside the batch run.
pub fn read_csv_requests(path: &Path) -> anyhow::Result<BatchFile> {
    let file = File::open(path)?;
    Ok(parse_csv(file))
}

fn parse_csv<R: io::Read>(reader: R) -> BatchFile {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut batch = BatchFile::default();

    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => batch.requests.push(BacktestRequest::new(
                row.ticker,
                row.start_date,
                row.end_date,
                row.monthly_amount,
            )),
            Err(e) => batch.row_errors.push((
                index + 1,
                Error::InvalidParameter {
                    message: format!("CSV row {}: {}", index + 1, e),
                },
            )),
        }
    }

    debug!(
        requests = batch.requests.len(),
        row_errors = batch.row_errors.len(),
        "Parsed CSV batch file"
    );
    batch
}

// Pattern lists per field, tried in order; the first capture wins. The sheet
// format comes from the original parameter documents, so Portuguese labels
// are accepted alongside English ones.

const TICKER_PATTERNS: &[&str] = &[r"tick(?:er|et)\s*[:\s]\s*([\w.^=-]+)"];

const START_DATE_PATTERNS: &[&str] = &[
    r"data\s+de\s+in[ií]cio\s*[:\s]*([\d\s-]+)",
    r"data\s+inicial\s*[:\s]*([\d\s-]+)",
    r"start\s+date\s*[:\s]*([\d\s-]+)",
];

const END_DATE_PATTERNS: &[&str] = &[
    r"data\s+final\s*[:\s]*([\d\s-]+)",
    r"end\s+date\s*[:\s]*([\d\s-]+)",
];

const AMOUNT_PATTERNS: &[&str] = &[
    r"aporte\s*\(R\$\)\s*[:\s]*(\d+[.,]?\d*)",
    r"aporte\s*mensal\s*.*?(\d+[.,]?\d*)",
    r"aporte\s*.*?(\d+[.,]?\d*)",
    r"monthly\s+amount\s*[:\s]*(\d+[.,]?\d*)",
    r"monthly\s+contribution\s*[:\s]*(\d+[.,]?\d*)",
];

/// Extract a backtest request from a labelled text parameter sheet.
pub fn extract_request(text: &str) -> Result<BacktestRequest> {
    let ticker = extract_field(TICKER_PATTERNS, text)
        .ok_or_else(|| missing_field("ticker"))?;
    let start = extract_field(START_DATE_PATTERNS, text)
        .and_then(|raw| parse_date(&raw))
        .ok_or_else(|| missing_field("start date"))?;
    let end = extract_field(END_DATE_PATTERNS, text)
        .and_then(|raw| parse_date(&raw))
        .ok_or_else(|| missing_field("end date"))?;
    let amount = extract_field(AMOUNT_PATTERNS, text)
        .and_then(|raw| parse_amount(&raw))
        .ok_or_else(|| missing_field("monthly amount"))?;

    Ok(BacktestRequest::new(ticker, start, end, amount))
}

fn missing_field(field: &str) -> Error {
    Error::InvalidParameter {
        message: format!("parameter sheet is missing the {field} field"),
    }
}

fn extract_field(patterns: &[&str], text: &str) -> Option<String> {
    for pattern in patterns {
        let re = Regex::new(&format!("(?is){pattern}")).expect("static pattern");
        if let Some(captures) = re.captures(text) {
            return Some(captures[1].trim().to_string());
        }
    }
    None
}

/// Parse an amount that may use a comma decimal separator ("500,00").
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', ".").replace(' ', "");
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}

/// Parse an ISO date, tolerating interior whitespace ("2015 - 09 - 08").
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned.parse().ok()
}
