//! Error types for the Coorte backtesting system.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Market data provider error: {message}")]
    Provider { message: String, status: Option<u16> },

    #[error("No price data for {symbol} between {start} and {end}")]
    EmptyData {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("No contributions possible between {start} and {end}")]
    NoContributions { start: NaiveDate, end: NaiveDate },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
