//! Request types shared by the ingestion surfaces.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters for one backtest run.
///
/// Built by the CLI, CSV and parameter-sheet ingestion paths, then validated
/// once before any data is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Ticker in provider format (e.g. "PETR4.SA", "AAPL").
    pub ticker: String,
    /// First simulation day (inclusive).
    pub start: NaiveDate,
    /// Last simulation day (inclusive).
    pub end: NaiveDate,
    /// Fixed amount contributed each month.
    pub monthly_amount: f64,
}

impl BacktestRequest {
    pub fn new(ticker: impl Into<String>, start: NaiveDate, end: NaiveDate, monthly_amount: f64) -> Self {
        Self {
            ticker: ticker.into(),
            start,
            end,
            monthly_amount,
        }
    }

    /// Reject unusable parameters before any schedule or price work happens.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(Error::InvalidParameter {
                message: "ticker must not be empty".to_string(),
            });
        }
        if !self.monthly_amount.is_finite() || self.monthly_amount <= 0.0 {
            return Err(Error::InvalidParameter {
                message: format!(
                    "monthly contribution must be positive, got {}",
                    self.monthly_amount
                ),
            });
        }
        if self.start > self.end {
            return Err(Error::NoContributions {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let request = BacktestRequest::new("PETR4.SA", date(2015, 9, 8), date(2018, 9, 10), 500.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_empty_ticker_rejected() {
        let request = BacktestRequest::new("  ", date(2020, 1, 1), date(2020, 12, 31), 100.0);
        assert!(matches!(
            request.validate(),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [0.0, -5.0, f64::NAN] {
            let request = BacktestRequest::new("AAPL", date(2020, 1, 1), date(2020, 12, 31), amount);
            assert!(matches!(
                request.validate(),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let request = BacktestRequest::new("AAPL", date(2020, 3, 10), date(2020, 3, 5), 100.0);
        assert!(matches!(
            request.validate(),
            Err(Error::NoContributions { .. })
        ));
    }
}
