//! Market data provider clients.

pub mod yahoo;

pub use yahoo::YahooClient;

use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Source of daily closing prices for a symbol over a date range.
///
/// The simulation pipeline only depends on this trait, so tests can swap in
/// a canned provider instead of hitting the network.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch daily closes in [start, end] inclusive, ascending by date.
    ///
    /// An empty Vec means the provider has no data for the symbol/range; the
    /// caller decides whether that is an error.
    async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>>;
}
