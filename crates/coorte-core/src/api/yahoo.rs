//! Yahoo Finance chart API client.
//!
//! Fetches daily closing prices from the public v8 chart endpoint. Rows with
//! a missing close are dropped, so the output is already clean enough to
//! build a price series from.

use crate::api::{DailyClose, PriceProvider};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

/// Yahoo Finance API client for historical daily closes.
pub struct YahooClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl YahooClient {
    /// Default chart API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

    /// Maximum retry attempts for API calls.
    const MAX_RETRIES: u32 = 3;

    pub fn new(base_url: Option<String>, timeout_secs: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(timeout_secs))
            .connect_timeout(StdDuration::from_secs(10))
            // The chart endpoint rejects clients without a browser-like agent.
            .user_agent("Mozilla/5.0 (compatible; coorte/0.1)")
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            http_client,
        }
    }

    /// Execute an HTTP GET with retry and exponential backoff.
    ///
    /// Retries on 5xx server errors and 429 rate-limit responses (with a
    /// longer backoff for 429). All other 4xx errors fail immediately.
    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut last_error = None;

        for attempt in 0..Self::MAX_RETRIES {
            match self.http_client.get(url).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response)
                    if response.status().as_u16() == 429 || response.status().is_server_error() =>
                {
                    let status = response.status();
                    let is_rate_limited = status.as_u16() == 429;
                    warn!(
                        attempt = attempt + 1,
                        status = %status,
                        url = url,
                        rate_limited = is_rate_limited,
                        "Retryable provider error, backing off"
                    );
                    last_error = Some(Error::Provider {
                        message: format!(
                            "{}: {}",
                            if is_rate_limited {
                                "Rate limited"
                            } else {
                                "Server error"
                            },
                            status
                        ),
                        status: Some(status.as_u16()),
                    });

                    if attempt + 1 < Self::MAX_RETRIES {
                        let backoff = if is_rate_limited {
                            StdDuration::from_millis(2000 * 2u64.pow(attempt))
                        } else {
                            StdDuration::from_millis(500 * 2u64.pow(attempt))
                        };
                        tokio::time::sleep(backoff).await;
                    }
                    continue;
                }
                Ok(response) => {
                    return Err(Error::Provider {
                        message: format!("Provider error: {}", response.status()),
                        status: Some(response.status().as_u16()),
                    });
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        error = %e,
                        url = url,
                        "HTTP request failed, backing off"
                    );
                    last_error = Some(Error::Http(e));
                }
            }

            if attempt + 1 < Self::MAX_RETRIES {
                let backoff = StdDuration::from_millis(500 * 2u64.pow(attempt));
                tokio::time::sleep(backoff).await;
            }
        }

        Err(last_error.unwrap_or(Error::Provider {
            message: "Max retries exceeded".to_string(),
            status: None,
        }))
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive upstream; push it one day past `end` so the
        // requested range stays inclusive.
        let period2 = (end + Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url, symbol, period1, period2
        )
    }
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        let url = self.chart_url(symbol, start, end);
        let response = self.get_with_retry(&url).await?;
        let payload: ChartResponse = response.json().await?;

        if let Some(error) = payload.chart.error {
            return Err(Error::Provider {
                message: format!("{}: {}", error.code, error.description),
                status: None,
            });
        }

        let Some(result) = payload
            .chart
            .result
            .and_then(|results| results.into_iter().next())
        else {
            return Ok(Vec::new());
        };

        let closes = decode_closes(result);
        debug!(symbol = symbol, count = closes.len(), "Fetched daily closes");
        Ok(closes)
    }
}

/// Zip timestamps with closes, dropping rows with a missing close.
fn decode_closes(result: ChartResult) -> Vec<DailyClose> {
    let close_column = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let mut closes: Vec<DailyClose> = result
        .timestamp
        .into_iter()
        .zip(close_column)
        .filter_map(|(ts, close)| {
            let close = close?;
            let date = Utc.timestamp_opt(ts, 0).single()?.date_naive();
            Some(DailyClose { date, close })
        })
        .collect();

    closes.sort_by_key(|c| c.date);
    closes
}

// Chart endpoint response models. Only the fields the backtest needs are
// deserialized.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_url() {
        let client = YahooClient::new(Some("https://example.com".to_string()), 5);
        let url = client.chart_url(
            "PETR4.SA",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        );
        // 2020-01-01T00:00:00Z = 1577836800, 2020-02-01T00:00:00Z = 1580515200
        assert_eq!(
            url,
            "https://example.com/v8/finance/chart/PETR4.SA?period1=1577836800&period2=1580515200&interval=1d&events=history"
        );
    }

    #[test]
    fn test_decode_closes_drops_missing_rows() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "PETR4.SA"},
                    "timestamp": [1577836800, 1577923200, 1578009600],
                    "indicators": {"quote": [{"close": [10.0, null, 12.5]}]}
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        let closes = decode_closes(result);

        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(closes[0].close, 10.0);
        assert_eq!(closes[1].date, NaiveDate::from_ymd_opt(2020, 1, 3).unwrap());
        assert_eq!(closes[1].close, 12.5);
    }

    #[test]
    fn test_decode_closes_empty_quote_block() {
        let payload = r#"{
            "chart": {
                "result": [{
                    "timestamp": [],
                    "indicators": {"quote": []}
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(payload).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        assert!(decode_closes(result).is_empty());
    }

    #[test]
    fn test_provider_error_payload() {
        let payload = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(payload).unwrap();
        let error = response.chart.error.unwrap();
        assert_eq!(error.code, "Not Found");
    }
}
