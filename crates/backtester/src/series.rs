//! Price series construction and windowed lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (trading date, closing price) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Date-sorted, deduplicated daily closing prices for one instrument.
///
/// Construction cleans the raw provider output: non-finite and non-positive
/// closes are dropped, points are sorted ascending by date, and duplicate
/// dates keep the last observation. The series is immutable afterwards,
/// which keeps the sorted-search lookups valid for the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from raw (date, close) pairs in any order.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut cleaned: Vec<PricePoint> = points
            .into_iter()
            .filter(|(_, close)| close.is_finite() && *close > 0.0)
            .map(|(date, close)| PricePoint { date, close })
            .collect();

        // Stable sort, so overwriting below makes the last input win.
        cleaned.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(cleaned.len());
        for point in cleaned {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The sub-series with dates in [start, end] inclusive.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        self.points.get(lo..hi).unwrap_or(&[])
    }
}
