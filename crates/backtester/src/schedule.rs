//! Contribution schedule derivation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Ordered monthly contribution target dates within a simulation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    dates: Vec<NaiveDate>,
}

impl ContributionSchedule {
    /// Derive the target dates for the inclusive window [start, end].
    ///
    /// One target per calendar month, on the first day of the month. The
    /// first target is clamped forward to `start` when the month boundary
    /// precedes it, so the first contribution happens at simulation start
    /// rather than at the next month boundary. Empty exactly when
    /// start > end.
    pub fn generate(start: NaiveDate, end: NaiveDate) -> Self {
        let mut dates = Vec::new();
        let mut cursor = month_start(start);
        while cursor <= end {
            dates.push(cursor);
            cursor = next_month_start(cursor);
        }

        if let Some(first) = dates.first_mut() {
            if *first < start {
                *first = start;
            }
        } else if start <= end {
            dates.push(start);
        }

        dates.retain(|d| *d <= end);

        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
