//! Final metrics reduction over an evolution sequence.

use coorte_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::simulator::EvolutionRecord;

/// Summary of a completed simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// Portfolio value at the last contribution event.
    pub final_value: f64,
    /// Total capital contributed.
    pub total_invested: f64,
    /// Final value minus contributed capital.
    pub gross_profit: f64,
    /// Percentage return on contributed capital; 0 when nothing was invested.
    pub return_pct: f64,
}

impl SummaryMetrics {
    /// Reduce an evolution sequence to its final metrics.
    ///
    /// Only the last record is consulted. An empty sequence is refused;
    /// callers are expected to have guarded for it before getting here.
    pub fn summarize(evolution: &[EvolutionRecord]) -> Result<Self> {
        let Some(last) = evolution.last() else {
            return Err(Error::InvalidParameter {
                message: "cannot summarize an empty evolution sequence".to_string(),
            });
        };

        let final_value = last.portfolio_value;
        let total_invested = last.total_invested;
        let return_pct = if total_invested > 0.0 {
            (final_value / total_invested - 1.0) * 100.0
        } else {
            0.0
        };

        Ok(Self {
            final_value,
            total_invested,
            gross_profit: final_value - total_invested,
            return_pct,
        })
    }
}
