//! Backtester
//!
//! Dollar-cost-averaging simulation over historical daily closing prices.
//!
//! # Features
//!
//! - **Price Series**: cleaned, date-sorted closing prices with sorted-search lookup
//! - **Contribution Schedule**: monthly target dates derived from a simulation window
//! - **Portfolio Simulator**: forward-fill execution producing cumulative evolution records
//! - **Summary Metrics**: final value, contributed capital and return reduction
//!
//! # Example
//!
//! ```ignore
//! use backtester::{PortfolioSimulator, PriceSeries, SummaryMetrics};
//!
//! let series = PriceSeries::from_points(closes);
//! let simulator = PortfolioSimulator::new(500.0);
//! let evolution = simulator.simulate(&series, start, end)?;
//! let summary = SummaryMetrics::summarize(&evolution)?;
//! println!("Return: {:.2}%", summary.return_pct);
//! ```

pub mod schedule;
pub mod series;
pub mod simulator;
pub mod summary;

// Re-exports
pub use schedule::ContributionSchedule;
pub use series::{PricePoint, PriceSeries};
pub use simulator::{EvolutionRecord, PortfolioSimulator};
pub use summary::SummaryMetrics;
