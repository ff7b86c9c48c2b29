//! Dollar-cost-averaging portfolio simulation.

use chrono::NaiveDate;
use coorte_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schedule::ContributionSchedule;
use crate::series::PriceSeries;

/// Cumulative portfolio state captured at one executed contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRecord {
    /// Trading date the contribution executed on.
    pub date: NaiveDate,
    /// Capital contributed up to and including this event.
    pub total_invested: f64,
    /// Units held times the closing price at this date.
    pub portfolio_value: f64,
}

/// Walks a contribution schedule against a price series, buying a fixed
/// amount per target date.
pub struct PortfolioSimulator {
    contribution_amount: f64,
}

impl PortfolioSimulator {
    pub fn new(contribution_amount: f64) -> Self {
        Self {
            contribution_amount,
        }
    }

    /// Simulate fixed periodic contributions over [start, end].
    ///
    /// Each schedule target executes on the earliest trading date on or
    /// after it (forward-fill). Once a target falls past the last available
    /// trading date the walk stops: trailing contributions are dropped
    /// without error, a lossy policy, and the records produced up to that
    /// point stay valid. Two targets landing on the same trading day merge
    /// into one record.
    ///
    /// Returns an empty sequence when the window holds no tradable data;
    /// the caller decides whether that is an error.
    pub fn simulate(
        &self,
        series: &PriceSeries,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EvolutionRecord>> {
        let amount = self.contribution_amount;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidParameter {
                message: format!("contribution amount must be positive, got {amount}"),
            });
        }
        if start > end {
            return Err(Error::NoContributions { start, end });
        }

        let window = series.window(start, end);
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let schedule = ContributionSchedule::generate(start, end);
        let mut state = SimulationState::default();
        let mut evolution: Vec<EvolutionRecord> = Vec::with_capacity(schedule.len());

        for &target in schedule.dates() {
            let position = window.partition_point(|p| p.date < target);
            let Some(point) = window.get(position) else {
                debug!(
                    target_date = %target,
                    executed = evolution.len(),
                    "No trading date on or after target, stopping early"
                );
                break;
            };
            if point.date > end {
                break;
            }

            state.total_units += amount / point.close;
            state.total_invested += amount;
            let portfolio_value = state.total_units * point.close;

            match evolution.last_mut() {
                Some(last) if last.date == point.date => {
                    last.total_invested = state.total_invested;
                    last.portfolio_value = portfolio_value;
                }
                _ => evolution.push(EvolutionRecord {
                    date: point.date,
                    total_invested: state.total_invested,
                    portfolio_value,
                }),
            }
        }

        debug!(
            records = evolution.len(),
            invested = state.total_invested,
            "Simulation complete"
        );

        Ok(evolution)
    }
}

/// Internal accumulation state.
#[derive(Debug, Default)]
struct SimulationState {
    total_units: f64,
    total_invested: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_month_series() -> PriceSeries {
        PriceSeries::from_points(vec![(date(2020, 1, 1), 10.0), (date(2020, 2, 3), 12.0)])
    }

    #[test]
    fn test_forward_fill_to_next_trading_day() {
        let series = two_month_series();
        let simulator = PortfolioSimulator::new(100.0);

        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 2, 3))
            .unwrap();

        assert_eq!(evolution.len(), 2);

        // First contribution hits 2020-01-01 exactly: 10 units at 10.0.
        assert_eq!(evolution[0].date, date(2020, 1, 1));
        assert_eq!(evolution[0].total_invested, 100.0);
        assert!((evolution[0].portfolio_value - 100.0).abs() < 1e-9);

        // Second target 2020-02-01 forward-fills to 2020-02-03.
        // Units = 10 + 100/12; value = (10 + 100/12) * 12 = 220.
        assert_eq!(evolution[1].date, date(2020, 2, 3));
        assert_eq!(evolution[1].total_invested, 200.0);
        assert!((evolution[1].portfolio_value - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_day_window() {
        let series = two_month_series();
        let simulator = PortfolioSimulator::new(250.0);

        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 1, 1))
            .unwrap();

        assert_eq!(evolution.len(), 1);
        assert_eq!(evolution[0].total_invested, 250.0);
    }

    #[test]
    fn test_start_after_last_price_yields_empty() {
        let series = two_month_series();
        let simulator = PortfolioSimulator::new(100.0);

        let evolution = simulator
            .simulate(&series, date(2020, 3, 1), date(2020, 6, 1))
            .unwrap();

        assert!(evolution.is_empty());
    }

    #[test]
    fn test_stops_past_last_trading_date() {
        let series = PriceSeries::from_points(vec![
            (date(2020, 1, 2), 10.0),
            (date(2020, 2, 3), 11.0),
        ]);
        let simulator = PortfolioSimulator::new(100.0);

        // Schedule is [01-01, 02-01, 03-01, 04-01]; the last two targets
        // fall past the final trading date and are dropped.
        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 4, 30))
            .unwrap();

        assert_eq!(evolution.len(), 2);
        assert_eq!(evolution[0].date, date(2020, 1, 2));
        assert_eq!(evolution[1].date, date(2020, 2, 3));
        assert_eq!(evolution[1].total_invested, 200.0);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let series = two_month_series();

        for amount in [0.0, -100.0, f64::NAN] {
            let simulator = PortfolioSimulator::new(amount);
            let result = simulator.simulate(&series, date(2020, 1, 1), date(2020, 2, 3));
            assert!(matches!(result, Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let series = two_month_series();
        let simulator = PortfolioSimulator::new(100.0);

        let result = simulator.simulate(&series, date(2020, 2, 3), date(2020, 1, 1));
        assert!(matches!(result, Err(Error::NoContributions { .. })));
    }

    #[test]
    fn test_simulate_is_pure() {
        let series = two_month_series();
        let simulator = PortfolioSimulator::new(100.0);

        let first = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 2, 3))
            .unwrap();
        let second = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 2, 3))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_invested_is_amount_times_executed_contributions() {
        let points: Vec<(NaiveDate, f64)> = (1..=12)
            .map(|month| (date(2020, month, 1), 10.0 + month as f64))
            .collect();
        let series = PriceSeries::from_points(points);
        let simulator = PortfolioSimulator::new(500.0);

        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 12, 31))
            .unwrap();

        assert_eq!(evolution.len(), 12);
        assert_eq!(evolution.last().unwrap().total_invested, 500.0 * 12.0);
    }

    #[test]
    fn test_invested_non_decreasing_and_dates_strictly_increasing() {
        let points: Vec<(NaiveDate, f64)> = (1..=12)
            .map(|month| (date(2020, month, 15), 20.0 + month as f64))
            .collect();
        let series = PriceSeries::from_points(points);
        let simulator = PortfolioSimulator::new(100.0);

        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 12, 31))
            .unwrap();

        for pair in evolution.windows(2) {
            assert!(pair[0].total_invested <= pair[1].total_invested);
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn test_targets_on_same_trading_day_merge() {
        // One trading day serves three monthly targets across a data gap.
        let series = PriceSeries::from_points(vec![(date(2020, 3, 15), 50.0)]);
        let simulator = PortfolioSimulator::new(100.0);

        let evolution = simulator
            .simulate(&series, date(2020, 1, 1), date(2020, 3, 20))
            .unwrap();

        assert_eq!(evolution.len(), 1);
        assert_eq!(evolution[0].date, date(2020, 3, 15));
        assert_eq!(evolution[0].total_invested, 300.0);
        assert!((evolution[0].portfolio_value - 300.0).abs() < 1e-9);
    }
}
