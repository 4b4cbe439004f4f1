//! End-of-run summary figures.

use super::report::SimulationReport;
use super::simulation::SimulationState;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub periods: usize,
    pub simulated_periods: usize,
    pub wipeout_index: Option<usize>,
    pub target_exposure: f64,
    pub final_cumulative_pnl: f64,
    pub final_capital_balance: f64,
    pub total_turnover_dollars: f64,
    pub total_turnover_units: f64,
    /// Periods in which an over-exposed position was trimmed.
    pub rebalance_count: usize,
}

impl Summary {
    pub fn compute(report: &SimulationReport, state: &SimulationState) -> Self {
        let last = report.last();
        let rebalance_count = state
            .raw_cap_v()
            .iter()
            .skip(1)
            .filter(|&&cap| cap > 0.0)
            .count();

        Summary {
            periods: state.period_count(),
            simulated_periods: state.simulated(),
            wipeout_index: state.wipeout(),
            target_exposure: state.target_exposure(),
            final_cumulative_pnl: last.map(|r| r.cumulative_pnl).unwrap_or(0.0),
            final_capital_balance: last.map(|r| r.compounded_capital).unwrap_or(0.0),
            total_turnover_dollars: last.map(|r| r.turnover_dollars).unwrap_or(0.0),
            total_turnover_units: last.map(|r| r.turnover_units).unwrap_or(0.0),
            rebalance_count,
        }
    }
}
