//! Per-period report rows joining inputs, raw and derived series.

use chrono::NaiveDate;

use crate::domain::derived::{
    capital_delta, compounded_capital, cumulative_pnl, turnover_dollars, turnover_units,
};
use crate::domain::error::LevholdError;
use crate::domain::price_series::PriceSeries;
use crate::domain::simulation::SimulationState;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub adj_close: f64,
    pub signal: i32,
    pub position_change: Option<i32>,
    pub theta: f64,
    pub stock_hold: f64,
    pub cap_v: f64,
    pub pnl: f64,
    pub cumulative_pnl: f64,
    pub turnover_dollars: f64,
    pub turnover_units: f64,
    pub compounded_capital: f64,
    pub capital_delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub rows: Vec<ReportRow>,
}

impl SimulationReport {
    /// Header names in column order, matching the fields of [`ReportRow`].
    pub const COLUMNS: [&'static str; 13] = [
        "date",
        "adj_close",
        "signal",
        "position_change",
        "theta",
        "stock_hold",
        "cap_v",
        "pnl",
        "cumulative_pnl",
        "turnover_dollars",
        "turnover_units",
        "compounded_capital",
        "capital_delta",
    ];

    /// Fails with `SeriesLengthMismatch` unless `series` is the input `state`
    /// was simulated over.
    pub fn build(series: &PriceSeries, state: &SimulationState) -> Result<Self, LevholdError> {
        let compounded = compounded_capital(state, series)?;
        let cum_pnl = cumulative_pnl(state);
        let turn_dollars = turnover_dollars(state);
        let turn_units = turnover_units(state);
        let delta = capital_delta(&compounded);
        let signals = state.signals();

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| ReportRow {
                date: bar.date,
                adj_close: bar.adj_close,
                signal: signals.signal[i],
                position_change: signals.position[i],
                theta: state.theta()[i],
                stock_hold: state.stock_hold()[i],
                cap_v: state.cap_v()[i],
                pnl: state.pnl()[i],
                cumulative_pnl: cum_pnl[i],
                turnover_dollars: turn_dollars[i],
                turnover_units: turn_units[i],
                compounded_capital: compounded[i],
                capital_delta: delta[i],
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&ReportRow> {
        self.rows.last()
    }
}
