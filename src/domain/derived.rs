//! Series derived from a finished simulation run.

use crate::domain::error::LevholdError;
use crate::domain::price_series::PriceSeries;
use crate::domain::simulation::SimulationState;

/// Right-pads `values` with zeros (or truncates) to exactly `len` entries.
pub fn pad_to_length(values: &[f64], len: usize) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().take(len).collect();
    out.resize(len, 0.0);
    out
}

pub fn cumulative_pnl(state: &SimulationState) -> Vec<f64> {
    running_sum(state.pnl().iter().copied())
}

/// Cumulative absolute change in dollar exposure. The first period has no
/// prior exposure and contributes zero.
pub fn turnover_dollars(state: &SimulationState) -> Vec<f64> {
    turnover(state.theta())
}

/// Cumulative absolute change in units held.
pub fn turnover_units(state: &SimulationState) -> Vec<f64> {
    turnover(state.stock_hold())
}

/// Capital bucket compounded at the daily risk-free rate.
///
/// `c[0] = 0` and `c[i] = (c[i-1] + cap_v[i]) * (1 + rate[i] / 100)`.
/// `series` must be the one the state was simulated over.
pub fn compounded_capital(
    state: &SimulationState,
    series: &PriceSeries,
) -> Result<Vec<f64>, LevholdError> {
    ensure_same_length(state, series)?;
    let n = state.period_count();
    let mut out = Vec::with_capacity(n);
    if n == 0 {
        return Ok(out);
    }
    out.push(0.0);
    for (cap, bar) in state.cap_v().iter().zip(series.bars()).skip(1) {
        let prev = out.last().copied().unwrap_or(0.0);
        out.push((prev + cap) * bar.rate_factor());
    }
    Ok(out)
}

/// Rejects a series whose bar count differs from the simulated period count.
pub fn ensure_same_length(
    state: &SimulationState,
    series: &PriceSeries,
) -> Result<(), LevholdError> {
    if series.len() != state.period_count() {
        return Err(LevholdError::SeriesLengthMismatch {
            bars: series.len(),
            periods: state.period_count(),
        });
    }
    Ok(())
}

/// Period-over-period change of the compounded capital bucket.
pub fn capital_delta(compounded: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(compounded.windows(2).map(|w| Some(w[1] - w[0])))
        .take(compounded.len())
        .collect()
}

fn turnover(values: &[f64]) -> Vec<f64> {
    let deltas = std::iter::once(0.0).chain(values.windows(2).map(|w| (w[1] - w[0]).abs()));
    running_sum(deltas.take(values.len()))
}

fn running_sum(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}
