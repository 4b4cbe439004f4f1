//! Leveraged buy-and-hold position simulator.
//!
//! Walks the price series once. At every period the exposure carried from
//! the previous holding is classified into a [`Regime`]: over-exposed
//! positions are trimmed back to the target notional with the excess routed
//! to the capital bucket, positions inside the buffer band are left alone,
//! and positions at or below the wipeout floor end the run.

use crate::domain::error::LevholdError;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::domain::signal::{hold_signals, SignalSeries};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    initial_investment: f64,
    leverage: f64,
}

impl SimulationConfig {
    pub fn new(initial_investment: f64, leverage: f64) -> Result<Self, LevholdError> {
        if !initial_investment.is_finite() || initial_investment <= 0.0 {
            return Err(LevholdError::InvalidConfig {
                field: "initial_investment".into(),
                reason: format!("must be positive and finite, got {initial_investment}"),
            });
        }
        if !leverage.is_finite() || leverage <= 0.0 {
            return Err(LevholdError::InvalidConfig {
                field: "leverage".into(),
                reason: format!("must be positive and finite, got {leverage}"),
            });
        }
        Ok(Self {
            initial_investment,
            leverage,
        })
    }

    pub fn initial_investment(&self) -> f64 {
        self.initial_investment
    }

    pub fn leverage(&self) -> f64 {
        self.leverage
    }

    /// Target notional exposure, `V0 * L`.
    pub fn target_exposure(&self) -> f64 {
        self.initial_investment * self.leverage
    }

    /// Exposure at or below which the position is wiped out, `theta0 - V0`.
    pub fn wipeout_floor(&self) -> f64 {
        self.target_exposure() - self.initial_investment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// `|theta| > theta0`
    OverExposed,
    /// `theta0 - V0 < |theta| <= theta0`
    WithinBand,
    /// `|theta| <= theta0 - V0`
    Wipeout,
}

pub fn classify(exposure: f64, target: f64, floor: f64) -> Regime {
    let magnitude = exposure.abs();
    if magnitude > target {
        Regime::OverExposed
    } else if magnitude > floor {
        Regime::WithinBand
    } else {
        Regime::Wipeout
    }
}

/// Result of a single simulation run.
///
/// The four buffers always span every period of the input. Periods after a
/// wipeout are left at zero, so the buffers double as the padded series.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    config: SimulationConfig,
    signals: SignalSeries,
    theta: Vec<f64>,
    cap_v: Vec<f64>,
    stock_hold: Vec<f64>,
    pnl: Vec<f64>,
    simulated: usize,
    wipeout: Option<usize>,
}

impl SimulationState {
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn initial_investment(&self) -> f64 {
        self.config.initial_investment()
    }

    pub fn leverage(&self) -> f64 {
        self.config.leverage()
    }

    pub fn target_exposure(&self) -> f64 {
        self.config.target_exposure()
    }

    pub fn signals(&self) -> &SignalSeries {
        &self.signals
    }

    pub fn period_count(&self) -> usize {
        self.theta.len()
    }

    /// Number of periods the state machine actually wrote, seed included.
    pub fn simulated(&self) -> usize {
        self.simulated
    }

    /// Index of the period where the wipeout regime fired, if any.
    pub fn wipeout(&self) -> Option<usize> {
        self.wipeout
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    pub fn cap_v(&self) -> &[f64] {
        &self.cap_v
    }

    pub fn stock_hold(&self) -> &[f64] {
        &self.stock_hold
    }

    pub fn pnl(&self) -> &[f64] {
        &self.pnl
    }

    pub fn raw_theta(&self) -> &[f64] {
        &self.theta[..self.simulated]
    }

    pub fn raw_cap_v(&self) -> &[f64] {
        &self.cap_v[..self.simulated]
    }

    pub fn raw_stock_hold(&self) -> &[f64] {
        &self.stock_hold[..self.simulated]
    }

    pub fn raw_pnl(&self) -> &[f64] {
        &self.pnl[..self.simulated]
    }
}

/// Runs the simulation with a constant long signal.
pub fn run(config: &SimulationConfig, series: &PriceSeries) -> Result<SimulationState, LevholdError> {
    let signals = hold_signals(series.len());
    run_with_signals(config, series, &signals)
}

pub fn run_with_signals(
    config: &SimulationConfig,
    series: &PriceSeries,
    signals: &SignalSeries,
) -> Result<SimulationState, LevholdError> {
    let n = series.len();
    let seed = series.get(0).ok_or(LevholdError::EmptySeries)?;
    if signals.len() != n {
        return Err(LevholdError::SignalLengthMismatch {
            signals: signals.len(),
            periods: n,
        });
    }
    if !seed.adj_close.is_finite() || seed.adj_close <= 0.0 {
        return Err(LevholdError::InvalidConfig {
            field: "seed_price".into(),
            reason: format!("must be positive and finite, got {}", seed.adj_close),
        });
    }

    let target = config.target_exposure();
    let floor = config.wipeout_floor();

    let mut theta = vec![0.0; n];
    let mut cap_v = vec![0.0; n];
    let mut stock_hold = vec![0.0; n];
    let mut pnl = vec![0.0; n];

    theta[0] = target;
    stock_hold[0] = target / seed.adj_close;
    let mut simulated = 1;
    let mut wipeout = None;

    for (i, bar) in series.bars().iter().enumerate().skip(1) {
        check_period(i, bar)?;

        let mut exposure = stock_hold[i - 1] * bar.adj_close;
        match classify(exposure, target, floor) {
            Regime::OverExposed => {
                cap_v[i] = exposure.abs() - target;
                pnl[i] = bar.return_per_unit * exposure;
                exposure = target * f64::from(signals.signal[i]);
                stock_hold[i] = exposure / bar.adj_close;
            }
            Regime::WithinBand => {
                stock_hold[i] = stock_hold[i - 1];
                pnl[i] = bar.return_per_unit * exposure;
            }
            Regime::Wipeout => {
                cap_v[i] = exposure.abs() - target;
                exposure = 0.0;
                wipeout = Some(i);
            }
        }
        theta[i] = exposure;
        simulated = i + 1;

        if wipeout.is_some() {
            tracing::debug!(period = i, shortfall = cap_v[i], "position wiped out");
            break;
        }
    }

    Ok(SimulationState {
        config: *config,
        signals: signals.clone(),
        theta,
        cap_v,
        stock_hold,
        pnl,
        simulated,
        wipeout,
    })
}

fn check_period(index: usize, bar: &PriceBar) -> Result<(), LevholdError> {
    if !bar.adj_close.is_finite() || bar.adj_close <= 0.0 {
        return Err(LevholdError::InvalidPeriod {
            index,
            reason: format!("price must be positive and finite, got {}", bar.adj_close),
        });
    }
    if !bar.return_per_unit.is_finite() {
        return Err(LevholdError::InvalidPeriod {
            index,
            reason: format!("return must be finite, got {}", bar.return_per_unit),
        });
    }
    Ok(())
}
