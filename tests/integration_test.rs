//! End-to-end simulation tests over the public domain API.
//!
//! Tests cover:
//! - Seed values and regime transitions over realistic price paths
//! - Wipeout termination and zero padding
//! - Derived series consistency with the raw simulation output
//! - Report assembly and summary figures
//! - Independent runs over the same input

mod common;

use approx::assert_relative_eq;
use common::*;
use levhold::domain::derived::{
    capital_delta, compounded_capital, cumulative_pnl, pad_to_length, turnover_dollars,
    turnover_units,
};
use levhold::domain::error::LevholdError;
use levhold::domain::metrics::Summary;
use levhold::domain::report::SimulationReport;
use levhold::domain::simulation::{classify, run, Regime};

mod regimes {
    use super::*;

    #[test]
    fn flat_price_scenario() {
        let series = series_from_prices(&[100.0, 100.0, 100.0], 0.0);
        let state = run(&sim_config(1000.0, 1.0), &series).unwrap();

        assert_eq!(state.simulated(), 3);
        assert_eq!(state.theta(), &[1000.0, 1000.0, 1000.0]);
        assert_eq!(state.cap_v(), &[0.0, 0.0, 0.0]);
        assert_eq!(state.stock_hold(), &[10.0, 10.0, 10.0]);
        assert_eq!(state.pnl(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn rising_market_trims_every_period() {
        let series = series_from_prices(&[100.0, 105.0, 110.25, 115.7625], 0.0);
        let state = run(&sim_config(1000.0, 3.0), &series).unwrap();

        for i in 1..4 {
            let trial = state.stock_hold()[i - 1] * series.bars()[i].adj_close;
            assert_eq!(classify(trial, 3000.0, 2000.0), Regime::OverExposed);
            assert_relative_eq!(state.theta()[i], 3000.0);
            assert_relative_eq!(state.cap_v()[i], 150.0, epsilon = 1e-6);
            // P&L is measured on the pre-trim exposure
            assert_relative_eq!(state.pnl()[i], 0.05 * trial, epsilon = 1e-6);
        }
    }

    #[test]
    fn falling_market_holds_units_until_floor() {
        // theta0 = 2000, floor = 1000, 20 units
        let series = series_from_prices(&[100.0, 90.0, 80.0, 60.0, 51.0, 49.0, 70.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();

        assert_eq!(&state.raw_stock_hold()[..5], &[20.0; 5]);
        assert_eq!(state.wipeout(), Some(5));
        assert_eq!(state.simulated(), 6);
        assert_relative_eq!(state.cap_v()[5], 980.0 - 2000.0);
        assert_eq!(state.stock_hold()[6], 0.0);
        assert_eq!(state.theta()[6], 0.0);
    }

    #[test]
    fn recovery_after_drawdown_rebalances_from_carried_units() {
        let series = series_from_prices(&[100.0, 70.0, 120.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();

        // 20 * 70 = 1400 in band, 20 * 120 = 2400 trimmed
        assert_relative_eq!(state.theta()[1], 1400.0);
        assert_relative_eq!(state.cap_v()[2], 400.0);
        assert_relative_eq!(state.stock_hold()[2], 2000.0 / 120.0);
    }

    #[test]
    fn invalid_mid_series_price_surfaces_error() {
        let mut prices = vec![100.0; 5];
        prices[3] = f64::INFINITY;
        let series = series_from_prices(&prices, 0.0);
        let err = run(&sim_config(1000.0, 2.0), &series).unwrap_err();
        assert!(matches!(err, LevholdError::InvalidPeriod { index: 3, .. }));
    }
}

mod padding {
    use super::*;

    #[test]
    fn wipeout_raw_lengths_and_padding() {
        let series = series_from_prices(&[100.0, 95.0, 40.0, 100.0, 100.0, 100.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        let k = state.wipeout().unwrap();

        assert_eq!(k, 2);
        assert_eq!(state.raw_pnl().len(), k + 1);
        assert_eq!(state.raw_theta().len(), k + 1);
        assert_eq!(state.pnl().len(), series.len());
        assert!(state.theta()[k + 1..].iter().all(|&v| v == 0.0));
        assert!(state.cap_v()[k + 1..].iter().all(|&v| v == 0.0));
        assert!(state.stock_hold()[k + 1..].iter().all(|&v| v == 0.0));
        assert!(state.pnl()[k + 1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn pad_to_length_matches_full_buffers() {
        let series = series_from_prices(&[100.0, 95.0, 40.0, 100.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        assert_eq!(
            pad_to_length(state.raw_cap_v(), series.len()),
            state.cap_v().to_vec()
        );
        assert_eq!(
            pad_to_length(state.raw_stock_hold(), series.len()),
            state.stock_hold().to_vec()
        );
    }
}

mod derived_series {
    use super::*;

    #[test]
    fn cumulative_pnl_sums_raw_values() {
        let series = series_from_prices(&[100.0, 104.0, 99.0, 101.0, 97.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        let cum = cumulative_pnl(&state);

        let mut running = 0.0;
        for (i, pnl) in state.pnl().iter().enumerate() {
            running += pnl;
            assert_relative_eq!(cum[i], running, epsilon = 1e-9);
        }
    }

    #[test]
    fn turnover_is_non_decreasing() {
        let series = series_from_prices(&[100.0, 120.0, 90.0, 130.0, 95.0, 140.0], 0.0);
        let state = run(&sim_config(1000.0, 1.5), &series).unwrap();

        for t in [turnover_dollars(&state), turnover_units(&state)] {
            assert!(t.windows(2).all(|w| w[1] >= w[0]));
        }
    }

    #[test]
    fn capital_bucket_compounds_at_daily_rate() {
        let series = series_from_prices(&[100.0, 110.0, 110.0, 110.0], 0.5);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        let c = compounded_capital(&state, &series).unwrap();

        assert_eq!(c[0], 0.0);
        assert_relative_eq!(c[1], 200.0 * 1.005, epsilon = 1e-9);
        assert_relative_eq!(c[2], 200.0 * 1.005 * 1.005, epsilon = 1e-9);
        assert_relative_eq!(c[3], 200.0 * 1.005_f64.powi(3), epsilon = 1e-9);

        let d = capital_delta(&c);
        assert_eq!(d[0], None);
        assert_relative_eq!(d[1].unwrap(), c[1], epsilon = 1e-12);
    }

    #[test]
    fn wipeout_shortfall_enters_capital_bucket() {
        let series = series_from_prices(&[100.0, 50.0, 60.0], 0.0);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        let c = compounded_capital(&state, &series).unwrap();
        assert_relative_eq!(c[1], -1000.0);
        assert_relative_eq!(c[2], -1000.0);
    }
}

mod reporting {
    use super::*;

    #[test]
    fn report_and_summary_agree() {
        let series = series_from_prices(&[100.0, 110.0, 100.0, 115.0, 60.0, 80.0], 0.01);
        let state = run(&sim_config(1000.0, 2.0), &series).unwrap();
        let report = SimulationReport::build(&series, &state).unwrap();
        let summary = Summary::compute(&report, &state);

        assert_eq!(report.len(), series.len());
        let last = report.last().unwrap();
        assert_eq!(summary.final_cumulative_pnl, last.cumulative_pnl);
        assert_eq!(summary.final_capital_balance, last.compounded_capital);
        assert_eq!(summary.total_turnover_dollars, last.turnover_dollars);
        assert_eq!(summary.wipeout_index, state.wipeout());
        assert_eq!(summary.rebalance_count, 2);
    }
}

mod independent_runs {
    use super::*;

    #[test]
    fn runs_across_configurations_do_not_interfere() {
        let series = series_from_prices(&[100.0, 110.0, 70.0, 90.0], 0.0);
        let configs = [sim_config(1000.0, 1.0), sim_config(1000.0, 2.0), sim_config(1000.0, 4.0)];

        let handles: Vec<_> = configs
            .iter()
            .map(|c| {
                let c = *c;
                let s = series.clone();
                std::thread::spawn(move || run(&c, &s).unwrap())
            })
            .collect();
        let threaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        for (config, state) in configs.iter().zip(&threaded) {
            assert_eq!(&run(config, &series).unwrap(), state);
        }
        assert_eq!(threaded[2].wipeout(), Some(2));
        assert_eq!(threaded[0].wipeout(), None);
    }
}
