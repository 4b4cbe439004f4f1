#![allow(dead_code)]

use chrono::NaiveDate;
use levhold::domain::error::LevholdError;
use levhold::domain::price_series::{PriceBar, PriceSeries};
use levhold::domain::report::SimulationReport;
use levhold::domain::simulation::SimulationConfig;
use levhold::ports::data_port::PriceDataPort;
use levhold::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, code: &str, series: PriceSeries) -> Self {
        self.data.insert(code.to_string(), series);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockDataPort {
    fn fetch_prices(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, LevholdError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(LevholdError::Data {
                reason: reason.clone(),
            });
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(code)
            .map(|s| {
                s.bars()
                    .iter()
                    .filter(|b| start_date.is_none_or(|d| b.date >= d))
                    .filter(|b| end_date.is_none_or(|d| b.date <= d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(bars))
    }
}

/// Captures written reports instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(String, SimulationReport)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(&self, report: &SimulationReport, output_path: &str) -> Result<(), LevholdError> {
        self.written
            .borrow_mut()
            .push((output_path.to_string(), report.clone()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Series with simple returns derived from consecutive prices and a flat
/// daily rate.
pub fn series_from_prices(prices: &[f64], daily_rate: f64) -> PriceSeries {
    let start = date(2024, 1, 1);
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            adj_close: p,
            return_per_unit: if i == 0 { 0.0 } else { p / prices[i - 1] - 1.0 },
            daily_rate,
        })
        .collect::<Vec<_>>()
        .into()
}

pub fn sim_config(initial_investment: f64, leverage: f64) -> SimulationConfig {
    SimulationConfig::new(initial_investment, leverage).unwrap()
}
