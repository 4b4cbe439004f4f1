//! CSV file price data adapter.
//!
//! Reads `<base_path>/<CODE>.csv` with the header
//! `date,adj_close,return_per_unit,daily_rate`.

use crate::domain::error::LevholdError;
use crate::domain::price_series::{PriceBar, PriceSeries};
use crate::ports::config_port::DATE_FORMAT;
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn parse_column(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, LevholdError> {
    record
        .get(index)
        .ok_or_else(|| LevholdError::Data {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| LevholdError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, LevholdError> {
        let path = self.csv_path(code);
        let content = fs::read_to_string(&path).map_err(|e| LevholdError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| LevholdError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| LevholdError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).map_err(|e| {
                LevholdError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                continue;
            }

            bars.push(PriceBar {
                date,
                adj_close: parse_column(&record, 1, "adj_close")?,
                return_per_unit: parse_column(&record, 2, "return_per_unit")?,
                daily_rate: parse_column(&record, 3, "daily_rate")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        tracing::debug!(code, bars = bars.len(), path = %path.display(), "loaded prices");
        Ok(PriceSeries::new(bars))
    }
}
