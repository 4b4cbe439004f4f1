//! Aligned price series input.

use chrono::NaiveDate;

/// One period of aligned market data.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub adj_close: f64,
    /// Return attributed to holding one dollar of exposure over the period.
    pub return_per_unit: f64,
    /// Daily risk-free rate, in percent.
    pub daily_rate: f64,
}

impl PriceBar {
    /// Growth factor applied to the capital bucket for this period.
    pub fn rate_factor(&self) -> f64 {
        1.0 + self.daily_rate / 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}
