//! Price data access port trait.

use crate::domain::error::LevholdError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Aligned series for `code`, oldest first. `None` bounds are open.
    fn fetch_prices(
        &self,
        code: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, LevholdError>;
}
