// Repository trait for historical price access
use crate::domain::price::RawSeries;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait PriceHistoryRepository: Send + Sync {
    /// Daily closing prices for the inclusive range `start..=end`
    async fn fetch_close_prices(&self, start: NaiveDate, end: NaiveDate) -> anyhow::Result<RawSeries>;
}
