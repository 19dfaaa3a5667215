// CoinDesk BPI repository implementation
use crate::application::price_history_repository::PriceHistoryRepository;
use crate::domain::price::RawSeries;
use crate::infrastructure::config::build_history_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct CoindeskRepository {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct HistoricalCloseResponse {
    bpi: RawSeries,
}

impl CoindeskRepository {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn execute_query(&self, url: &str) -> Result<HistoricalCloseResponse> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to price history endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Price history error body: {}", body);
            anyhow::bail!(
                "Price history request failed with status {}: {}",
                status,
                body_excerpt(&body)
            );
        }

        response
            .json::<HistoricalCloseResponse>()
            .await
            .context("Failed to parse price history response")
    }
}

const BODY_EXCERPT_CHARS: usize = 120;

/// First characters of an error body on a single line
fn body_excerpt(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &flat[..end]),
        None => flat,
    }
}

#[async_trait]
impl PriceHistoryRepository for CoindeskRepository {
    async fn fetch_close_prices(&self, start: NaiveDate, end: NaiveDate) -> Result<RawSeries> {
        let url = build_history_url(&self.endpoint, start, end);
        tracing::debug!("GET {}", url);

        let data = self.execute_query(&url).await?;
        Ok(data.bpi)
    }
}
