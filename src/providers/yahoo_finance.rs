use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::constants::FETCH_TIMEOUT;
use crate::core::price::{HistoryProvider, MonthlyClose};

/// Monthly closes from the Yahoo v8 chart API. Two instances pointed at
/// different hosts make up the primary and alternate equity routes.
pub struct YahooHistoryProvider {
    name: String,
    base_url: String,
}

impl YahooHistoryProvider {
    pub fn new(name: &str, base_url: &str) -> Self {
        YahooHistoryProvider {
            name: name.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

fn closes_from_item(item: ChartItem, symbol: &str) -> Result<Vec<MonthlyClose>> {
    let timestamps = item
        .timestamp
        .ok_or_else(|| anyhow!("No timestamps in history for symbol: {}", symbol))?;
    let closes = item
        .indicators
        .and_then(|inds| inds.quote.into_iter().next())
        .and_then(|q| q.close)
        .ok_or_else(|| anyhow!("No close prices in history for symbol: {}", symbol))?;

    if timestamps.len() != closes.len() {
        return Err(anyhow!(
            "Mismatched history lengths for symbol: {} ({} timestamps, {} closes)",
            symbol,
            timestamps.len(),
            closes.len()
        ));
    }

    Ok(timestamps
        .into_iter()
        .zip(closes)
        .map(|(timestamp, close)| MonthlyClose { timestamp, close })
        .collect())
}

#[async_trait]
impl HistoryProvider for YahooHistoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "YahooHistoryFetch",
        skip(self, start, end),
        fields(symbol = %symbol)
    )]
    async fn fetch_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyClose>> {
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1mo",
            self.base_url,
            symbol,
            start.timestamp(),
            end.timestamp()
        );
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("hustle/0.1")
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| anyhow!("No price data found for symbol: {}", symbol))?;

        closes_from_item(item, symbol)
    }
}
