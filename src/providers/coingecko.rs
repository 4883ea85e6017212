use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::constants::FETCH_TIMEOUT;
use crate::core::price::SpotPriceProvider;

/// Spot prices from CoinGecko's `simple/price` endpoint.
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }
}

/// `{"bitcoin": {"usd": 97000.0}}`
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct SimplePriceResponse {
    prices: HashMap<String, HashMap<String, f64>>,
}

#[async_trait]
impl SpotPriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoSpotFetch", skip(self), fields(coin = %coin_id))]
    async fn fetch_spot_price(&self, coin_id: &str, fiat: &str) -> Result<f64> {
        let fiat = fiat.to_lowercase();
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, coin_id, fiat
        );
        debug!("Requesting spot price from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("hustle/0.1")
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for coin: {}", e, coin_id))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for coin: {}",
                response.status(),
                coin_id
            ));
        }

        let text = response.text().await?;
        let data: SimplePriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", coin_id, e))?;

        let price = data
            .prices
            .get(coin_id)
            .and_then(|quotes| quotes.get(&fiat))
            .copied()
            .ok_or_else(|| anyhow!("No {} price found for coin: {}", fiat, coin_id))?;

        if !price.is_finite() || price <= 0.0 {
            return Err(anyhow!("Invalid {} price for coin: {}", fiat, coin_id));
        }
        Ok(price)
    }
}
