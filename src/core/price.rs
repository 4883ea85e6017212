//! Market data abstractions and snapshot types

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// Where a snapshot's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Primary route answered.
    Live,
    /// Primary route failed, the alternate route answered.
    Alternate,
    /// Every route failed; numbers are a deterministic estimate.
    Estimated,
}

impl DataSource {
    pub fn is_estimate(&self) -> bool {
        matches!(self, DataSource::Estimated)
    }
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DataSource::Live => "live",
                DataSource::Alternate => "live (alternate route)",
                DataSource::Estimated => "estimated",
            }
        )
    }
}

/// One raw monthly observation from a history provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyClose {
    pub timestamp: i64,
    pub close: Option<f64>,
}

/// One month of the hypothetical equity position.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub label: String,
    pub timestamp: i64,
    pub stock_value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityHistory {
    pub points: Vec<PricePoint>,
    pub latest_price: f64,
    pub source: DataSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CryptoSnapshot {
    pub spot_price: f64,
    pub coin_amount: f64,
    pub current_value: f64,
    pub source: DataSource,
}

/// Everything fetched for one render. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub equity: EquityHistory,
    pub crypto: CryptoSnapshot,
    pub advisory: Option<String>,
}

#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Short route name used in logs.
    fn name(&self) -> &str;

    async fn fetch_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MonthlyClose>>;
}

#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_spot_price(&self, coin_id: &str, fiat: &str) -> Result<f64>;
}
