//! Fetches the equity history and the crypto spot price, degrading to
//! estimates when the network lets us down.

use crate::core::constants::{
    CRYPTO_COIN_ID, CRYPTO_FALLBACK_SPOT, CRYPTO_FIAT, EQUITY_SYMBOL, FALLBACK_MONTHLY_GROWTH,
    FETCH_TIMEOUT, INITIAL_INVESTMENT, START_PRICE, crypto_amount, shares_held, start_date,
};
use crate::core::price::{
    CryptoSnapshot, DataSource, EquityHistory, HistoryProvider, MarketSnapshot, MonthlyClose,
    PricePoint, SpotPriceProvider,
};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Months, TimeZone, Utc};
use futures::future::join;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const EQUITY_ADVISORY: &str = "Stock data unavailable, using estimated growth values";
const CRYPTO_ADVISORY: &str = "Crypto price unavailable, using estimated spot price";

/// Runs the equity routes in order, then the synthetic series. The crypto
/// quote has a single route and a fixed fallback price. A route that does not
/// answer within `route_timeout` counts as failed.
pub struct MarketDataFetcher {
    equity_routes: Vec<Box<dyn HistoryProvider>>,
    spot_provider: Box<dyn SpotPriceProvider>,
    route_timeout: Duration,
}

impl MarketDataFetcher {
    pub fn new(
        equity_routes: Vec<Box<dyn HistoryProvider>>,
        spot_provider: Box<dyn SpotPriceProvider>,
    ) -> Self {
        Self {
            equity_routes,
            spot_provider,
            route_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_route_timeout(mut self, route_timeout: Duration) -> Self {
        self.route_timeout = route_timeout;
        self
    }

    /// Fetches both series concurrently. Never fails.
    pub async fn fetch(&self, now: DateTime<Utc>) -> MarketSnapshot {
        let (equity, crypto) = join(self.fetch_equity(now), self.fetch_crypto()).await;

        let advisories: Vec<&str> = [
            equity.source.is_estimate().then_some(EQUITY_ADVISORY),
            crypto.source.is_estimate().then_some(CRYPTO_ADVISORY),
        ]
        .into_iter()
        .flatten()
        .collect();
        let advisory = (!advisories.is_empty()).then(|| advisories.join("; "));

        MarketSnapshot {
            equity,
            crypto,
            advisory,
        }
    }

    pub async fn fetch_equity(&self, now: DateTime<Utc>) -> EquityHistory {
        let start = start_date();
        for (index, route) in self.equity_routes.iter().enumerate() {
            let source = if index == 0 {
                DataSource::Live
            } else {
                DataSource::Alternate
            };
            let attempt = timeout(
                self.route_timeout,
                route.fetch_monthly_closes(EQUITY_SYMBOL, start, now),
            )
            .await
            .unwrap_or_else(|_| Err(anyhow!("timed out after {:?}", self.route_timeout)));
            match attempt {
                Ok(closes) => match history_from_closes(&closes, source) {
                    Ok(history) => {
                        info!(route = route.name(), points = history.points.len(), "Equity history fetched");
                        return history;
                    }
                    Err(e) => warn!(route = route.name(), error = %e, "Unusable equity history"),
                },
                Err(e) => warn!(route = route.name(), error = %e, "Equity history fetch failed"),
            }
        }

        debug!("All equity routes failed, synthesizing history");
        synthetic_history(start, now)
    }

    pub async fn fetch_crypto(&self) -> CryptoSnapshot {
        let attempt = timeout(
            self.route_timeout,
            self.spot_provider.fetch_spot_price(CRYPTO_COIN_ID, CRYPTO_FIAT),
        )
        .await
        .unwrap_or_else(|_| Err(anyhow!("timed out after {:?}", self.route_timeout)));
        match attempt {
            Ok(spot) => {
                info!(spot, "Crypto spot price fetched");
                crypto_snapshot(spot, DataSource::Live)
            }
            Err(e) => {
                warn!(error = %e, "Crypto spot fetch failed, using fallback price");
                crypto_snapshot(CRYPTO_FALLBACK_SPOT, DataSource::Estimated)
            }
        }
    }
}

/// Values the coin position at `spot`. Same formula for live and fallback.
pub fn crypto_snapshot(spot: f64, source: DataSource) -> CryptoSnapshot {
    let coin_amount = crypto_amount();
    CryptoSnapshot {
        spot_price: spot,
        coin_amount,
        current_value: coin_amount * spot,
        source,
    }
}

/// Turns raw closes into portfolio values. Closes without a usable (finite,
/// positive) price are dropped; an all-empty series is an error so the next
/// route gets a turn.
pub fn history_from_closes(closes: &[MonthlyClose], source: DataSource) -> Result<EquityHistory> {
    let shares = shares_held();
    let mut priced: Vec<(i64, f64)> = closes
        .iter()
        .filter_map(|c| match c.close {
            Some(price) if price.is_finite() && price > 0.0 => Some((c.timestamp, price)),
            _ => None,
        })
        .collect();
    priced.sort_by_key(|(ts, _)| *ts);

    let latest_price = priced
        .last()
        .map(|(_, price)| *price)
        .ok_or_else(|| anyhow!("No priced observations in history"))?;

    let points = priced
        .into_iter()
        .map(|(timestamp, price)| PricePoint {
            label: month_label(timestamp),
            timestamp,
            stock_value: (shares * price).round() as i64,
        })
        .collect();

    Ok(EquityHistory {
        points,
        latest_price,
        source,
    })
}

/// Compounds the initial investment monthly from `start` up to `now`. Always
/// yields at least the starting month.
pub fn synthetic_history(start: DateTime<Utc>, now: DateTime<Utc>) -> EquityHistory {
    let mut points = Vec::new();
    let mut month = 0u32;
    let mut factor = 1.0;

    loop {
        let Some(date) = start.checked_add_months(Months::new(month)) else {
            break;
        };
        if month > 0 && date > now {
            break;
        }
        let timestamp = date.timestamp();
        points.push(PricePoint {
            label: month_label(timestamp),
            timestamp,
            stock_value: (INITIAL_INVESTMENT * factor).round() as i64,
        });
        factor *= 1.0 + FALLBACK_MONTHLY_GROWTH;
        month += 1;
    }

    // `factor` has been advanced once past the last emitted point.
    let latest_factor = factor / (1.0 + FALLBACK_MONTHLY_GROWTH);
    EquityHistory {
        points,
        latest_price: START_PRICE * latest_factor,
        source: DataSource::Estimated,
    }
}

fn month_label(timestamp: i64) -> String {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.format("%b %Y").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
