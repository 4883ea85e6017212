//! Core business logic: ventures, market data and the reconciled metrics

pub mod analytics;
pub mod config;
pub mod constants;
pub mod format;
pub mod log;
pub mod market;
pub mod price;
pub mod venture;

// Re-export main types for cleaner imports
pub use analytics::{Metrics, Verdict};
pub use market::MarketDataFetcher;
pub use price::{
    CryptoSnapshot, DataSource, EquityHistory, HistoryProvider, MarketSnapshot, MonthlyClose,
    PricePoint, SpotPriceProvider,
};
pub use venture::{CryptoVenture, OrdinaryVenture, Venture};
