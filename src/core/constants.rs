//! Compiled-in market tunables.
//!
//! The fallback figures are point-in-time estimates. They are only used when
//! live data cannot be fetched and are not meant to track the market.

use std::time::Duration;

/// Equity the ventures are compared against.
pub const EQUITY_SYMBOL: &str = "AMZN";

/// Amount hypothetically put into the equity on the start date.
pub const INITIAL_INVESTMENT: f64 = 10_000.0;

/// Equity close on the start date, used to derive the share count.
pub const START_PRICE: f64 = 89.83;

/// Start of the comparison window (UTC).
pub const START_YEAR: i32 = 2023;
pub const START_MONTH: u32 = 1;
pub const START_DAY: u32 = 1;

/// Monthly growth applied when no equity history could be fetched.
pub const FALLBACK_MONTHLY_GROWTH: f64 = 0.025;

/// CoinGecko id of the coin behind the crypto venture.
pub const CRYPTO_COIN_ID: &str = "bitcoin";

/// Fiat currency the spot price is quoted in.
pub const CRYPTO_FIAT: &str = "usd";

/// Amount hypothetically put into the coin.
pub const CRYPTO_INVESTMENT: f64 = 1_000.0;

/// Coin price at the time of the hypothetical purchase.
pub const CRYPTO_REFERENCE_PRICE: f64 = 16_625.0;

/// Spot price used when the live quote is unavailable.
pub const CRYPTO_FALLBACK_SPOT: f64 = 97_000.0;

/// Durable storage key. Bump the suffix when the record layout changes.
pub const STORAGE_KEY: &str = "hustle.ventures.v2";

/// Expenses shown for the crypto venture.
pub const CRYPTO_EXPENSES: &str = "$1,000 of Bitcoin, bought once";

/// Display name of the crypto venture.
pub const CRYPTO_VENTURE_NAME: &str = "Bitcoin (the one good idea)";

/// Expenses recorded when the user leaves the field empty.
pub const EXPENSES_PLACEHOLDER: &str = "Undisclosed";

/// Shown in place of the crypto revenue until a snapshot exists.
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// Upper bound on a single market-data request, per route.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Shares bought with [`INITIAL_INVESTMENT`] at [`START_PRICE`].
pub fn shares_held() -> f64 {
    INITIAL_INVESTMENT / START_PRICE
}

/// Coin amount bought with [`CRYPTO_INVESTMENT`] at [`CRYPTO_REFERENCE_PRICE`].
pub fn crypto_amount() -> f64 {
    CRYPTO_INVESTMENT / CRYPTO_REFERENCE_PRICE
}

/// The start of the comparison window.
pub fn start_date() -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc
        .with_ymd_and_hms(START_YEAR, START_MONTH, START_DAY, 0, 0, 0)
        .single()
        .unwrap_or(chrono::DateTime::UNIX_EPOCH)
}
