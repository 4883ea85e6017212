//! Reconciles ventures with market snapshots into one set of totals.
use crate::core::constants::{CRYPTO_INVESTMENT, INITIAL_INVESTMENT, START_PRICE, shares_held};
use crate::core::price::{CryptoSnapshot, EquityHistory};
use crate::core::venture::Venture;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one dollar came in.
    Entrepreneur,
    NotYet,
}

/// Derived totals. Equity figures are `None` while no equity price is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_revenue: f64,
    pub current_stock_value: Option<i64>,
    pub stock_gain: Option<i64>,
    pub opportunity_cost: Option<f64>,
    /// Annualized equity return in percent.
    pub annualized_return: Option<f64>,
    pub verdict: Verdict,
}

/// Profit of the crypto position, rounded to whole currency units.
pub fn crypto_revenue(snapshot: &CryptoSnapshot) -> f64 {
    (snapshot.current_value - CRYPTO_INVESTMENT).round()
}

/// Writes the crypto profit into the crypto venture. Returns a new list and
/// whether anything changed, so callers only persist real updates.
pub fn apply_crypto_revenue(ventures: &[Venture], snapshot: &CryptoSnapshot) -> (Vec<Venture>, bool) {
    let revenue = crypto_revenue(snapshot);
    let mut changed = false;
    let updated = ventures
        .iter()
        .map(|venture| match venture {
            Venture::Crypto(c) if c.revenue() != revenue => {
                changed = true;
                Venture::Crypto(c.with_revenue(revenue))
            }
            other => other.clone(),
        })
        .collect();
    (updated, changed)
}

pub fn total_revenue(ventures: &[Venture]) -> f64 {
    ventures.iter().map(Venture::revenue).sum()
}

/// Revenue of the user-entered ventures only. Used where no crypto snapshot
/// backs the crypto figure.
pub fn ordinary_revenue(ventures: &[Venture]) -> f64 {
    ventures
        .iter()
        .filter(|v| !v.is_crypto())
        .map(Venture::revenue)
        .sum()
}

pub fn reconcile(
    ventures: &[Venture],
    equity: Option<&EquityHistory>,
    now: DateTime<Utc>,
    start: DateTime<Utc>,
) -> Metrics {
    let total_revenue = total_revenue(ventures);

    let current_stock_value = equity.map(|e| (shares_held() * e.latest_price).round() as i64);
    let stock_gain = current_stock_value.map(|v| v - INITIAL_INVESTMENT as i64);
    let opportunity_cost = stock_gain.map(|g| g as f64 - total_revenue);

    let annualized_return = equity.and_then(|e| {
        annualized_return(START_PRICE, e.latest_price, start, now)
            .inspect_err(|err| debug!("Skipping annualized return: {err}"))
            .ok()
    });

    let verdict = if total_revenue > 0.0 {
        Verdict::Entrepreneur
    } else {
        Verdict::NotYet
    };

    Metrics {
        total_revenue,
        current_stock_value,
        stock_gain,
        opportunity_cost,
        annualized_return,
        verdict,
    }
}

/// Compound annual growth between two prices, as a percentage.
pub fn annualized_return(
    begin_price: f64,
    end_price: f64,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<f64> {
    let duration_years = (now - start).num_days() as f64 / 365.0;
    if duration_years <= 0.0 {
        return Err(anyhow!("Comparison window has not started"));
    }

    let begin_bal = Decimal::from_f64(begin_price).ok_or_else(|| anyhow!("Invalid start price"))?;
    let end_bal = Decimal::from_f64(end_price).ok_or_else(|| anyhow!("Invalid latest price"))?;
    let n_years = Decimal::from_f64(duration_years).ok_or_else(|| anyhow!("Invalid duration"))?;

    if n_years.is_zero() || begin_bal.is_zero() {
        return Err(anyhow!("Degenerate inputs for CAGR"));
    }

    let rate = cagr(begin_bal, end_bal, n_years);
    let percentage = (rate * Decimal::from(100))
        .to_f64()
        .ok_or_else(|| anyhow!("CAGR percentage conversion failed"))?;
    debug!("cagr: {begin_bal}, {end_bal}, {n_years} = {rate}, {percentage}");
    Ok(percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::start_date;
    use crate::core::format::{format_signed_currency, venture_revenue_display};
    use crate::core::market::crypto_snapshot;
    use crate::core::price::DataSource;
    use crate::core::venture::{CryptoVenture, OrdinaryVenture, seed_ventures};
    use chrono::TimeZone;

    fn snapshot_worth(current_value: f64) -> CryptoSnapshot {
        CryptoSnapshot {
            spot_price: 0.0,
            coin_amount: 0.0,
            current_value,
            source: DataSource::Live,
        }
    }

    fn equity_at(latest_price: f64) -> EquityHistory {
        EquityHistory {
            points: Vec::new(),
            latest_price,
            source: DataSource::Live,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_crypto_revenue_sign() {
        let ventures = vec![Venture::Crypto(CryptoVenture::new(1))];

        let (loss, changed) = apply_crypto_revenue(&ventures, &snapshot_worth(900.0));
        assert!(changed);
        assert_eq!(loss[0].revenue(), -100.0);
        assert_eq!(format_signed_currency(loss[0].revenue()), "-$100");
        assert_eq!(venture_revenue_display(&loss[0], true), "-$100");

        let (gain, _) = apply_crypto_revenue(&ventures, &snapshot_worth(1_200.0));
        assert_eq!(gain[0].revenue(), 200.0);
        assert_eq!(venture_revenue_display(&gain[0], true), "+$200");
    }

    #[test]
    fn test_apply_crypto_revenue_reports_no_change() {
        let snapshot = crypto_snapshot(16_625.0 * 1.5, DataSource::Live);
        let (first, changed) = apply_crypto_revenue(&seed_ventures(), &snapshot);
        assert!(changed);
        let (second, changed) = apply_crypto_revenue(&first, &snapshot);
        assert!(!changed);
        assert_eq!(first, second);
        assert!(first.iter().filter(|v| !v.is_crypto()).all(|v| v.revenue() == 0.0));
    }

    #[test]
    fn test_zero_revenue_is_not_an_entrepreneur() {
        let metrics = reconcile(&seed_ventures(), None, now(), start_date());
        assert_eq!(metrics.total_revenue, 0.0);
        assert_eq!(metrics.verdict, Verdict::NotYet);
    }

    #[test]
    fn test_total_revenue_sums_every_venture() {
        let ventures = vec![
            Venture::Ordinary(OrdinaryVenture {
                id: 1,
                name: "Kiosk".to_string(),
                revenue: 250.5,
                expenses: String::new(),
            }),
            Venture::Crypto(CryptoVenture::new(2).with_revenue(-100.0)),
        ];
        let metrics = reconcile(&ventures, None, now(), start_date());
        assert_eq!(metrics.total_revenue, 150.5);
        assert_eq!(metrics.verdict, Verdict::Entrepreneur);
        assert_eq!(ordinary_revenue(&ventures), 250.5);
    }

    #[test]
    fn test_equity_metrics_unknown_without_price() {
        let metrics = reconcile(&seed_ventures(), None, now(), start_date());
        assert!(metrics.current_stock_value.is_none());
        assert!(metrics.stock_gain.is_none());
        assert!(metrics.opportunity_cost.is_none());
        assert!(metrics.annualized_return.is_none());
    }

    #[test]
    fn test_stock_metrics_from_latest_price() {
        let metrics = reconcile(&seed_ventures(), Some(&equity_at(100.0)), now(), start_date());

        let expected = (10_000.0 / 89.83 * 100.0_f64).round() as i64;
        assert_eq!(metrics.current_stock_value, Some(expected));
        assert_eq!(metrics.stock_gain, Some(expected - 10_000));
        assert_eq!(metrics.opportunity_cost, Some((expected - 10_000) as f64));
        assert!(metrics.annualized_return.unwrap() > 0.0);
    }

    #[test]
    fn test_negative_opportunity_cost_is_reported() {
        let ventures = vec![Venture::Ordinary(OrdinaryVenture {
            id: 1,
            name: "Actual business".to_string(),
            revenue: 50_000.0,
            expenses: String::new(),
        })];
        let metrics = reconcile(&ventures, Some(&equity_at(100.0)), now(), start_date());
        assert!(metrics.opportunity_cost.unwrap() < 0.0);
    }

    #[test]
    fn test_annualized_return_requires_elapsed_time() {
        assert!(annualized_return(100.0, 121.0, now(), now()).is_err());

        let two_years_later = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let rate = annualized_return(100.0, 121.0, start, two_years_later).unwrap();
        assert!((rate - 10.0).abs() < 0.1, "rate was {rate}");
    }
}
