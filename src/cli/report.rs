use super::ui;
use crate::core::analytics::{self, Metrics, Verdict};
use crate::core::constants::{EQUITY_SYMBOL, LOADING_PLACEHOLDER, start_date};
use crate::core::format::{format_currency, format_signed_currency, venture_revenue_display};
use crate::core::{EquityHistory, MarketDataFetcher, MarketSnapshot, Venture};
use crate::store::{KeyValueStore, VentureStore};
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;
use tracing::{debug, warn};

const BAR_WIDTH: usize = 30;

/// Loads ventures, fetches market data, patches and persists the crypto
/// revenue, then prints the full comparison.
pub async fn run<S: KeyValueStore>(
    store: &VentureStore<S>,
    fetcher: &MarketDataFetcher,
    now: DateTime<Utc>,
) -> Result<()> {
    let ventures = store.load();

    let pb = ui::new_spinner("Fetching market data...");
    let snapshot = fetcher.fetch(now).await;
    pb.finish_and_clear();

    let ventures = reconcile_and_persist(store, &ventures, &snapshot);
    let metrics = analytics::reconcile(&ventures, Some(&snapshot.equity), now, start_date());
    debug!(?metrics, "Reconciled metrics");

    println!("{}", render_report(&ventures, &metrics, Some(&snapshot)));
    Ok(())
}

/// Applies the crypto snapshot to the list and writes it back when the
/// revenue moved. A failed write is logged; the render goes on.
pub fn reconcile_and_persist<S: KeyValueStore>(
    store: &VentureStore<S>,
    ventures: &[Venture],
    snapshot: &MarketSnapshot,
) -> Vec<Venture> {
    let (updated, changed) = analytics::apply_crypto_revenue(ventures, &snapshot.crypto);
    if changed {
        if let Err(e) = store.save(&updated) {
            warn!(error = %e, "Failed to persist crypto revenue");
        }
    }
    updated
}

pub fn ventures_table(ventures: &[Venture], crypto_ready: bool) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Venture"),
        ui::header_cell("Revenue"),
        ui::header_cell("Expenses"),
    ]);

    for venture in ventures {
        let revenue_text = venture_revenue_display(venture, crypto_ready);
        let revenue = match venture {
            Venture::Crypto(_) if !crypto_ready => ui::pending_cell(&revenue_text),
            Venture::Crypto(c) => ui::signed_cell(&revenue_text, c.revenue()),
            Venture::Ordinary(_) => ui::amount_cell(&revenue_text),
        };
        let name = if venture.is_crypto() {
            format!("{} (locked)", venture.name())
        } else {
            venture.name().to_string()
        };

        table.add_row(vec![
            Cell::new(venture.id()),
            Cell::new(name),
            revenue,
            Cell::new(venture.expenses()),
        ]);
    }

    table.to_string()
}

fn optional_amount(value: Option<f64>, signed: bool) -> String {
    match value {
        Some(v) if signed => format_signed_currency(v),
        Some(v) => format_currency(v),
        None => LOADING_PLACEHOLDER.to_string(),
    }
}

pub fn summary_block(metrics: &Metrics) -> String {
    let position_label = format!("{EQUITY_SYMBOL} position today");
    let rows = [
        ("Total venture revenue", format_currency(metrics.total_revenue)),
        (
            position_label.as_str(),
            optional_amount(metrics.current_stock_value.map(|v| v as f64), false),
        ),
        (
            "Stock gain",
            optional_amount(metrics.stock_gain.map(|v| v as f64), true),
        ),
        (
            "Opportunity cost",
            optional_amount(metrics.opportunity_cost, false),
        ),
        (
            "Annualized stock return",
            metrics
                .annualized_return
                .map_or("N/A".to_string(), |r| format!("{r:.2}%")),
        ),
    ];

    let mut output = String::new();
    for (label, value) in rows {
        let style = if value == LOADING_PLACEHOLDER || value == "N/A" {
            ui::StyleType::Subtle
        } else {
            ui::StyleType::TotalValue
        };
        output.push_str(&format!(
            "{}: {}\n",
            ui::style_text(label, ui::StyleType::TotalLabel),
            ui::style_text(&value, style)
        ));
    }

    let verdict = match metrics.verdict {
        Verdict::Entrepreneur => "Verdict: technically an entrepreneur.",
        Verdict::NotYet => "Verdict: not an entrepreneur (yet). The index fund sends its regards.",
    };
    output.push_str(&format!("\n{}", ui::style_text(verdict, ui::StyleType::Title)));
    output
}

pub fn history_table(history: &EquityHistory) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell(&format!("{EQUITY_SYMBOL} position")),
        ui::header_cell(""),
    ]);

    let max = history
        .points
        .iter()
        .map(|p| p.stock_value)
        .max()
        .unwrap_or(0);
    for point in &history.points {
        table.add_row(vec![
            Cell::new(&point.label),
            ui::amount_cell(&format_currency(point.stock_value as f64)),
            Cell::new(ui::bar(point.stock_value, max, BAR_WIDTH)),
        ]);
    }

    table.to_string()
}

pub fn render_report(
    ventures: &[Venture],
    metrics: &Metrics,
    snapshot: Option<&MarketSnapshot>,
) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Ventures vs. just buying the stock", ui::StyleType::Title)
    );
    output.push_str(&ventures_table(ventures, snapshot.is_some()));
    output.push_str("\n\n");
    output.push_str(&summary_block(metrics));

    if let Some(snapshot) = snapshot {
        output.push('\n');
        output.push_str(&format!(
            "\n{}\n",
            ui::style_text(
                &format!(
                    "Monthly history ({}); crypto spot {} ({})",
                    snapshot.equity.source,
                    format_currency(snapshot.crypto.spot_price),
                    snapshot.crypto.source
                ),
                ui::StyleType::Subtle
            )
        ));
        output.push_str(&history_table(&snapshot.equity));

        if let Some(advisory) = &snapshot.advisory {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(&format!("Note: {advisory}"), ui::StyleType::Warning)
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::start_date;
    use crate::core::market::{crypto_snapshot, synthetic_history};
    use crate::core::price::DataSource;
    use crate::core::venture::seed_ventures;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()
    }

    fn estimated_snapshot() -> MarketSnapshot {
        MarketSnapshot {
            equity: synthetic_history(start_date(), now()),
            crypto: crypto_snapshot(16_625.0 * 0.9, DataSource::Estimated),
            advisory: Some("using estimated values".to_string()),
        }
    }

    #[test]
    fn test_ventures_table_shows_placeholder_until_ready() {
        let ventures = seed_ventures();
        let pending = ventures_table(&ventures, false);
        assert!(pending.contains(LOADING_PLACEHOLDER));

        let ready = ventures_table(&ventures, true);
        assert!(!ready.contains(LOADING_PLACEHOLDER));
        assert!(ready.contains("+$0"));
    }

    #[test]
    fn test_report_includes_advisory_and_history() {
        let snapshot = estimated_snapshot();
        let store = VentureStore::new(MemoryStore::new());
        let ventures = reconcile_and_persist(&store, &seed_ventures(), &snapshot);
        let metrics = analytics::reconcile(&ventures, Some(&snapshot.equity), now(), start_date());

        let report = render_report(&ventures, &metrics, Some(&snapshot));
        assert!(report.contains("using estimated values"));
        assert!(report.contains("Jan 2023"));
        assert!(report.contains("Mar 2024"));
        assert!(report.contains("-$100"));
        assert!(report.contains("not an entrepreneur"));
    }

    #[test]
    fn test_reconcile_and_persist_writes_only_on_change() {
        let snapshot = estimated_snapshot();
        let store = VentureStore::new(MemoryStore::new());

        let first = reconcile_and_persist(&store, &store.load(), &snapshot);
        assert_eq!(store.load(), first);

        let crypto = first.iter().find(|v| v.is_crypto()).unwrap();
        assert_eq!(crypto.revenue(), -100.0);

        let second = reconcile_and_persist(&store, &first, &snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_block_while_loading() {
        let metrics = analytics::reconcile(&seed_ventures(), None, now(), start_date());
        let block = summary_block(&metrics);
        assert!(block.contains(LOADING_PLACEHOLDER));
        assert!(block.contains("$0"));
    }
}
