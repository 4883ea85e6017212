use super::{report, ui};
use crate::core::Venture;
use crate::core::analytics::ordinary_revenue;
use crate::core::format::format_currency;
use crate::store::{DeleteOutcome, KeyValueStore, VentureStore};
use anyhow::Result;
use tracing::info;

/// Prints the saved ventures without touching the network.
pub fn list<S: KeyValueStore>(store: &VentureStore<S>) -> Result<()> {
    let ventures = store.load();
    println!("{}", report::ventures_table(&ventures, false));
    println!("\n{}", offline_total(&ventures));
    Ok(())
}

/// Total line for the offline listing. The crypto revenue is shown as
/// pending there, so it stays out of the sum.
pub fn offline_total(ventures: &[Venture]) -> String {
    format!(
        "{}: {}",
        ui::style_text(
            "Total venture revenue (excluding crypto)",
            ui::StyleType::TotalLabel
        ),
        ui::style_text(
            &format_currency(ordinary_revenue(ventures)),
            ui::StyleType::TotalValue
        )
    )
}

pub fn add<S: KeyValueStore>(
    store: &VentureStore<S>,
    name: &str,
    revenue: &str,
    expenses: &str,
) -> Result<()> {
    let ventures = store.load();
    let updated = store.add(&ventures, name, revenue, expenses)?;

    match updated.last() {
        Some(added) if updated.len() > ventures.len() => {
            info!(id = added.id(), "Added venture");
            println!(
                "Added {} (id {})",
                ui::style_text(added.name(), ui::StyleType::Title),
                added.id()
            );
        }
        _ => println!(
            "{}",
            ui::style_text("Nothing added: a venture needs a name", ui::StyleType::Subtle)
        ),
    }
    Ok(())
}

pub fn delete<S: KeyValueStore>(store: &VentureStore<S>, id: u64) -> Result<()> {
    let ventures = store.load();
    let (_, outcome) = store.delete(&ventures, id)?;

    let message = match outcome {
        DeleteOutcome::Removed => {
            info!(id, "Deleted venture");
            ui::style_text(&format!("Deleted venture {id}"), ui::StyleType::TotalLabel)
        }
        DeleteOutcome::Protected => ui::style_text(
            "The crypto venture is the only one making money. It stays.",
            ui::StyleType::Warning,
        ),
        DeleteOutcome::NotFound => ui::style_text(
            &format!("No venture with id {id}"),
            ui::StyleType::Error,
        ),
    };
    println!("{message}");
    Ok(())
}

pub fn reset<S: KeyValueStore>(store: &VentureStore<S>) -> Result<()> {
    let seed = store.reset()?;
    info!(count = seed.len(), "Restored seed ventures");
    println!("Restored {} seed ventures", seed.len());
    Ok(())
}
