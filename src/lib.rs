pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::MarketDataFetcher;
use crate::core::config::AppConfig;
use crate::core::price::HistoryProvider;
use crate::store::disk::DiskStore;
use crate::store::memory::MemoryStore;
use crate::store::{KeyValueStore, VentureStore};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Show,
    List,
    Add {
        name: String,
        revenue: String,
        expenses: String,
    },
    Delete {
        id: u64,
    },
    Reset,
}

/// Where the venture list lives for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    Disk,
    /// Nothing is written to disk; every run starts from the seed list.
    Ephemeral,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    storage: StorageMode,
) -> Result<()> {
    info!("hustle starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match storage {
        StorageMode::Disk => {
            let data_path = config.default_data_path()?;
            let store = VentureStore::new(DiskStore::open(&data_path)?);
            dispatch(command, &config, &store).await
        }
        StorageMode::Ephemeral => {
            let store = VentureStore::new(MemoryStore::new());
            dispatch(command, &config, &store).await
        }
    }
}

async fn dispatch<S: KeyValueStore>(
    command: AppCommand,
    config: &AppConfig,
    store: &VentureStore<S>,
) -> Result<()> {
    match command {
        AppCommand::Show => {
            let fetcher = build_fetcher(config);
            cli::report::run(store, &fetcher, chrono::Utc::now()).await
        }
        AppCommand::List => cli::ventures::list(store),
        AppCommand::Add {
            name,
            revenue,
            expenses,
        } => cli::ventures::add(store, &name, &revenue, &expenses),
        AppCommand::Delete { id } => cli::ventures::delete(store, id),
        AppCommand::Reset => cli::ventures::reset(store),
    }
}

/// Wires the configured providers into a fetcher: primary Yahoo host, then
/// the alternate host when one is configured.
pub fn build_fetcher(config: &AppConfig) -> MarketDataFetcher {
    let defaults = crate::core::config::ProvidersConfig::default();
    let yahoo = config
        .providers
        .yahoo
        .clone()
        .or(defaults.yahoo)
        .map(|y| (y.base_url, y.alternate_base_url));
    let coingecko_url = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com/api/v3", |p| &p.base_url);

    let mut routes: Vec<Box<dyn HistoryProvider>> = Vec::new();
    if let Some((base_url, alternate)) = yahoo {
        routes.push(Box::new(providers::yahoo_finance::YahooHistoryProvider::new(
            "yahoo-primary",
            &base_url,
        )));
        if let Some(alternate) = alternate {
            routes.push(Box::new(providers::yahoo_finance::YahooHistoryProvider::new(
                "yahoo-alternate",
                &alternate,
            )));
        }
    }

    MarketDataFetcher::new(
        routes,
        Box::new(providers::coingecko::CoinGeckoProvider::new(coingecko_url)),
    )
}
