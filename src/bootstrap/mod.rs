//! Bootstrap module for wiring the dashboard together.
//!
//! Loads the configuration, connects the chain data client and builds the pulse service and
//! holdings ledger around it. Also hosts the log-based presentation of published state,
//! which stands in for a UI when running headless.

use std::{env::var, error::Error, path::PathBuf, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::{
	models::{ConfigLoader, DashboardConfig, HoldingsCollection, PulseView, DEFAULT_CONFIG_PATH},
	services::{
		blockchain::{ChainQueryClient, EvmClient, HttpTransportClient, TokenQueryClient},
		holdings::{HoldingsLedger, LedgerError},
		identity::{IdentityProvider, WatchIdentityProvider},
		pulse::ChainPulse,
	},
};

/// Result type shared by bootstrap and the binary
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Chain client used by the binary
pub type DashboardClient = EvmClient<HttpTransportClient>;

/// Everything the binary runs, built from one configuration
pub struct DashboardServices<C: ChainQueryClient + TokenQueryClient + 'static, I: IdentityProvider> {
	pub config: DashboardConfig,
	pub pulse: Arc<ChainPulse<C>>,
	pub ledger: Arc<HoldingsLedger<C, I>>,
	pub identity: Arc<I>,
}

/// Resolves the configuration path: explicit argument, then `DASHBOARD_CONFIG`, then default
pub fn resolve_config_path(path: Option<&str>) -> PathBuf {
	path.map(str::to_string)
		.or_else(|| var("DASHBOARD_CONFIG").ok().filter(|p| !p.trim().is_empty()))
		.unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
		.into()
}

/// Loads and validates the configuration at `path`
pub fn load_config(path: Option<&str>) -> Result<DashboardConfig> {
	let path = resolve_config_path(path);
	info!("Loading configuration from {}", path.display());
	Ok(DashboardConfig::load_from_path(&path)?)
}

/// Connects to the configured RPC endpoints and builds the services around the client
pub async fn initialize_services(
	config: DashboardConfig,
) -> Result<DashboardServices<DashboardClient, WatchIdentityProvider>> {
	let client = Arc::new(EvmClient::new(&config).await?);
	let identity = Arc::new(WatchIdentityProvider::new(config.identity.clone()));
	Ok(build_services(config, client, identity))
}

/// Builds the services around an existing client and identity provider
pub fn build_services<C, I>(config: DashboardConfig, client: Arc<C>, identity: Arc<I>) -> DashboardServices<C, I>
where
	C: ChainQueryClient + TokenQueryClient + 'static,
	I: IdentityProvider,
{
	DashboardServices {
		pulse: Arc::new(ChainPulse::new(Arc::clone(&client))),
		ledger: Arc::new(HoldingsLedger::new(client, Arc::clone(&identity))),
		identity,
		config,
	}
}

impl<C: ChainQueryClient + TokenQueryClient + 'static, I: IdentityProvider> DashboardServices<C, I> {
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.config.poll_interval_ms)
	}
}

/// Adds every configured contract, continuing past failures
///
/// Returns the contracts that could not be added.
pub async fn seed_holdings<C, I>(
	ledger: &HoldingsLedger<C, I>,
	contracts: &[String],
) -> Vec<(String, LedgerError)>
where
	C: TokenQueryClient,
	I: IdentityProvider,
{
	let mut failures = Vec::new();
	for contract in contracts {
		if let Err(e) = ledger.add(contract).await {
			warn!("Could not track configured contract {}: {}", contract, e);
			failures.push((contract.clone(), e));
		}
	}
	failures
}

/// One-line summary of the chain view
pub fn describe_pulse_view(view: &PulseView) -> String {
	let Some(snapshot) = &view.snapshot else {
		return "not yet connected".to_string();
	};
	let recent = snapshot
		.recent_blocks
		.iter()
		.map(|block| block.height.to_string())
		.collect::<Vec<_>>()
		.join(", ");
	format!(
		"height {}{} | base gas {} | gas limit {} | fee tiers {}/{}/{} | recent [{}] | updated {}",
		snapshot.head_height,
		if view.pulse { " (new)" } else { "" },
		snapshot.gas_parameters.base_gas,
		snapshot.gas_parameters.target_gas_limit,
		snapshot.gas_parameters.fee_tiers.low,
		snapshot.gas_parameters.fee_tiers.medium,
		snapshot.gas_parameters.fee_tiers.high,
		recent,
		view.last_updated
			.map(|at| at.to_rfc3339())
			.unwrap_or_default(),
	)
}

/// One line per tracked holding, in insertion order
pub fn describe_holdings(collection: &HoldingsCollection) -> Vec<String> {
	collection
		.holdings()
		.iter()
		.zip(collection.segments())
		.map(|(holding, segment)| {
			format!(
				"{} ({}) {} of {} | {}% of supply | chart {:.2}% {}",
				holding.display_name,
				holding.symbol,
				holding.formatted_balance(),
				holding.formatted_total_supply(),
				holding.supply_share,
				segment.weight,
				segment.color,
			)
		})
		.collect()
}

/// Logs the chain view every time it changes until the sender goes away
pub fn spawn_view_logger(mut views: watch::Receiver<PulseView>) -> JoinHandle<()> {
	tokio::spawn(async move {
		while views.changed().await.is_ok() {
			let line = describe_pulse_view(&views.borrow_and_update());
			info!("{}", line);
		}
	})
}

/// Re-reads balances whenever the identity changes
///
/// The headless binary fixes its identity at startup, so this is for hosts that embed the
/// services and drive [`WatchIdentityProvider::connect`] and
/// [`WatchIdentityProvider::disconnect`] themselves.
pub fn spawn_identity_refresher<C, I>(
	ledger: Arc<HoldingsLedger<C, I>>,
	mut identities: watch::Receiver<Option<String>>,
) -> JoinHandle<()>
where
	C: TokenQueryClient + 'static,
	I: IdentityProvider + 'static,
{
	tokio::spawn(async move {
		while identities.changed().await.is_ok() {
			identities.borrow_and_update();
			for (address, e) in ledger.refresh_all().await {
				warn!("Could not refresh {} after identity change: {}", address, e);
			}
		}
	})
}
