//! Chain dashboard service.
//!
//! Polls the chain head of the configured network, tracks the configured token contracts for
//! the connected account and logs every change. Optionally exposes Prometheus metrics.
//!
//! # Usage
//! ```bash
//! chain-dashboard [--config <PATH>] [--log-level <LEVEL>] [--metrics] [--metrics-address <HOST:PORT>] [--once]
//! ```

use chain_dashboard::{
	bootstrap::{
		describe_holdings, describe_pulse_view, initialize_services, load_config, seed_holdings,
		spawn_view_logger, Result,
	},
	utils::{
		logging::setup_logging,
		metrics::{register_metrics, server::create_metrics_server},
	},
};

use clap::{Arg, Command};
use dotenvy::dotenv;
use std::env::var;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
	let matches = Command::new("chain-dashboard")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Keeps a live view of the chain head and of the connected account's token holdings.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the dashboard configuration (default: config/dashboard.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("identity")
				.long("identity")
				.help("Account whose balances are read, overriding the configuration")
				.value_name("ADDRESS"),
		)
		.arg(
			Arg::new("metrics-address")
				.long("metrics-address")
				.help("Address to start the metrics server on (default: 127.0.0.1:8081)")
				.value_name("HOST:PORT"),
		)
		.arg(
			Arg::new("metrics")
				.long("metrics")
				.help("Enable metrics server")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("once")
				.long("once")
				.help("Poll once, print the dashboard and exit")
				.action(clap::ArgAction::SetTrue),
		)
		.get_matches();

	dotenv().ok();

	let log_level = matches
		.get_one::<String>("log-level")
		.cloned()
		.or_else(|| var("LOG_LEVEL").ok());
	setup_logging(log_level.as_deref()).unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let mut config = load_config(matches.get_one::<String>("config").map(String::as_str))?;
	if let Some(identity) = matches.get_one::<String>("identity") {
		config.identity = Some(identity.clone());
	}
	let tracked_contracts = config.tracked_contracts.clone();

	let services = initialize_services(config).await?;
	register_metrics();

	let failures = seed_holdings(&services.ledger, &tracked_contracts).await;
	if !failures.is_empty() {
		error!(
			"{} of {} configured contracts could not be tracked",
			failures.len(),
			tracked_contracts.len()
		);
	}

	if matches.get_flag("once") {
		if !services.pulse.poll_once().await {
			return Err("Failed to fetch chain state".into());
		}
		info!("{}", describe_pulse_view(&services.pulse.view()));
		for line in describe_holdings(&services.ledger.holdings().await) {
			info!("{}", line);
		}
		return Ok(());
	}

	let metrics_enabled =
		matches.get_flag("metrics") || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);
	let metrics_address = matches
		.get_one::<String>("metrics-address")
		.cloned()
		.unwrap_or_else(|| "127.0.0.1:8081".to_string());

	let metrics_server = if metrics_enabled {
		match create_metrics_server(metrics_address) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	for line in describe_holdings(&services.ledger.holdings().await) {
		info!("{}", line);
	}
	let view_logger = spawn_view_logger(services.pulse.subscribe());
	services.pulse.start(services.poll_interval());

	info!("Dashboard started. Press Ctrl+C to shutdown");

	let ctrl_c = tokio::signal::ctrl_c();
	if let Some(metrics_future) = metrics_server {
		tokio::select! {
			result = ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping services...");
			}
			result = metrics_future => {
				if let Err(e) = result {
					error!("Metrics server error: {}", e);
				}
				info!("Metrics server stopped, shutting down services...");
			}
		}
	} else {
		let _ = ctrl_c.await;
		info!("Shutdown signal received, stopping services...");
	}

	services.pulse.stop();
	view_logger.abort();

	info!("Shutdown complete");
	Ok(())
}
