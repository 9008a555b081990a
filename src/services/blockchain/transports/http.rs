//! JSON-RPC over HTTP with weighted endpoint selection.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
	models::DashboardConfig,
	services::blockchain::{
		transports::{BlockchainTransport, EndpointManager, RotatingTransport},
		BlockChainError,
	},
	utils::http::{create_base_http_client, create_retryable_http_client, HttpRetryConfig},
};

/// HTTP transport client for a chain data provider
///
/// Endpoints are tried in descending weight order at construction; the first one that
/// answers becomes active and the rest become fallbacks. The client is cheap to clone and
/// safe to share between tasks.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Plain client used for connection probes, without retries
	probe_client: reqwest::Client,
	endpoint_manager: EndpointManager,
}

impl HttpTransportClient {
	/// Connects to the highest weighted RPC URL in `config` that answers a probe
	pub async fn new(config: &DashboardConfig) -> Result<Self, BlockChainError> {
		Self::with_retry_config(config, &HttpRetryConfig::default()).await
	}

	pub async fn with_retry_config(
		config: &DashboardConfig,
		retry_config: &HttpRetryConfig,
	) -> Result<Self, BlockChainError> {
		let mut rpc_urls: Vec<_> = config
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();
		rpc_urls.sort_by(|a, b| b.weight.cmp(&a.weight));

		let probe_client = create_base_http_client(retry_config).map_err(|e| {
			BlockChainError::internal_error(format!("Failed to create HTTP client: {}", e))
		})?;
		let client = create_retryable_http_client(retry_config, probe_client.clone());

		for rpc_url in rpc_urls.iter() {
			if let Err(e) = probe(&probe_client, &rpc_url.url).await {
				tracing::warn!("Skipping RPC URL {}: {}", rpc_url.url, e);
				continue;
			}

			let fallback_urls = rpc_urls
				.iter()
				.filter(|other| other.url != rpc_url.url)
				.map(|other| other.url.clone())
				.collect();

			tracing::info!("Connected to RPC URL {}", rpc_url.url);
			return Ok(Self {
				probe_client,
				endpoint_manager: EndpointManager::new(client, &rpc_url.url, fallback_urls),
			});
		}

		Err(BlockChainError::connection_error(format!(
			"All RPC URLs for {} failed to connect",
			config.name
		)))
	}
}

/// Sends `net_version` to `url` and requires a successful HTTP status
async fn probe(client: &reqwest::Client, url: &str) -> Result<(), BlockChainError> {
	let url = Url::parse(url)
		.map_err(|e| BlockChainError::connection_error(format!("Invalid URL {}: {}", url, e)))?;
	let request = json!({
		"jsonrpc": "2.0",
		"id": 1,
		"method": "net_version",
		"params": []
	});

	let response = client
		.post(url.clone())
		.json(&request)
		.send()
		.await
		.map_err(|e| BlockChainError::connection_error(format!("Failed to reach {}: {}", url, e)))?;

	if !response.status().is_success() {
		return Err(BlockChainError::connection_error(format!(
			"{} answered with status {}",
			url,
			response.status()
		)));
	}
	Ok(())
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), BlockChainError> {
		probe(&self.probe_client, url).await
	}

	/// Requests always go to the endpoint manager's active URL, so only the URL changes
	async fn update_client(&self, _url: &str) -> Result<(), BlockChainError> {
		Ok(())
	}
}
