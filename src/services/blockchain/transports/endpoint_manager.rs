//! Rotation between the configured RPC endpoints.

use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::{
	transports::{RotatingTransport, ROTATE_ON_ERROR_CODES},
	BlockChainError,
};

/// Holds the active endpoint plus the fallbacks and sends requests to the active one
///
/// When a request fails with a network error or one of [`ROTATE_ON_ERROR_CODES`], the next
/// fallback that answers is promoted and the request is retried there. The demoted URL goes
/// to the back of the fallback list.
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
}

/// Outcome of a single POST to one endpoint
#[derive(Debug)]
enum AttemptOutcome {
	/// Got a response; the status may still be an error
	Response(reqwest::Response),
	NetworkError(reqwest_middleware::Error),
}

impl EndpointManager {
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			client,
			rotation_lock: Arc::new(Mutex::new(())),
		}
	}

	/// Promotes the first fallback that differs from the active URL and accepts a connection
	pub async fn rotate_url<T: RotatingTransport>(&self, transport: &T) -> Result<(), BlockChainError> {
		let _guard = self.rotation_lock.lock().await;
		let current_active = self.active_url.read().await.clone();

		let candidate = {
			let mut fallback_urls = self.fallback_urls.write().await;
			match fallback_urls.iter().position(|url| url != &current_active) {
				Some(pos) => fallback_urls.remove(pos),
				None => {
					return Err(BlockChainError::connection_error(format!(
						"No fallback URL available to replace {}",
						current_active
					)));
				}
			}
		};

		if let Err(e) = transport.try_connect(&candidate).await {
			self.fallback_urls.write().await.push(candidate.clone());
			return Err(BlockChainError::connection_error(format!(
				"Failed to connect to fallback URL {}: {}",
				candidate, e
			)));
		}
		transport.update_client(&candidate).await?;

		let mut active_url = self.active_url.write().await;
		let mut fallback_urls = self.fallback_urls.write().await;
		tracing::debug!("Rotated RPC endpoint from {} to {}", current_active, candidate);
		fallback_urls.push(current_active);
		*active_url = candidate;
		Ok(())
	}

	/// Rotates when fallbacks exist and, if `status` is given, when it is a rotation status
	///
	/// Returns `Ok(true)` when the caller should retry on the new endpoint.
	async fn try_rotation<T: RotatingTransport>(
		&self,
		transport: &T,
		status: Option<u16>,
	) -> Result<bool, BlockChainError> {
		let should_rotate = {
			let fallback_urls = self.fallback_urls.read().await;
			!fallback_urls.is_empty()
				&& status.is_none_or(|code| ROTATE_ON_ERROR_CODES.contains(&code))
		};

		if !should_rotate {
			return Ok(false);
		}
		self.rotate_url(transport).await?;
		Ok(true)
	}

	async fn attempt<T, P>(&self, url: &str, transport: &T, method: &str, params: Option<P>) -> AttemptOutcome
	where
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	{
		let body = transport.customize_request(method, params).await;
		match self.client.post(url).json(&body).send().await {
			Ok(response) => AttemptOutcome::Response(response),
			Err(e) => AttemptOutcome::NetworkError(e),
		}
	}

	/// Sends `method` to the active endpoint, rotating on rate limits and network failures
	///
	/// Every fallback is tried at most once per call, so a fully unavailable provider fails
	/// instead of looping.
	pub async fn send_raw_request<T, P>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	{
		let max_rotations = self.fallback_urls.read().await.len();
		let mut rotations = 0;

		loop {
			let current_url = self.active_url.read().await.clone();
			let outcome = self
				.attempt(&current_url, transport, method, params.clone())
				.await;

			let (status, failure) = match outcome {
				AttemptOutcome::Response(response) if response.status().is_success() => {
					return response.json::<Value>().await.map_err(|e| {
						BlockChainError::request_error(format!(
							"Failed to parse JSON response from {}: {}",
							current_url, e
						))
					});
				}
				AttemptOutcome::Response(response) => {
					let status = response.status();
					let body = response.text().await.unwrap_or_default();
					tracing::warn!(
						"Request {} to {} failed with status {}: {}",
						method,
						current_url,
						status,
						body
					);
					(
						Some(status.as_u16()),
						format!("HTTP {} from {}: {}", status, current_url, body),
					)
				}
				AttemptOutcome::NetworkError(e) => {
					tracing::warn!("Network error sending {} to {}: {}", method, current_url, e);
					(None, format!("Failed to reach {}: {}", current_url, e))
				}
			};

			if rotations < max_rotations && self.try_rotation(transport, status).await? {
				rotations += 1;
				continue;
			}

			return Err(match status {
				Some(_) => BlockChainError::request_error(failure),
				None => BlockChainError::connection_error(failure),
			});
		}
	}
}
