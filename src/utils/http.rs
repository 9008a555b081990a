//! HTTP client construction shared by every outbound call the dashboard makes.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use std::time::Duration;

/// Timeouts and retry behavior for outbound HTTP requests
#[derive(Debug, Clone)]
pub struct HttpRetryConfig {
	/// Retries for transient failures (5xx, timeouts, resets), on top of the first attempt
	pub max_retries: u32,
	/// Base of the exponential backoff
	pub base_for_backoff: u32,
	pub initial_backoff: Duration,
	pub max_backoff: Duration,
	pub jitter: Jitter,
	/// Whole-request timeout
	pub request_timeout: Duration,
	pub connect_timeout: Duration,
}

impl Default for HttpRetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			base_for_backoff: 2,
			initial_backoff: Duration::from_millis(250),
			max_backoff: Duration::from_secs(10),
			jitter: Jitter::Full,
			request_timeout: Duration::from_secs(30),
			connect_timeout: Duration::from_secs(20),
		}
	}
}

impl HttpRetryConfig {
	/// A configuration that never retries, used where the caller handles failure itself
	pub fn without_retries() -> Self {
		Self {
			max_retries: 0,
			..Self::default()
		}
	}
}

/// Builds the plain reqwest client with pooling and the configured timeouts
pub fn create_base_http_client(config: &HttpRetryConfig) -> Result<reqwest::Client, reqwest::Error> {
	reqwest::ClientBuilder::new()
		.pool_idle_timeout(Duration::from_secs(90))
		.pool_max_idle_per_host(32)
		.timeout(config.request_timeout)
		.connect_timeout(config.connect_timeout)
		.build()
}

/// Wraps `base_client` with exponential-backoff retries for transient errors
pub fn create_retryable_http_client(
	config: &HttpRetryConfig,
	base_client: reqwest::Client,
) -> ClientWithMiddleware {
	let retry_policy = ExponentialBackoff::builder()
		.base(config.base_for_backoff)
		.retry_bounds(config.initial_backoff, config.max_backoff)
		.jitter(config.jitter)
		.build_with_max_retries(config.max_retries);

	ClientBuilder::new(base_client)
		.with(RetryTransientMiddleware::new_with_policy(retry_policy))
		.build()
}
