//! EVM-compatible chain data client.
//!
//! Head height, gas parameters and block summaries come from the standard `eth_*` JSON-RPC
//! methods; token metadata and balances are read with `eth_call` against the ERC-20 interface.

use alloy::{
	primitives::{hex, Address, U256, U64},
	sol,
	sol_types::SolCall,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
	models::{BlockSummary, DashboardConfig, FeeTiers, GasParameters},
	services::blockchain::{
		client::{ChainQueryClient, TokenQueryClient},
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
};

sol! {
	interface IERC20 {
		function name() external view returns (string);
		function symbol() external view returns (string);
		function decimals() external view returns (uint8);
		function totalSupply() external view returns (uint256);
		function balanceOf(address owner) external view returns (uint256);
	}
}

/// Number of past blocks sampled by `eth_feeHistory`
const FEE_HISTORY_BLOCKS: u64 = 4;

/// Reward percentiles backing the low, medium and high fee tiers
const FEE_PERCENTILES: [f64; 3] = [10.0, 50.0, 90.0];

/// Client for Ethereum and other EVM-compatible chains
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	transport: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl EvmClient<HttpTransportClient> {
	/// Connects to the RPC endpoints in `config`
	pub async fn new(config: &DashboardConfig) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(config).await?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Subset of an `eth_getBlockByNumber` result the dashboard needs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcBlock {
	number: U64,
	hash: Option<String>,
	timestamp: U64,
	#[serde(default)]
	transactions: Vec<Value>,
	gas_used: U256,
	#[serde(default)]
	gas_limit: U256,
	#[serde(default)]
	base_fee_per_gas: Option<U256>,
	#[serde(default)]
	size: Option<U64>,
}

impl From<RpcBlock> for BlockSummary {
	fn from(block: RpcBlock) -> Self {
		Self {
			height: block.number.to::<u64>(),
			hash: block.hash.unwrap_or_default(),
			timestamp_seconds: block.timestamp.to::<u64>(),
			tx_count: block.transactions.len() as u64,
			gas_used: block.gas_used,
			size_bytes: block.size.map(|size| size.to::<u64>()).unwrap_or_default(),
		}
	}
}

/// `eth_feeHistory` result
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeHistory {
	/// One entry per sampled block plus the projected next block
	#[serde(default)]
	pub base_fee_per_gas: Vec<U256>,
	/// Per sampled block, one reward per requested percentile
	#[serde(default)]
	pub reward: Option<Vec<Vec<U256>>>,
}

/// Turns a fee history into low/medium/high tiers
///
/// Each tier is the projected next base fee plus the average priority reward at its
/// percentile. Without reward data every tier falls back to `gas_price`.
pub fn fee_tiers_from_history(history: &FeeHistory, gas_price: U256) -> FeeTiers {
	let rewards = match history.reward.as_deref() {
		Some(rewards) if !rewards.is_empty() => rewards,
		_ => {
			return FeeTiers {
				low: gas_price,
				medium: gas_price,
				high: gas_price,
			}
		}
	};
	let next_base_fee = history.base_fee_per_gas.last().copied().unwrap_or_default();

	let tier = |index: usize| {
		let samples: Vec<U256> = rewards
			.iter()
			.filter_map(|block| block.get(index).copied())
			.collect();
		if samples.is_empty() {
			return gas_price;
		}
		let total = samples
			.iter()
			.fold(U256::ZERO, |acc, reward| acc.saturating_add(*reward));
		next_base_fee.saturating_add(total / U256::from(samples.len()))
	};

	FeeTiers {
		low: tier(0),
		medium: tier(1),
		high: tier(2),
	}
}

fn parse_address(value: &str) -> Result<Address, BlockChainError> {
	value.trim().parse::<Address>().map_err(|e| {
		BlockChainError::request_error(format!("Invalid address {}: {}", value, e))
	})
}

fn parse_quantity(value: &Value, what: &str) -> Result<U256, BlockChainError> {
	serde_json::from_value::<U256>(value.clone())
		.map_err(|e| BlockChainError::request_error(format!("Invalid {} {}: {}", what, value, e)))
}

impl<T: Send + Sync + Clone + BlockchainTransport> EvmClient<T> {
	/// Sends `method` and returns the `result` member, turning JSON-RPC errors into `RequestError`
	async fn request(&self, method: &str, params: Value) -> Result<Value, BlockChainError> {
		let response = self.transport.send_raw_request(method, Some(params)).await?;

		if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error");
			return Err(BlockChainError::request_error(format!(
				"{} failed: {}",
				method, message
			)));
		}

		response.get("result").cloned().ok_or_else(|| {
			BlockChainError::request_error(format!("Missing 'result' field in {} response", method))
		})
	}

	/// Fetches a block by tag or hex height; `None` when the provider does not know it
	async fn fetch_block(&self, tag: String) -> Result<Option<RpcBlock>, BlockChainError> {
		let result = self
			.request("eth_getBlockByNumber", json!([tag, false]))
			.await?;
		if result.is_null() {
			return Ok(None);
		}
		Ok(Some(serde_json::from_value(result)?))
	}

	async fn gas_price(&self) -> Result<U256, BlockChainError> {
		let result = self.request("eth_gasPrice", json!([])).await?;
		parse_quantity(&result, "gas price")
	}

	/// Fee history is optional on some chains; failures degrade to an empty history
	async fn fee_history(&self) -> Result<FeeHistory, BlockChainError> {
		let params = json!([format!("{:#x}", FEE_HISTORY_BLOCKS), "latest", FEE_PERCENTILES]);
		match self.request("eth_feeHistory", params).await {
			Ok(result) => match serde_json::from_value(result) {
				Ok(history) => Ok(history),
				Err(e) => {
					tracing::debug!("Malformed eth_feeHistory response, using gas price: {}", e);
					Ok(FeeHistory::default())
				}
			},
			Err(e) => {
				tracing::debug!("eth_feeHistory unavailable, using gas price: {}", e);
				Ok(FeeHistory::default())
			}
		}
	}

	/// Executes a read-only ERC-20 call and decodes its return value
	async fn call<C: SolCall + Send>(&self, contract: &str, call: C) -> Result<C::Return, BlockChainError> {
		let to = parse_address(contract)?;
		let data = hex::encode_prefixed(call.abi_encode());
		let result = self
			.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
			.await?;

		let encoded = result.as_str().ok_or_else(|| {
			BlockChainError::contract_call_error(format!(
				"{} on {} returned a non-string result",
				C::SIGNATURE,
				contract
			))
		})?;
		let bytes = hex::decode(encoded).map_err(|e| {
			BlockChainError::contract_call_error(format!(
				"{} on {} returned invalid hex: {}",
				C::SIGNATURE,
				contract,
				e
			))
		})?;
		C::abi_decode_returns(&bytes).map_err(|e| {
			BlockChainError::contract_call_error(format!(
				"Failed to decode {} from {}: {}",
				C::SIGNATURE,
				contract,
				e
			))
		})
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> ChainQueryClient for EvmClient<T> {
	async fn get_head_height(&self) -> Result<u64, BlockChainError> {
		let result = self.request("eth_blockNumber", json!([])).await?;
		let height = parse_quantity(&result, "block number")?;
		u64::try_from(height)
			.map_err(|_| BlockChainError::request_error(format!("Block number {} out of range", height)))
	}

	async fn get_gas_parameters(&self) -> Result<GasParameters, BlockChainError> {
		let (latest, gas_price, history) = tokio::try_join!(
			self.fetch_block("latest".to_string()),
			self.gas_price(),
			self.fee_history(),
		)?;
		let latest = latest.ok_or_else(|| {
			BlockChainError::request_error("Provider returned no latest block".to_string())
		})?;

		Ok(GasParameters {
			target_gas_limit: latest.gas_limit,
			base_gas: latest.base_fee_per_gas.unwrap_or_default(),
			gas_per_sat: gas_price,
			fee_tiers: fee_tiers_from_history(&history, gas_price),
		})
	}

	async fn get_block(&self, height: u64) -> Result<BlockSummary, BlockChainError> {
		match self.fetch_block(format!("{:#x}", height)).await? {
			Some(block) => Ok(block.into()),
			None => Err(BlockChainError::block_not_found(height)),
		}
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> TokenQueryClient for EvmClient<T> {
	async fn token_name(&self, contract: &str) -> Result<String, BlockChainError> {
		self.call(contract, IERC20::nameCall {}).await
	}

	async fn token_symbol(&self, contract: &str) -> Result<String, BlockChainError> {
		self.call(contract, IERC20::symbolCall {}).await
	}

	async fn token_decimals(&self, contract: &str) -> Result<u8, BlockChainError> {
		self.call(contract, IERC20::decimalsCall {}).await
	}

	async fn total_supply(&self, contract: &str) -> Result<U256, BlockChainError> {
		self.call(contract, IERC20::totalSupplyCall {}).await
	}

	async fn balance_of(&self, contract: &str, owner: &str) -> Result<U256, BlockChainError> {
		let owner = parse_address(owner)?;
		self.call(contract, IERC20::balanceOfCall { owner }).await
	}
}
