//! Mock and fake chain data clients.
//!
//! [`MockChainClient`] covers call expectations. [`FakeChain`] and [`FakeTokenClient`] are
//! stateful stand-ins for tests that drive time or interleave calls, which mockall's
//! synchronous `returning` closures cannot express.

use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
		Mutex,
	},
	time::Duration,
};

use alloy::primitives::U256;
use async_trait::async_trait;
use mockall::mock;
use tokio::sync::{Notify, Semaphore};

use chain_dashboard::{
	models::{BlockSummary, GasParameters},
	services::blockchain::{BlockChainError, ChainQueryClient, TokenQueryClient},
};

mock! {
	/// Mock provider implementing both query traits
	pub ChainClient {}

	#[async_trait]
	impl ChainQueryClient for ChainClient {
		async fn get_head_height(&self) -> Result<u64, BlockChainError>;
		async fn get_gas_parameters(&self) -> Result<GasParameters, BlockChainError>;
		async fn get_block(&self, height: u64) -> Result<BlockSummary, BlockChainError>;
	}

	#[async_trait]
	impl TokenQueryClient for ChainClient {
		async fn token_name(&self, contract: &str) -> Result<String, BlockChainError>;
		async fn token_symbol(&self, contract: &str) -> Result<String, BlockChainError>;
		async fn token_decimals(&self, contract: &str) -> Result<u8, BlockChainError>;
		async fn total_supply(&self, contract: &str) -> Result<U256, BlockChainError>;
		async fn balance_of(&self, contract: &str, owner: &str) -> Result<U256, BlockChainError>;
	}
}

/// Chain whose head height and availability are set by the test
///
/// When gated, `get_head_height` signals [`entered`](Self::entered) and then blocks until
/// [`release`](Self::release) is called.
pub struct FakeChain {
	height: AtomicU64,
	failing: AtomicBool,
	gated: AtomicBool,
	gate: Semaphore,
	pub entered: Notify,
	pub head_calls: AtomicUsize,
}

impl FakeChain {
	pub fn new(height: u64) -> Self {
		Self {
			height: AtomicU64::new(height),
			failing: AtomicBool::new(false),
			gated: AtomicBool::new(false),
			gate: Semaphore::new(0),
			entered: Notify::new(),
			head_calls: AtomicUsize::new(0),
		}
	}

	pub fn gated(height: u64) -> Self {
		let chain = Self::new(height);
		chain.gated.store(true, Ordering::SeqCst);
		chain
	}

	pub fn set_height(&self, height: u64) {
		self.height.store(height, Ordering::SeqCst);
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	/// Lets the blocked call through and stops gating later calls
	pub fn release(&self) {
		self.gated.store(false, Ordering::SeqCst);
		self.gate.add_permits(1);
	}

	pub fn head_calls(&self) -> usize {
		self.head_calls.load(Ordering::SeqCst)
	}

	fn check(&self) -> Result<(), BlockChainError> {
		if self.failing.load(Ordering::SeqCst) {
			return Err(BlockChainError::connection_error("provider unreachable"));
		}
		Ok(())
	}
}

#[async_trait]
impl ChainQueryClient for FakeChain {
	async fn get_head_height(&self) -> Result<u64, BlockChainError> {
		self.head_calls.fetch_add(1, Ordering::SeqCst);
		if self.gated.load(Ordering::SeqCst) {
			self.entered.notify_one();
			if let Ok(permit) = self.gate.acquire().await {
				permit.forget();
			}
		}
		self.check()?;
		Ok(self.height.load(Ordering::SeqCst))
	}

	async fn get_gas_parameters(&self) -> Result<GasParameters, BlockChainError> {
		self.check()?;
		Ok(GasParameters {
			base_gas: U256::from(7),
			..GasParameters::default()
		})
	}

	async fn get_block(&self, height: u64) -> Result<BlockSummary, BlockChainError> {
		self.check()?;
		Ok(BlockSummary::at_height(height))
	}
}

/// Token metadata served by [`FakeTokenClient`]
#[derive(Clone, Debug)]
pub struct FakeToken {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub total_supply: U256,
}

impl FakeToken {
	pub fn new(symbol: &str, decimals: u8, total_supply: u64) -> Self {
		Self {
			name: format!("{} Token", symbol),
			symbol: symbol.to_string(),
			decimals,
			total_supply: U256::from(total_supply),
		}
	}
}

/// In-memory token registry with optional latency on metadata reads
#[derive(Default)]
pub struct FakeTokenClient {
	tokens: Mutex<HashMap<String, FakeToken>>,
	balances: Mutex<HashMap<(String, String), U256>>,
	failing_metadata: AtomicBool,
	failing_balance: AtomicBool,
	metadata_delay: Mutex<Option<Duration>>,
	pub balance_calls: AtomicUsize,
}

impl FakeTokenClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_token(self, address: &str, token: FakeToken) -> Self {
		self.tokens.lock().unwrap().insert(address.to_string(), token);
		self
	}

	pub fn set_balance(&self, address: &str, owner: &str, balance: u64) {
		self.balances
			.lock()
			.unwrap()
			.insert((address.to_string(), owner.to_string()), U256::from(balance));
	}

	pub fn set_failing_metadata(&self, failing: bool) {
		self.failing_metadata.store(failing, Ordering::SeqCst);
	}

	pub fn set_failing_balance(&self, failing: bool) {
		self.failing_balance.store(failing, Ordering::SeqCst);
	}

	pub fn set_metadata_delay(&self, delay: Duration) {
		*self.metadata_delay.lock().unwrap() = Some(delay);
	}

	async fn token(&self, address: &str) -> Result<FakeToken, BlockChainError> {
		let delay = *self.metadata_delay.lock().unwrap();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		if self.failing_metadata.load(Ordering::SeqCst) {
			return Err(BlockChainError::contract_call_error("execution reverted"));
		}
		self.tokens
			.lock()
			.unwrap()
			.get(address)
			.cloned()
			.ok_or_else(|| BlockChainError::contract_call_error(format!("no code at {}", address)))
	}
}

#[async_trait]
impl TokenQueryClient for FakeTokenClient {
	async fn token_name(&self, contract: &str) -> Result<String, BlockChainError> {
		Ok(self.token(contract).await?.name)
	}

	async fn token_symbol(&self, contract: &str) -> Result<String, BlockChainError> {
		Ok(self.token(contract).await?.symbol)
	}

	async fn token_decimals(&self, contract: &str) -> Result<u8, BlockChainError> {
		Ok(self.token(contract).await?.decimals)
	}

	async fn total_supply(&self, contract: &str) -> Result<U256, BlockChainError> {
		Ok(self.token(contract).await?.total_supply)
	}

	async fn balance_of(&self, contract: &str, owner: &str) -> Result<U256, BlockChainError> {
		self.balance_calls.fetch_add(1, Ordering::SeqCst);
		if self.failing_balance.load(Ordering::SeqCst) {
			return Err(BlockChainError::contract_call_error("balanceOf reverted"));
		}
		Ok(self
			.balances
			.lock()
			.unwrap()
			.get(&(contract.to_string(), owner.to_string()))
			.copied()
			.unwrap_or_default())
	}
}
