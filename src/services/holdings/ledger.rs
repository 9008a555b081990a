//! Tracked token contracts and the connected account's share of each supply.

use alloy::primitives::U256;
use futures::future::join_all;
use std::{
	collections::HashSet,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
	models::{ChartSegment, HoldingsCollection, TrackedHolding},
	services::{
		blockchain::TokenQueryClient, holdings::LedgerError, identity::IdentityProvider,
	},
	utils::metrics::HOLDINGS_TRACKED,
};

/// Manages the set of tracked token contracts
///
/// Additions become visible in one step once all metadata has been read; a failed add
/// leaves nothing behind. Readers get owned snapshots of the collection.
pub struct HoldingsLedger<C: TokenQueryClient, I: IdentityProvider> {
	client: Arc<C>,
	identity: Arc<I>,
	collection: RwLock<HoldingsCollection>,
	/// Addresses whose add is still fetching metadata
	pending: Arc<Mutex<HashSet<String>>>,
}

/// Holds an address in the pending set until dropped, even if the add is cancelled
struct Reservation {
	pending: Arc<Mutex<HashSet<String>>>,
	address: String,
}

impl Drop for Reservation {
	fn drop(&mut self) {
		lock_pending(&self.pending).remove(&self.address);
	}
}

fn lock_pending(pending: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
	pending.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<C: TokenQueryClient, I: IdentityProvider> HoldingsLedger<C, I> {
	pub fn new(client: Arc<C>, identity: Arc<I>) -> Self {
		Self {
			client,
			identity,
			collection: RwLock::new(HoldingsCollection::new()),
			pending: Arc::new(Mutex::new(HashSet::new())),
		}
	}

	/// Starts tracking the token at `address`
	///
	/// The trimmed address is the key. Name, symbol, decimals and total supply are read
	/// concurrently and must all succeed. The balance is read for the current identity if
	/// there is one; a failed balance read counts as zero.
	pub async fn add(&self, address: &str) -> Result<TrackedHolding, LedgerError> {
		let address = address.trim();
		if address.is_empty() {
			return Err(LedgerError::validation_error(
				"Contract address must not be empty",
			));
		}

		let reservation = self.reserve(address).await?;
		let holding = self.fetch_holding(address).await?;

		let mut collection = self.collection.write().await;
		collection.insert(holding.clone());
		drop(reservation);
		HOLDINGS_TRACKED.set(collection.len() as i64);
		info!(
			"Tracking {} ({}) at {}, share {}%",
			holding.display_name, holding.symbol, address, holding.supply_share
		);
		Ok(holding)
	}

	/// Claims `address` for an add, rejecting tracked and in-flight addresses alike
	async fn reserve(&self, address: &str) -> Result<Reservation, LedgerError> {
		let collection = self.collection.read().await;
		if collection.contains(address) {
			return Err(LedgerError::duplicate_address(address));
		}
		if !lock_pending(&self.pending).insert(address.to_string()) {
			return Err(LedgerError::duplicate_address(address));
		}
		Ok(Reservation {
			pending: Arc::clone(&self.pending),
			address: address.to_string(),
		})
	}

	/// Stops tracking `address`; does nothing if it is not tracked
	pub async fn remove(&self, address: &str) -> Option<TrackedHolding> {
		let address = address.trim();
		let mut collection = self.collection.write().await;
		let removed = collection.remove(address);
		match &removed {
			Some(_) => {
				HOLDINGS_TRACKED.set(collection.len() as i64);
				info!("Stopped tracking {}", address);
			}
			None => debug!("Ignoring removal of untracked contract {}", address),
		}
		removed
	}

	/// Re-reads metadata and balance for a tracked contract and replaces it in place
	///
	/// On failure the existing entry is kept unchanged.
	pub async fn refresh(&self, address: &str) -> Result<TrackedHolding, LedgerError> {
		let address = address.trim();
		if !self.collection.read().await.contains(address) {
			return Err(LedgerError::not_tracked(address));
		}

		let holding = self.fetch_holding(address).await?;
		if !self.collection.write().await.replace(holding.clone()) {
			return Err(LedgerError::not_tracked(address));
		}
		debug!("Refreshed {}", address);
		Ok(holding)
	}

	/// Refreshes every tracked contract concurrently and returns the ones that failed
	pub async fn refresh_all(&self) -> Vec<(String, LedgerError)> {
		let addresses: Vec<String> = self
			.collection
			.read()
			.await
			.holdings()
			.iter()
			.map(|holding| holding.contract_address.clone())
			.collect();

		let results = join_all(addresses.iter().map(|address| self.refresh(address))).await;
		addresses
			.into_iter()
			.zip(results)
			.filter_map(|(address, result)| result.err().map(|e| (address, e)))
			.collect()
	}

	async fn fetch_holding(&self, address: &str) -> Result<TrackedHolding, LedgerError> {
		let metadata = async {
			tokio::try_join!(
				self.client.token_name(address),
				self.client.token_symbol(address),
				self.client.token_decimals(address),
				self.client.total_supply(address),
			)
		};
		let (metadata, balance) = tokio::join!(metadata, self.fetch_balance(address));

		let (name, symbol, decimals, total_supply) = metadata.map_err(|e| {
			LedgerError::metadata_error(
				format!("Failed to read token metadata for {}", address),
				e,
			)
		})?;
		Ok(TrackedHolding::new(
			address,
			name,
			symbol,
			decimals,
			total_supply,
			balance,
		))
	}

	/// Balance of the current identity, zero when there is none or the read fails
	async fn fetch_balance(&self, address: &str) -> U256 {
		let Some(owner) = self.identity.current_identity() else {
			return U256::ZERO;
		};
		match self.client.balance_of(address, &owner).await {
			Ok(balance) => balance,
			Err(e) => {
				warn!("Balance of {} in {} unavailable, using 0: {}", owner, address, e);
				U256::ZERO
			}
		}
	}

	/// Owned snapshot of the collection, including chart segments
	pub async fn holdings(&self) -> HoldingsCollection {
		self.collection.read().await.clone()
	}

	pub async fn segments(&self) -> Vec<ChartSegment> {
		self.collection.read().await.segments().to_vec()
	}

	pub async fn get(&self, address: &str) -> Option<TrackedHolding> {
		self.collection.read().await.get(address.trim()).cloned()
	}

	pub async fn contains(&self, address: &str) -> bool {
		self.collection.read().await.contains(address.trim())
	}

	pub async fn len(&self) -> usize {
		self.collection.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.collection.read().await.is_empty()
	}
}
