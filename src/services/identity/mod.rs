//! Source of the currently connected account.
//!
//! The holdings ledger asks the provider for the owner whose balance it should read. A
//! missing identity is not an error; balances are reported as zero until one is set.

use tokio::sync::watch;

/// Supplies the account whose token balances are looked up
pub trait IdentityProvider: Send + Sync {
	/// The connected account address, if any
	fn current_identity(&self) -> Option<String>;
}

/// Identity held in memory and changed explicitly by the host application
///
/// Changes reach every receiver from [`subscribe`](Self::subscribe), so the host can re-read balances.
#[derive(Debug)]
pub struct WatchIdentityProvider {
	identity: watch::Sender<Option<String>>,
}

impl WatchIdentityProvider {
	/// Creates a provider; blank identities count as disconnected
	pub fn new(identity: Option<String>) -> Self {
		let (identity, _) = watch::channel(normalize(identity));
		Self { identity }
	}

	pub fn connect(&self, address: impl Into<String>) {
		let address = normalize(Some(address.into()));
		tracing::info!("Identity set to {:?}", address);
		self.identity.send_replace(address);
	}

	pub fn disconnect(&self) {
		tracing::info!("Identity cleared");
		self.identity.send_replace(None);
	}

	/// Receives every identity change
	pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
		self.identity.subscribe()
	}
}

impl Default for WatchIdentityProvider {
	fn default() -> Self {
		Self::new(None)
	}
}

impl IdentityProvider for WatchIdentityProvider {
	fn current_identity(&self) -> Option<String> {
		self.identity.borrow().clone()
	}
}

fn normalize(identity: Option<String>) -> Option<String> {
	identity
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty())
}
