//! Tracked token holding and its supply share.

use alloy::primitives::{U256, U512};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::format::format_units;

/// Basis points in one hundred percent
const FULL_SHARE_BPS: u16 = 10_000;

/// Share of a token's total supply, stored as basis points (hundredths of a percent)
///
/// The value is computed with integer arithmetic only and always lies in `[0, 10000]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SupplyShare(u16);

impl SupplyShare {
	/// Computes `balance * 10000 / total_supply`, truncated toward zero and clamped to 100%
	///
	/// A zero total supply yields a zero share.
	pub fn compute(balance: U256, total_supply: U256) -> Self {
		if total_supply.is_zero() {
			return Self(0);
		}

		// Widened so that `balance * 10000` cannot overflow for any U256 balance
		let scaled = U512::from(balance) * U512::from(FULL_SHARE_BPS) / U512::from(total_supply);
		if scaled >= U512::from(FULL_SHARE_BPS) {
			Self(FULL_SHARE_BPS)
		} else {
			Self(scaled.to::<u16>())
		}
	}

	/// Builds a share directly from basis points, clamping to 100%
	pub fn from_bps(bps: u16) -> Self {
		Self(bps.min(FULL_SHARE_BPS))
	}

	/// Raw basis points
	pub fn bps(&self) -> u16 {
		self.0
	}

	/// Percentage as a float, for display and charting only
	pub fn as_percent(&self) -> f64 {
		f64::from(self.0) / 100.0
	}
}

impl fmt::Display for SupplyShare {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
	}
}

/// A token contract the user is watching, with its metadata and balance
///
/// Holdings are only ever replaced as a whole so name, symbol, decimals and supply always
/// come from the same fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedHolding {
	pub contract_address: String,
	pub display_name: String,
	pub symbol: String,
	pub decimals: u8,
	pub total_supply: U256,
	/// Zero when no identity is connected or the balance query failed
	pub balance: U256,
	pub supply_share: SupplyShare,
}

impl TrackedHolding {
	/// Creates a holding and derives its supply share from `balance` and `total_supply`
	pub fn new(
		contract_address: impl Into<String>,
		display_name: impl Into<String>,
		symbol: impl Into<String>,
		decimals: u8,
		total_supply: U256,
		balance: U256,
	) -> Self {
		Self {
			contract_address: contract_address.into(),
			display_name: display_name.into(),
			symbol: symbol.into(),
			decimals,
			total_supply,
			balance,
			supply_share: SupplyShare::compute(balance, total_supply),
		}
	}

	/// Balance formatted with the token's decimals
	pub fn formatted_balance(&self) -> String {
		format_units(self.balance, self.decimals)
	}

	/// Total supply formatted with the token's decimals
	pub fn formatted_total_supply(&self) -> String {
		format_units(self.total_supply, self.decimals)
	}
}
