//! Ordered collection of tracked holdings and its derived chart view.

use serde::Serialize;

use crate::models::TrackedHolding;

/// Fixed chart palette; a holding's color is chosen by its insertion position
pub const CHART_PALETTE: [&str; 8] = [
	"#6366F1", "#22C55E", "#F59E0B", "#EF4444", "#06B6D4", "#A855F7", "#EC4899", "#84CC16",
];

/// One slice of the holdings chart
///
/// Slices are equal-weight: every holding gets `100 / count` regardless of its balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
	pub contract_address: String,
	pub symbol: String,
	/// Percentage of the chart covered by this slice
	pub weight: f64,
	/// Position in the palette, `index mod 8`
	pub color_index: usize,
	pub color: &'static str,
}

/// Insertion-ordered, de-duplicated holdings plus the chart segments derived from them
///
/// Segments are recomputed on every mutation so readers never see a stale chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoldingsCollection {
	holdings: Vec<TrackedHolding>,
	segments: Vec<ChartSegment>,
}

impl HoldingsCollection {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn holdings(&self) -> &[TrackedHolding] {
		&self.holdings
	}

	pub fn segments(&self) -> &[ChartSegment] {
		&self.segments
	}

	pub fn len(&self) -> usize {
		self.holdings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.holdings.is_empty()
	}

	/// Exact, case-sensitive address lookup
	pub fn contains(&self, contract_address: &str) -> bool {
		self.position(contract_address).is_some()
	}

	pub fn get(&self, contract_address: &str) -> Option<&TrackedHolding> {
		self.position(contract_address).map(|idx| &self.holdings[idx])
	}

	/// Appends a holding. Returns `false` and leaves the collection untouched when the
	/// address is already present.
	pub(crate) fn insert(&mut self, holding: TrackedHolding) -> bool {
		if self.contains(&holding.contract_address) {
			return false;
		}
		self.holdings.push(holding);
		self.recompute();
		true
	}

	/// Replaces an existing holding in place, keeping its position
	pub(crate) fn replace(&mut self, holding: TrackedHolding) -> bool {
		match self.position(&holding.contract_address) {
			Some(idx) => {
				self.holdings[idx] = holding;
				self.recompute();
				true
			}
			None => false,
		}
	}

	pub(crate) fn remove(&mut self, contract_address: &str) -> Option<TrackedHolding> {
		let idx = self.position(contract_address)?;
		let removed = self.holdings.remove(idx);
		self.recompute();
		Some(removed)
	}

	fn position(&self, contract_address: &str) -> Option<usize> {
		self.holdings
			.iter()
			.position(|holding| holding.contract_address == contract_address)
	}

	fn recompute(&mut self) {
		let count = self.holdings.len();
		if count == 0 {
			self.segments.clear();
			return;
		}

		let weight = 100.0 / count as f64;
		self.segments = self
			.holdings
			.iter()
			.enumerate()
			.map(|(idx, holding)| {
				let color_index = idx % CHART_PALETTE.len();
				ChartSegment {
					contract_address: holding.contract_address.clone(),
					symbol: holding.symbol.clone(),
					weight,
					color_index,
					color: CHART_PALETTE[color_index],
				}
			})
			.collect();
	}
}
