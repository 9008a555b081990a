#![no_main]

use alloy::primitives::U256;
use chain_dashboard::utils::format::{format_units, format_units_with_precision};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: ([u8; 32], u8, u8)| {
	let (bytes, decimals, precision) = input;
	let amount = U256::from_be_bytes(bytes);

	let full = format_units(amount, decimals);
	let limited = format_units_with_precision(amount, decimals, precision as usize);

	assert!(!full.ends_with('.'));
	assert!(!limited.ends_with('.'));
	assert_eq!(full.split('.').next(), limited.split('.').next());
});
