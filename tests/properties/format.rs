use alloy::primitives::U256;
use proptest::{prelude::*, test_runner::Config};

use chain_dashboard::utils::format::{format_units, format_units_with_precision};

use crate::properties::strategies::{small_u256_strategy, u256_strategy};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Removing the grouping and re-inserting the dropped zeros gives back the raw digits
	#[test]
	fn test_format_units_preserves_value(amount in small_u256_strategy(), decimals in 0u8..30) {
		let formatted = format_units(amount, decimals);
		let (integer, fraction) = match formatted.split_once('.') {
			Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
			None => (formatted.clone(), String::new()),
		};
		let integer: String = integer.chars().filter(|c| *c != ',').collect();

		let mut digits = integer;
		digits.push_str(&fraction);
		digits.push_str(&"0".repeat(decimals as usize - fraction.len()));
		let parsed: U256 = digits.parse().unwrap();
		prop_assert_eq!(parsed, amount);
	}

	// Fractions never end in zero and integer groups are three digits wide
	#[test]
	fn test_format_units_shape(amount in u256_strategy(), decimals in 0u8..80) {
		let formatted = format_units(amount, decimals);
		if let Some((_, fraction)) = formatted.split_once('.') {
			prop_assert!(!fraction.is_empty());
			prop_assert!(!fraction.ends_with('0'));
			prop_assert!(fraction.len() <= decimals as usize);
		}

		let integer = formatted.split('.').next().unwrap();
		let groups: Vec<&str> = integer.split(',').collect();
		prop_assert!(!groups[0].is_empty() && groups[0].len() <= 3);
		for group in &groups[1..] {
			prop_assert_eq!(group.len(), 3);
		}
	}

	// Limiting the precision only ever truncates
	#[test]
	fn test_precision_truncates(amount in small_u256_strategy(), decimals in 0u8..30, digits in 0usize..30) {
		let full = format_units(amount, decimals);
		let limited = format_units_with_precision(amount, decimals, digits);

		let full_integer = full.split('.').next().unwrap();
		let limited_integer = limited.split('.').next().unwrap();
		prop_assert_eq!(full_integer, limited_integer);

		let limited_fraction = limited.split_once('.').map(|(_, f)| f).unwrap_or("");
		let full_fraction = full.split_once('.').map(|(_, f)| f).unwrap_or("");
		prop_assert!(limited_fraction.len() <= digits);
		prop_assert!(full_fraction.starts_with(limited_fraction));
	}
}
