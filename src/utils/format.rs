//! Display formatting for on-chain integer amounts.
//!
//! Amounts are formatted from their exact decimal digits; nothing is ever rounded.

use alloy::primitives::U256;

const GROUP_SEPARATOR: char = ',';
const DECIMAL_SEPARATOR: char = '.';

/// Formats `amount` scaled down by `10^decimals`
///
/// The integer part gets a separator every three digits and trailing zeros are stripped
/// from the fraction. When the fraction is entirely zero only the integer part is emitted.
///
/// ```
/// use alloy::primitives::U256;
/// use chain_dashboard::utils::format::format_units;
///
/// assert_eq!(format_units(U256::from(123456789u64), 6), "123.456789");
/// assert_eq!(format_units(U256::from(100000000u64), 8), "1");
/// ```
pub fn format_units(amount: U256, decimals: u8) -> String {
	let (integer, fraction) = split_units(amount, decimals);
	join_parts(&integer, fraction.trim_end_matches('0'))
}

/// Like [`format_units`] but keeps at most `max_fraction_digits` fraction digits
///
/// Extra digits are cut off, not rounded.
pub fn format_units_with_precision(
	amount: U256,
	decimals: u8,
	max_fraction_digits: usize,
) -> String {
	let (integer, fraction) = split_units(amount, decimals);
	let kept = &fraction[..fraction.len().min(max_fraction_digits)];
	join_parts(&integer, kept.trim_end_matches('0'))
}

/// Inserts a group separator every three digits, counting from the right
pub fn group_digits(digits: &str) -> String {
	let len = digits.len();
	let mut grouped = String::with_capacity(len + len / 3);
	for (idx, ch) in digits.chars().enumerate() {
		if idx > 0 && (len - idx) % 3 == 0 {
			grouped.push(GROUP_SEPARATOR);
		}
		grouped.push(ch);
	}
	grouped
}

/// Splits the decimal digits of `amount` into integer and zero-padded fraction parts
fn split_units(amount: U256, decimals: u8) -> (String, String) {
	let digits = amount.to_string();
	let decimals = usize::from(decimals);

	if digits.len() > decimals {
		let (integer, fraction) = digits.split_at(digits.len() - decimals);
		(integer.to_string(), fraction.to_string())
	} else {
		("0".to_string(), format!("{:0>width$}", digits, width = decimals))
	}
}

fn join_parts(integer: &str, fraction: &str) -> String {
	let grouped = group_digits(integer);
	if fraction.is_empty() {
		grouped
	} else {
		format!("{}{}{}", grouped, DECIMAL_SEPARATOR, fraction)
	}
}
