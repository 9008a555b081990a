#![no_main]

use chain_dashboard::models::{ConfigLoader, DashboardConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	if let Ok(config) = serde_json::from_slice::<DashboardConfig>(data) {
		let _ = config.validate();
	}
});
