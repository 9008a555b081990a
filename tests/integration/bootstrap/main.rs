use std::{io::Write, sync::Arc, time::Duration};

use alloy::primitives::U256;
use tempfile::NamedTempFile;

use chain_dashboard::{
	bootstrap::{build_services, load_config, seed_holdings, spawn_identity_refresher},
	services::{holdings::HoldingsLedger, identity::WatchIdentityProvider},
};

use crate::integration::mocks::{FakeToken, FakeTokenClient, MockChainClient};

const TOKEN_A: &str = "0x00000000000000000000000000000000000000aa";
const OWNER: &str = "0x0000000000000000000000000000000000000001";

fn write_config(content: &str) -> NamedTempFile {
	let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
	file.write_all(content.as_bytes()).unwrap();
	file
}

#[test]
fn test_load_config_from_path() {
	let file = write_config(
		r#"{
			"name": "Mainnet",
			"rpc_urls": [{ "type_": "rpc", "url": "https://rpc.example.com", "weight": 100 }],
			"chain_id": 1,
			"identity": "0x0000000000000000000000000000000000000001",
			"tracked_contracts": ["0x00000000000000000000000000000000000000aa"]
		}"#,
	);

	let config = load_config(file.path().to_str()).unwrap();
	assert_eq!(config.name, "Mainnet");
	assert_eq!(config.poll_interval_ms, 10_000);
	assert_eq!(config.tracked_contracts.len(), 1);
}

#[test]
fn test_load_config_rejects_invalid_file() {
	let file = write_config(r#"{ "name": "", "rpc_urls": [], "chain_id": null }"#);
	assert!(load_config(file.path().to_str()).is_err());
}

#[tokio::test]
async fn test_build_services_shares_client() {
	let file = write_config(
		r#"{
			"name": "Mainnet",
			"rpc_urls": [{ "type_": "rpc", "url": "https://rpc.example.com", "weight": 100 }],
			"chain_id": 1,
			"poll_interval_ms": 2000
		}"#,
	);
	let config = load_config(file.path().to_str()).unwrap();

	let mut client = MockChainClient::new();
	client.expect_get_head_height().returning(|| Ok(1));
	client
		.expect_get_gas_parameters()
		.returning(|| Ok(Default::default()));
	client
		.expect_get_block()
		.returning(|height| Ok(chain_dashboard::models::BlockSummary::at_height(height)));

	let services = build_services(
		config,
		Arc::new(client),
		Arc::new(WatchIdentityProvider::default()),
	);
	assert_eq!(services.poll_interval(), Duration::from_millis(2000));
	assert!(services.pulse.poll_once().await);
	assert_eq!(services.pulse.snapshot().unwrap().head_height, 1);
	assert!(services.ledger.is_empty().await);
}

#[tokio::test]
async fn test_seed_holdings_continues_past_failures() {
	let client = FakeTokenClient::new().with_token(TOKEN_A, FakeToken::new("TKA", 0, 100));
	let ledger = HoldingsLedger::new(
		Arc::new(client),
		Arc::new(WatchIdentityProvider::default()),
	);

	let contracts = vec![
		"0x00000000000000000000000000000000000000ff".to_string(),
		TOKEN_A.to_string(),
		TOKEN_A.to_string(),
	];
	let failures = seed_holdings(&ledger, &contracts).await;

	assert_eq!(failures.len(), 2);
	assert_eq!(ledger.len().await, 1);
	assert!(ledger.contains(TOKEN_A).await);
}

#[tokio::test]
async fn test_identity_change_refreshes_balances() {
	let client = FakeTokenClient::new().with_token(TOKEN_A, FakeToken::new("TKA", 0, 100));
	client.set_balance(TOKEN_A, OWNER, 30);
	let identity = Arc::new(WatchIdentityProvider::default());
	let ledger = Arc::new(HoldingsLedger::new(Arc::new(client), identity.clone()));
	ledger.add(TOKEN_A).await.unwrap();

	let refresher = spawn_identity_refresher(ledger.clone(), identity.subscribe());
	identity.connect(OWNER);

	let mut balance = U256::ZERO;
	for _ in 0..50 {
		balance = ledger.get(TOKEN_A).await.unwrap().balance;
		if balance != U256::ZERO {
			break;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
	assert_eq!(balance, U256::from(30));
	refresher.abort();
}
