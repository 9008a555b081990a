use alloy::{
	primitives::{hex, Address, U256},
	sol_types::SolValue,
};
use mockall::predicate;
use serde_json::{json, Value};

use chain_dashboard::services::blockchain::{
	BlockChainError, ChainQueryClient, EvmClient, TokenQueryClient,
};

use crate::integration::mocks::{rpc_block, rpc_error, rpc_result, MockEvmTransport};

const TOKEN: &str = "0x00000000000000000000000000000000000000aa";
const OWNER: &str = "0x0000000000000000000000000000000000000001";

fn encoded<T: SolValue>(value: T) -> Value {
	json!(hex::encode_prefixed((value,).abi_encode_params()))
}

fn call_data(params: &Option<Value>) -> String {
	params
		.as_ref()
		.and_then(|p| p[0]["data"].as_str())
		.unwrap_or_default()
		.to_string()
}

#[tokio::test]
async fn test_get_head_height() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_blockNumber"), predicate::always())
		.times(1)
		.returning(|_, _| Ok(rpc_result(json!("0x12d687"))));

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.get_head_height().await.unwrap(), 1_234_567);
}

#[tokio::test]
async fn test_get_head_height_invalid_result() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(json!("not a number"))));

	let client = EvmClient::new_with_transport(transport);
	assert!(matches!(
		client.get_head_height().await,
		Err(BlockChainError::RequestError(_))
	));
}

#[tokio::test]
async fn test_rpc_error_is_surfaced() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_error(-32005, "limit exceeded")));

	let client = EvmClient::new_with_transport(transport);
	let error = client.get_head_height().await.unwrap_err();
	assert!(matches!(error, BlockChainError::RequestError(_)));
	assert!(error.to_string().contains("limit exceeded"));
}

#[tokio::test]
async fn test_get_block() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| {
			method == "eth_getBlockByNumber" && params == &Some(json!(["0x64", false]))
		})
		.times(1)
		.returning(|_, _| Ok(rpc_result(rpc_block(100))));

	let client = EvmClient::new_with_transport(transport);
	let block = client.get_block(100).await.unwrap();
	assert_eq!(block.height, 100);
	assert_eq!(block.tx_count, 2);
	assert_eq!(block.gas_used, U256::from(21_000));
	assert_eq!(block.size_bytes, 1024);
	assert_eq!(block.timestamp_seconds, 1_700_001_200);
}

#[tokio::test]
async fn test_get_block_not_found() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(Value::Null)));

	let client = EvmClient::new_with_transport(transport);
	assert!(matches!(
		client.get_block(5).await,
		Err(BlockChainError::BlockNotFound(5))
	));
}

#[tokio::test]
async fn test_get_blocks_keeps_requested_order() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.times(3)
		.returning(|_, params| {
			let tag = params.as_ref().and_then(|p| p[0].as_str()).unwrap_or("0x0");
			let height = u64::from_str_radix(tag.trim_start_matches("0x"), 16).unwrap();
			Ok(rpc_result(rpc_block(height)))
		});

	let client = EvmClient::new_with_transport(transport);
	let blocks = client.get_blocks(&[12, 11, 10]).await.unwrap();
	let heights: Vec<u64> = blocks.iter().map(|b| b.height).collect();
	assert_eq!(heights, vec![12, 11, 10]);
}

#[tokio::test]
async fn test_get_gas_parameters() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.times(3)
		.returning(|method, _| match method {
			"eth_getBlockByNumber" => Ok(rpc_result(rpc_block(100))),
			"eth_gasPrice" => Ok(rpc_result(json!("0x3b9aca0a"))),
			"eth_feeHistory" => Ok(rpc_result(json!({
				"oldestBlock": "0x61",
				"baseFeePerGas": ["0x1", "0x2", "0x3", "0x4", "0x64"],
				"gasUsedRatio": [0.5, 0.5, 0.5, 0.5],
				"reward": [
					["0x1", "0x2", "0x3"],
					["0x1", "0x2", "0x3"],
					["0x1", "0x2", "0x3"],
					["0x1", "0x2", "0x3"]
				]
			}))),
			other => panic!("unexpected method {}", other),
		});

	let client = EvmClient::new_with_transport(transport);
	let gas = client.get_gas_parameters().await.unwrap();
	assert_eq!(gas.target_gas_limit, U256::from(30_000_000));
	assert_eq!(gas.base_gas, U256::from(1_000_000_000));
	assert_eq!(gas.gas_per_sat, U256::from(1_000_000_010));
	assert_eq!(gas.fee_tiers.low, U256::from(101));
	assert_eq!(gas.fee_tiers.medium, U256::from(102));
	assert_eq!(gas.fee_tiers.high, U256::from(103));
}

#[tokio::test]
async fn test_get_gas_parameters_without_fee_history() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|method, _| match method {
			"eth_getBlockByNumber" => Ok(rpc_result(rpc_block(100))),
			"eth_gasPrice" => Ok(rpc_result(json!("0x10"))),
			_ => Ok(rpc_error(-32601, "method not found")),
		});

	let client = EvmClient::new_with_transport(transport);
	let gas = client.get_gas_parameters().await.unwrap();
	assert_eq!(gas.fee_tiers.low, U256::from(16));
	assert_eq!(gas.fee_tiers.medium, U256::from(16));
	assert_eq!(gas.fee_tiers.high, U256::from(16));
}

#[tokio::test]
async fn test_get_gas_parameters_with_malformed_fee_history() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.times(3)
		.returning(|method, _| match method {
			"eth_getBlockByNumber" => Ok(rpc_result(rpc_block(100))),
			"eth_gasPrice" => Ok(rpc_result(json!("0x20"))),
			"eth_feeHistory" => Ok(rpc_result(json!({ "baseFeePerGas": "not-a-list" }))),
			other => panic!("unexpected method {}", other),
		});

	let client = EvmClient::new_with_transport(transport);
	let gas = client.get_gas_parameters().await.unwrap();
	assert_eq!(gas.fee_tiers.low, U256::from(32));
	assert_eq!(gas.fee_tiers.medium, U256::from(32));
	assert_eq!(gas.fee_tiers.high, U256::from(32));
}

#[tokio::test]
async fn test_token_metadata_calls() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, _| method == "eth_call")
		.times(4)
		.returning(|_, params| {
			let data = call_data(&params);
			let result = match &data[..10] {
				// name()
				"0x06fdde03" => encoded("Wrapped Ether".to_string()),
				// symbol()
				"0x95d89b41" => encoded("WETH".to_string()),
				// decimals()
				"0x313ce567" => encoded(18u16),
				// totalSupply()
				"0x18160ddd" => encoded(U256::from(5_000u64)),
				other => panic!("unexpected selector {}", other),
			};
			Ok(rpc_result(result))
		});

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.token_name(TOKEN).await.unwrap(), "Wrapped Ether");
	assert_eq!(client.token_symbol(TOKEN).await.unwrap(), "WETH");
	assert_eq!(client.token_decimals(TOKEN).await.unwrap(), 18);
	assert_eq!(client.total_supply(TOKEN).await.unwrap(), U256::from(5_000));
}

#[tokio::test]
async fn test_balance_of_encodes_owner() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.times(1)
		.returning(|_, params| {
			let data = call_data(&params);
			// balanceOf(address)
			assert!(data.starts_with("0x70a08231"));
			let owner: Address = OWNER.parse().unwrap();
			assert!(data.ends_with(&hex::encode(owner.as_slice())));
			Ok(rpc_result(encoded(U256::from(42u64))))
		});

	let client = EvmClient::new_with_transport(transport);
	assert_eq!(client.balance_of(TOKEN, OWNER).await.unwrap(), U256::from(42));
}

#[tokio::test]
async fn test_invalid_addresses_fail_without_request() {
	let client = EvmClient::new_with_transport(MockEvmTransport::new());

	assert!(matches!(
		client.token_name("not-an-address").await,
		Err(BlockChainError::RequestError(_))
	));
	assert!(matches!(
		client.balance_of(TOKEN, "nobody").await,
		Err(BlockChainError::RequestError(_))
	));
}

#[tokio::test]
async fn test_undecodable_call_result() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(json!("0x"))));

	let client = EvmClient::new_with_transport(transport);
	assert!(matches!(
		client.total_supply(TOKEN).await,
		Err(BlockChainError::ContractCallError(_))
	));
}

#[tokio::test]
async fn test_transport_error_propagates() {
	let mut transport = MockEvmTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Err(BlockChainError::connection_error("refused")));

	let client = EvmClient::new_with_transport(transport);
	assert!(matches!(
		client.get_head_height().await,
		Err(BlockChainError::ConnectionError(_))
	));
}
