// JSON-RPC provider tests against a local stub node

use std::time::Duration;

use achievement_chain::{
    query_allowance, selector_from_name, AllowanceOutcome, ChainError, ChainProvider,
    FunctionCall, JsonRpcProvider, RpcConfig,
};
use achievement_core::{felt_to_hex, parse_field_element, FieldElement};
use axum::{routing::post, Json, Router};
use num_bigint::BigUint;
use serde_json::{json, Value};

const ERC20: &str = "0x4b4c8ad42e323d638eb6ab1aef32fd0b7a27243e2139aef8cebbbbc50ce38df";
const OWNER: &str = "0x14dc7d7b6d2ea2a3c0173bb0450e52fe09fa349346862434d98fbb108f07e83";

async fn stub_node(Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let params = &request["params"];

    let body = match request["method"].as_str().unwrap_or_default() {
        "starknet_chainId" => json!({ "jsonrpc": "2.0", "id": id, "result": "0x534e5f5345504f4c4941" }),
        "starknet_getClassAt" => {
            if params["contract_address"] == ERC20 && params["block_id"] == "latest" {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": { "sierra_program": [], "abi": "[{\"type\":\"function\",\"name\":\"allowance\"}]" }
                })
            } else {
                json!({ "jsonrpc": "2.0", "id": id, "error": { "code": 20, "message": "Contract not found" } })
            }
        }
        "starknet_call" => {
            let selector = felt_to_hex(&selector_from_name("allowance").unwrap());
            let request = &params["request"];
            if request["entry_point_selector"] == selector.as_str()
                && request["calldata"] == json!([OWNER, ERC20])
            {
                json!({ "jsonrpc": "2.0", "id": id, "result": ["0x3e8", "0x1"] })
            } else {
                json!({ "jsonrpc": "2.0", "id": id, "error": { "code": 21, "message": "Invalid message selector" } })
            }
        }
        _ => json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "Method not found" } }),
    };

    Json(body)
}

async fn slow_node(Json(_request): Json<Value>) -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x1" }))
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/", post(stub_node))
        .route("/slow", post(slow_node));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn provider(url: String, timeout_secs: u64) -> JsonRpcProvider {
    JsonRpcProvider::new(RpcConfig { url, timeout_secs }).unwrap()
}

fn felt(text: &str) -> FieldElement {
    parse_field_element(text).unwrap()
}

#[tokio::test]
async fn test_chain_id() {
    let base = spawn_stub().await;
    let provider = provider(format!("{}/", base), 5);

    let chain_id = provider.chain_id().await.unwrap();
    assert_eq!(chain_id, felt("0x534e5f5345504f4c4941"));
}

#[tokio::test]
async fn test_get_class_at_missing_contract_is_none() {
    let base = spawn_stub().await;
    let provider = provider(format!("{}/", base), 5);

    assert!(provider.get_class_at(felt(ERC20)).await.unwrap().is_some());
    assert!(provider.get_class_at(FieldElement::ONE).await.unwrap().is_none());
}

#[tokio::test]
async fn test_call_error_is_surfaced() {
    let base = spawn_stub().await;
    let provider = provider(format!("{}/", base), 5);

    let call = FunctionCall {
        contract_address: felt(ERC20),
        entry_point_selector: selector_from_name("balanceOf").unwrap(),
        calldata: vec![felt(OWNER)],
    };
    match provider.call(&call).await {
        Err(ChainError::Rpc { code, .. }) => assert_eq!(code, 21),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_allowance_end_to_end() {
    let base = spawn_stub().await;
    let provider = provider(format!("{}/", base), 5);

    let outcome = query_allowance(&provider, felt(ERC20), felt(OWNER), felt(ERC20))
        .await
        .unwrap();
    let expected = (BigUint::from(1u32) << 128u32) + 1000u32;
    assert_eq!(outcome, AllowanceOutcome::Allowance(expected));

    let missing = query_allowance(&provider, FieldElement::TWO, felt(OWNER), FieldElement::TWO)
        .await
        .unwrap();
    assert_eq!(missing, AllowanceOutcome::ContractNotFound);
}

#[tokio::test]
async fn test_request_timeout() {
    let base = spawn_stub().await;
    let provider = provider(format!("{}/slow", base), 1);

    match provider.chain_id().await {
        Err(ChainError::Timeout(secs)) => assert_eq!(secs, 1),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_node() {
    // Nothing listens on the discard port
    let provider = provider("http://127.0.0.1:9/".to_string(), 2);
    assert!(matches!(provider.chain_id().await, Err(ChainError::Http(_))));
}
