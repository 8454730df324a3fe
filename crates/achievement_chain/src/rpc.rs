//! Starknet JSON-RPC provider over HTTP

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use achievement_core::{felt_to_hex, parse_field_element, FieldElement};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ChainError;
use crate::provider::{BlockId, ChainProvider, ContractClass, FunctionCall};

/// JSON-RPC error code for a missing contract
const CONTRACT_NOT_FOUND: i64 = 20;

/// Node connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcConfig {
    /// JSON-RPC endpoint of the Starknet node
    pub url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug)]
pub struct JsonRpcProvider {
    config: RpcConfig,
    client: reqwest::Client,
    block_id: BlockId,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(config: RpcConfig) -> Result<Self, ChainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChainError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            block_id: BlockId::Latest,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn with_block_id(mut self, block_id: BlockId) -> Self {
        self.block_id = block_id;
        self
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!("RPC request method: {}, URL: {}", method, self.config.url);

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ChainError::Http(format!(
                "Node returned status {}: {}",
                status, error_text
            )));
        }

        let envelope: JsonRpcResponse<T> = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if let Some(error) = envelope.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| ChainError::UnexpectedResponse(format!("{} returned no result", method)))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ChainError {
        if e.is_timeout() {
            ChainError::Timeout(self.config.timeout_secs)
        } else if e.is_decode() {
            ChainError::Json(e.to_string())
        } else {
            ChainError::Http(e.to_string())
        }
    }
}

fn parse_felt(value: &str) -> Result<FieldElement, ChainError> {
    parse_field_element(value)
        .map_err(|e| ChainError::UnexpectedResponse(format!("'{}' is not a field element: {}", value, e)))
}

impl ChainProvider for JsonRpcProvider {
    async fn chain_id(&self) -> Result<FieldElement, ChainError> {
        let chain_id: String = self.request("starknet_chainId", json!([])).await?;
        let chain_id = parse_felt(&chain_id)?;
        info!("Connected to chain {}", felt_to_hex(&chain_id));
        Ok(chain_id)
    }

    async fn get_class_at(&self, address: FieldElement) -> Result<Option<ContractClass>, ChainError> {
        let params = json!({
            "block_id": self.block_id.to_json(),
            "contract_address": felt_to_hex(&address),
        });

        match self.request::<Value>("starknet_getClassAt", params).await {
            Ok(class) => Ok(Some(ContractClass::from_json(&class))),
            Err(ChainError::Rpc { code, .. }) if code == CONTRACT_NOT_FOUND => {
                debug!("No contract deployed at {}", felt_to_hex(&address));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn call(&self, call: &FunctionCall) -> Result<Vec<FieldElement>, ChainError> {
        let params = json!({
            "request": {
                "contract_address": felt_to_hex(&call.contract_address),
                "entry_point_selector": felt_to_hex(&call.entry_point_selector),
                "calldata": call.calldata.iter().map(felt_to_hex).collect::<Vec<_>>(),
            },
            "block_id": self.block_id.to_json(),
        });

        let result: Vec<String> = self.request("starknet_call", params).await?;
        result.iter().map(|value| parse_felt(value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_config_default_timeout() {
        let config: RpcConfig = serde_json::from_value(json!({ "url": "http://localhost:5050" })).unwrap();
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_request_envelope() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 3,
            method: "starknet_chainId",
            params: json!([]),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "id": 3, "method": "starknet_chainId", "params": [] })
        );
    }

    #[test]
    fn test_response_envelope_with_error() {
        let response: JsonRpcResponse<Value> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": 20, "message": "Contract not found" }
        }))
        .unwrap();
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, CONTRACT_NOT_FOUND);
        assert_eq!(error.message, "Contract not found");
    }

    #[test]
    fn test_parse_felt_rejects_garbage() {
        assert!(parse_felt("0x10").is_ok());
        assert!(matches!(parse_felt("zz"), Err(ChainError::UnexpectedResponse(_))));
    }
}
