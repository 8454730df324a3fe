//! Provider interface consumed by the allowance query

use achievement_core::FieldElement;
use serde_json::Value;

use crate::error::ChainError;

/// Block the node evaluates a request against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    #[default]
    Latest,
    Pending,
    Number(u64),
}

impl BlockId {
    pub fn to_json(self) -> Value {
        match self {
            BlockId::Latest => Value::from("latest"),
            BlockId::Pending => Value::from("pending"),
            BlockId::Number(number) => serde_json::json!({ "block_number": number }),
        }
    }
}

/// A view call against a deployed contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub contract_address: FieldElement,
    pub entry_point_selector: FieldElement,
    pub calldata: Vec<FieldElement>,
}

/// Class definition as returned by the node. Only the ABI presence is inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractClass {
    pub abi: Option<Value>,
}

impl ContractClass {
    pub fn from_json(class: &Value) -> Self {
        Self {
            abi: class.get("abi").filter(|abi| !abi.is_null()).cloned(),
        }
    }

    /// Sierra classes carry the ABI as a JSON string, legacy classes as an array
    pub fn has_abi(&self) -> bool {
        match &self.abi {
            Some(Value::String(abi)) => !abi.trim().is_empty(),
            Some(Value::Array(entries)) => !entries.is_empty(),
            Some(_) => true,
            None => false,
        }
    }
}

/// Read-only access to a Starknet node.
///
/// Every request is independently bounded by the implementation's timeout and is cancelled by
/// dropping the returned future.
#[allow(async_fn_in_trait)]
pub trait ChainProvider {
    async fn chain_id(&self) -> Result<FieldElement, ChainError>;

    /// `Ok(None)` when no contract is deployed at `address`
    async fn get_class_at(&self, address: FieldElement) -> Result<Option<ContractClass>, ChainError>;

    async fn call(&self, call: &FunctionCall) -> Result<Vec<FieldElement>, ChainError>;
}
