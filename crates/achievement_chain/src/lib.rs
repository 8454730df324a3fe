//! Starknet node access for the achievement signer
//!
//! The signing core never touches the network. This crate holds the provider interface the
//! surrounding tooling needs (class lookup, view calls) and the allowance query built on it.

pub mod allowance;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod selector;

pub use allowance::{query_allowance, u256_from_felts, AllowanceOutcome};
pub use error::ChainError;
pub use provider::{BlockId, ChainProvider, ContractClass, FunctionCall};
pub use rpc::{JsonRpcProvider, RpcConfig};
pub use selector::{selector_from_name, starknet_keccak};
