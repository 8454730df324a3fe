use achievement_chain::{query_allowance, AllowanceOutcome, ChainProvider, JsonRpcProvider, RpcConfig};
use achievement_core::{felt_to_hex, parse_field_element, SignerError};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::output::{render, OutputFormat};

#[derive(Args, Debug, Clone)]
#[command(about = "Query an ERC-20 allowance on Starknet")]
pub struct AllowanceArgs {
    /// ERC-20 contract address
    #[arg(long)]
    pub contract: String,
    /// Token owner
    #[arg(long)]
    pub owner: String,
    /// Spender; defaults to the contract itself
    #[arg(long)]
    pub spender: Option<String>,
}

#[derive(Debug, Serialize)]
struct AllowanceView {
    contract: String,
    owner: String,
    spender: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowance: Option<String>,
}

pub async fn handle_allowance_command(args: &AllowanceArgs, rpc: &RpcConfig, format: OutputFormat) -> Result<String> {
    let contract = parse_field_element(&args.contract).map_err(|e| SignerError::invalid_input("contract", e))?;
    let owner = parse_field_element(&args.owner).map_err(|e| SignerError::invalid_input("owner", e))?;
    let spender = match &args.spender {
        Some(text) => parse_field_element(text).map_err(|e| SignerError::invalid_input("spender", e))?,
        None => contract,
    };

    let provider = JsonRpcProvider::new(rpc.clone())?;
    let chain_id = provider
        .chain_id()
        .await
        .with_context(|| format!("Failed to reach Starknet node at {}", provider.url()))?;
    info!("Querying allowance on chain {}", felt_to_hex(&chain_id));

    let outcome = query_allowance(&provider, contract, owner, spender).await?;

    let view = AllowanceView {
        contract: felt_to_hex(&contract),
        owner: felt_to_hex(&owner),
        spender: felt_to_hex(&spender),
        found: outcome != AllowanceOutcome::ContractNotFound,
        allowance: match &outcome {
            AllowanceOutcome::Allowance(amount) => Some(amount.to_string()),
            AllowanceOutcome::ContractNotFound => None,
        },
    };

    let result_line = match &view.allowance {
        Some(amount) => ("Allowance", amount.clone()),
        None => ("Allowance", "contract not found".to_string()),
    };

    render(
        format,
        &view,
        &[
            ("Contract", view.contract.clone()),
            ("Owner", view.owner.clone()),
            ("Spender", view.spender.clone()),
            result_line,
        ],
    )
}
