//! ERC-20 allowance lookup

use achievement_core::{felt_to_biguint, felt_to_hex, FieldElement};
use num_bigint::BigUint;
use tracing::{info, warn};

use crate::error::ChainError;
use crate::provider::{ChainProvider, FunctionCall};
use crate::selector::selector_from_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowanceOutcome {
    /// No class at the address, or the class has no ABI
    ContractNotFound,
    Allowance(BigUint),
}

/// Look up `allowance(owner, spender)` on `contract`.
///
/// The class is fetched first; a missing class or ABI ends the query without calling the contract.
pub async fn query_allowance<P: ChainProvider>(
    provider: &P,
    contract: FieldElement,
    owner: FieldElement,
    spender: FieldElement,
) -> Result<AllowanceOutcome, ChainError> {
    let class = provider.get_class_at(contract).await?;
    if !class.as_ref().is_some_and(|class| class.has_abi()) {
        warn!("Contract not found at {}", felt_to_hex(&contract));
        return Ok(AllowanceOutcome::ContractNotFound);
    }

    let call = FunctionCall {
        contract_address: contract,
        entry_point_selector: selector_from_name("allowance")?,
        calldata: vec![owner, spender],
    };
    let result = provider.call(&call).await?;
    let allowance = u256_from_felts(&result)?;

    info!(
        "Allowance of {} for {}: {}",
        felt_to_hex(&owner),
        felt_to_hex(&spender),
        allowance
    );

    Ok(AllowanceOutcome::Allowance(allowance))
}

/// Assemble a `u256` from its `(low, high)` 128-bit words
pub fn u256_from_felts(words: &[FieldElement]) -> Result<BigUint, ChainError> {
    let [low, high] = words else {
        return Err(ChainError::UnexpectedResponse(format!(
            "expected 2 words for u256, got {}",
            words.len()
        )));
    };

    let low = felt_to_biguint(low);
    let high = felt_to_biguint(high);
    if low.bits() > 128 || high.bits() > 128 {
        return Err(ChainError::UnexpectedResponse(
            "u256 word exceeds 128 bits".to_string(),
        ));
    }

    Ok(low + (high << 128u32))
}
