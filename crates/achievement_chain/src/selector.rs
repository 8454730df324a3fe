//! Entry point selectors

use achievement_core::FieldElement;
use sha3::{Digest, Keccak256};

use crate::error::ChainError;

/// Keccak-256 truncated to 250 bits
pub fn starknet_keccak(data: &[u8]) -> FieldElement {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let digest = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest[..32]);

    // Drop the top 6 bits
    hash[0] &= 0b0000_0011;

    // 250 bits always fit in the field
    FieldElement::from_bytes_be(&hash).unwrap_or(FieldElement::ZERO)
}

pub fn selector_from_name(name: &str) -> Result<FieldElement, ChainError> {
    if !name.is_ascii() {
        return Err(ChainError::InvalidSelectorName(name.to_string()));
    }
    Ok(starknet_keccak(name.as_bytes()))
}
