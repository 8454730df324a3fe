//! Core traits and error types for the achievement signer

use crate::types::{FieldElement, Signature, SigningKey};
use thiserror::Error;

/// Reasons a textual value cannot become a field element
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("empty value")]
    Empty,
    #[error("not a decimal or 0x-prefixed hexadecimal integer")]
    InvalidCharacter,
    #[error("value does not fit in the STARK field")]
    OutOfRange,
}

/// Error types for signing operations
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid input for {field}: {source}")]
    InvalidInput {
        field: &'static str,
        #[source]
        source: FieldParseError,
    },
    #[error("Signing failure: {0}")]
    SigningFailure(String),
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
}

impl SignerError {
    pub fn invalid_input(field: &'static str, source: FieldParseError) -> Self {
        SignerError::InvalidInput { field, source }
    }
}

/// Multi-input hash over field elements. Argument order is significant.
pub trait MessageHasher {
    fn hash_elements(&self, elements: &[FieldElement]) -> FieldElement;
}

/// Trait for digest signing and signature verification
pub trait SignatureScheme {
    /// Sign a digest with a secret key
    fn sign_digest(&self, digest: &FieldElement, key: &SigningKey) -> Result<Signature, SignerError>;

    /// Verify a signature over a digest against a public key
    fn verify_signature(
        &self,
        signature: &Signature,
        digest: &FieldElement,
        public_key: &FieldElement,
    ) -> Result<(), SignerError>;
}
