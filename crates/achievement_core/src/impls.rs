//! Core implementations for the achievement signer

use rand::RngCore;
use starknet_crypto::{
    pedersen_hash, poseidon_hash_many, rfc6979_generate_k, sign, verify, SignError, VerifyError,
};
use tracing::debug;

use crate::traits::{MessageHasher, SignatureScheme, SignerError};
use crate::types::{
    felt_to_hex, FieldElement, HashScheme, MessageTuple, Signature, SignedMessage, SigningKey,
};

impl MessageHasher for HashScheme {
    fn hash_elements(&self, elements: &[FieldElement]) -> FieldElement {
        match self {
            HashScheme::Pedersen => compute_hash_on_elements(elements),
            HashScheme::Poseidon => poseidon_hash_many(elements),
        }
    }
}

/// Chained Pedersen hash: `h(h(h(0, a0), a1), ..., n)` where `n` is the element count
pub fn compute_hash_on_elements(elements: &[FieldElement]) -> FieldElement {
    let acc = elements
        .iter()
        .fold(FieldElement::ZERO, |acc, item| pedersen_hash(&acc, item));
    pedersen_hash(&acc, &FieldElement::from(elements.len()))
}

/// ECDSA over the STARK curve with RFC 6979 nonces
#[derive(Debug, Clone, Copy, Default)]
pub struct StarkEcdsa;

impl SignatureScheme for StarkEcdsa {
    fn sign_digest(&self, digest: &FieldElement, key: &SigningKey) -> Result<Signature, SignerError> {
        let secret = key.secret_scalar();
        let mut seed: Option<FieldElement> = None;

        // A rejected nonce is retried with seeds 1, 2, ... so the result stays deterministic
        loop {
            let k = rfc6979_generate_k(digest, secret, seed.as_ref());

            match sign(secret, digest, &k) {
                Ok(signature) => {
                    return Ok(Signature {
                        r: signature.r,
                        s: signature.s,
                    })
                }
                Err(SignError::InvalidMessageHash) => {
                    return Err(SignerError::SigningFailure(format!(
                        "digest {} is outside the signable range",
                        felt_to_hex(digest)
                    )))
                }
                Err(SignError::InvalidK) => {
                    debug!("nonce rejected, retrying with next seed");
                    seed = Some(match seed {
                        Some(prev) => prev + FieldElement::ONE,
                        None => FieldElement::ONE,
                    });
                }
            }
        }
    }

    fn verify_signature(
        &self,
        signature: &Signature,
        digest: &FieldElement,
        public_key: &FieldElement,
    ) -> Result<(), SignerError> {
        match verify(public_key, digest, &signature.r, &signature.s) {
            Ok(true) => Ok(()),
            Ok(false) => Err(SignerError::InvalidSignature),
            Err(VerifyError::InvalidPublicKey) => Err(SignerError::InvalidPublicKey),
            Err(VerifyError::InvalidMessageHash)
            | Err(VerifyError::InvalidR)
            | Err(VerifyError::InvalidS) => Err(SignerError::InvalidSignature),
        }
    }
}

/// Signs achievement message tuples with a fixed key.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct MessageSigner {
    key: SigningKey,
    public_key: FieldElement,
    hash_scheme: HashScheme,
    scheme: StarkEcdsa,
}

impl MessageSigner {
    pub fn new(key: SigningKey, hash_scheme: HashScheme) -> Self {
        let public_key = key.public_key();
        Self {
            key,
            public_key,
            hash_scheme,
            scheme: StarkEcdsa,
        }
    }

    pub fn public_key(&self) -> FieldElement {
        self.public_key
    }

    pub fn hash_scheme(&self) -> HashScheme {
        self.hash_scheme
    }

    /// Parse the three inputs, hash them in order and sign the digest
    pub fn sign(
        &self,
        contract_id: &str,
        account_id: &str,
        achievement_index: &str,
    ) -> Result<SignedMessage, SignerError> {
        let tuple = MessageTuple::parse(contract_id, account_id, achievement_index)?;
        self.sign_tuple(&tuple)
    }

    pub fn sign_tuple(&self, tuple: &MessageTuple) -> Result<SignedMessage, SignerError> {
        let hash = self.hash_scheme.hash_elements(&tuple.elements());
        let signature = self.scheme.sign_digest(&hash, &self.key)?;

        debug!(
            hash = %felt_to_hex(&hash),
            r = %signature.r,
            s = %signature.s,
            "signed achievement message"
        );

        Ok(SignedMessage {
            hash,
            r: signature.r,
            s: signature.s,
        })
    }

    /// Verify a signed message against this signer's own public key
    pub fn verify(&self, tuple: &MessageTuple, signed: &SignedMessage) -> Result<(), SignerError> {
        verify_signed_message(&self.public_key, tuple, signed, self.hash_scheme)
    }
}

/// Recompute the digest from `tuple`, require it to equal `signed.hash`, then check the curve equation
pub fn verify_signed_message(
    public_key: &FieldElement,
    tuple: &MessageTuple,
    signed: &SignedMessage,
    hash_scheme: HashScheme,
) -> Result<(), SignerError> {
    let expected = hash_scheme.hash_elements(&tuple.elements());
    if expected != signed.hash {
        return Err(SignerError::InvalidSignature);
    }

    StarkEcdsa.verify_signature(&signed.signature(), &signed.hash, public_key)
}

/// Generate a new key pair for testing and development
pub fn generate_keypair() -> (SigningKey, FieldElement) {
    let mut rng = rand::thread_rng();
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        // Below 2^251, which is under the curve order
        bytes[0] &= 0x07;

        let Ok(secret) = FieldElement::from_bytes_be(&bytes) else {
            continue;
        };
        if let Ok(key) = SigningKey::from_field_element(secret) {
            let public_key = key.public_key();
            return (key, public_key);
        }
    }
}
