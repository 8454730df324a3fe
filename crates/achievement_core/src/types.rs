//! Core types for the achievement signer

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use starknet_crypto::get_public_key;

use crate::traits::{FieldParseError, SignerError};

/// Element of the STARK prime field, `P = 2^251 + 17 * 2^192 + 1`
pub use starknet_crypto::FieldElement;

/// Order of the STARK curve generator. Secret keys live in `[1, EC_ORDER)`.
pub const EC_ORDER_HEX: &str = "0x0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f";

/// Parse a field element from a decimal literal or a `0x`-prefixed hexadecimal literal.
///
/// Parsing goes through an arbitrary-precision integer so values at or above the field
/// modulus are rejected instead of wrapping.
pub fn parse_field_element(text: &str) -> Result<FieldElement, FieldParseError> {
    let text = text.trim();
    let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    if digits.is_empty() {
        return Err(FieldParseError::Empty);
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(FieldParseError::InvalidCharacter);
    }

    let value = BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or(FieldParseError::InvalidCharacter)?;
    felt_from_biguint(&value)
}

/// Convert a big integer into a field element, rejecting values outside the field
pub fn felt_from_biguint(value: &BigUint) -> Result<FieldElement, FieldParseError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(FieldParseError::OutOfRange);
    }
    FieldElement::from_byte_slice_be(&bytes).map_err(|_| FieldParseError::OutOfRange)
}

pub fn felt_to_biguint(felt: &FieldElement) -> BigUint {
    BigUint::from_bytes_be(&felt.to_bytes_be())
}

/// Canonical textual form: lowercase, `0x`-prefixed, no leading zeros
pub fn felt_to_hex(felt: &FieldElement) -> String {
    format!("{:#x}", felt)
}

/// The field modulus `P` as a big integer
pub fn field_modulus() -> BigUint {
    felt_to_biguint(&FieldElement::MAX) + 1u32
}

/// Order of the STARK curve generator, built once from its 32-bit digits (least significant first)
pub fn curve_order() -> &'static BigUint {
    static EC_ORDER: OnceLock<BigUint> = OnceLock::new();
    EC_ORDER.get_or_init(|| {
        BigUint::new(vec![
            0xadc6_4d2f, 0x1e66_a241, 0xcae7_b232, 0xb781_126d,
            0xffff_ffff, 0xffff_ffff, 0x0000_0010, 0x0800_0000,
        ])
    })
}

/// Stark ECDSA signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: FieldElement,
    pub s: FieldElement,
}

impl Signature {
    /// 64-byte `r || s` encoding, hex without prefix
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(64);
        bytes.extend_from_slice(&self.r.to_bytes_be());
        bytes.extend_from_slice(&self.s.to_bytes_be());
        hex::encode(bytes)
    }
}

/// The (contract, account, achievement index) tuple that gets hashed and signed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTuple {
    pub contract_id: FieldElement,
    pub account_id: FieldElement,
    pub achievement_index: FieldElement,
}

impl MessageTuple {
    pub fn new(
        contract_id: FieldElement,
        account_id: FieldElement,
        achievement_index: FieldElement,
    ) -> Self {
        Self {
            contract_id,
            account_id,
            achievement_index,
        }
    }

    /// Parse the three textual inputs. The first field that fails is reported.
    pub fn parse(contract_id: &str, account_id: &str, achievement_index: &str) -> Result<Self, SignerError> {
        let contract_id = parse_field_element(contract_id)
            .map_err(|e| SignerError::invalid_input("contract_id", e))?;
        let account_id = parse_field_element(account_id)
            .map_err(|e| SignerError::invalid_input("account_id", e))?;
        let achievement_index = parse_field_element(achievement_index)
            .map_err(|e| SignerError::invalid_input("achievement_index", e))?;

        Ok(Self::new(contract_id, account_id, achievement_index))
    }

    /// Elements in hashing order
    pub fn elements(&self) -> [FieldElement; 3] {
        [self.contract_id, self.account_id, self.achievement_index]
    }
}

/// Result of signing a message tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedMessage {
    pub hash: FieldElement,
    pub r: FieldElement,
    pub s: FieldElement,
}

impl SignedMessage {
    pub fn signature(&self) -> Signature {
        Signature {
            r: self.r,
            s: self.s,
        }
    }

    /// Render for output. The hash is always hex; `r` and `s` follow `format`.
    pub fn render(&self, format: NumberFormat) -> SignedMessageView {
        SignedMessageView {
            hash: felt_to_hex(&self.hash),
            r: format.render(&self.r),
            s: format.render(&self.s),
            signature: self.signature().to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedMessageView {
    pub hash: String,
    pub r: String,
    pub s: String,
    /// `r || s` as 128 hex digits
    pub signature: String,
}

/// Numeric rendering for signature components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Decimal,
    Hex,
}

impl NumberFormat {
    pub fn render(self, felt: &FieldElement) -> String {
        match self {
            NumberFormat::Decimal => felt.to_string(),
            NumberFormat::Hex => felt_to_hex(felt),
        }
    }
}

/// Multi-input hash used to build the message digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashScheme {
    /// Chained Pedersen hash with the element count appended
    #[default]
    Pedersen,
    /// Poseidon sponge over all elements
    Poseidon,
}

impl FromStr for HashScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pedersen" => Ok(HashScheme::Pedersen),
            "poseidon" => Ok(HashScheme::Poseidon),
            other => Err(format!("unknown hash scheme '{}'", other)),
        }
    }
}

impl fmt::Display for HashScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashScheme::Pedersen => write!(f, "pedersen"),
            HashScheme::Poseidon => write!(f, "poseidon"),
        }
    }
}

/// Secret scalar used for signing. Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone)]
pub struct SigningKey {
    secret: FieldElement,
}

impl SigningKey {
    pub fn from_field_element(secret: FieldElement) -> Result<Self, SignerError> {
        if secret == FieldElement::ZERO || &felt_to_biguint(&secret) >= curve_order() {
            return Err(SignerError::invalid_input("signing_key", FieldParseError::OutOfRange));
        }
        Ok(Self { secret })
    }

    /// Parse a key given as hex (`0x...`) or decimal
    pub fn parse(text: &str) -> Result<Self, SignerError> {
        let secret = parse_field_element(text)
            .map_err(|e| SignerError::invalid_input("signing_key", e))?;
        Self::from_field_element(secret)
    }

    pub fn public_key(&self) -> FieldElement {
        get_public_key(&self.secret)
    }

    /// Hex form of the secret, for key export only
    pub fn expose_secret_hex(&self) -> String {
        format!("{:#066x}", self.secret)
    }

    pub(crate) fn secret_scalar(&self) -> &FieldElement {
        &self.secret
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
