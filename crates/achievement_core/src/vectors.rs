//! Data-driven signing vectors
//!
//! A vector table lists message tuples to sign, optionally with the hash each one must produce.
//! Tables are written in TOML:
//!
//! ```toml
//! [[vector]]
//! name = "achievement-1"
//! contract = "0x04b4..."
//! account = "0x014d..."
//! index = "1"
//! expected_hash = "0x..."   # optional
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::impls::MessageSigner;
use crate::traits::SignerError;
use crate::types::{parse_field_element, MessageTuple, SignedMessage};

pub const REFERENCE_CONTRACT: &str =
    "0x04b4c8ad42e323d638eb6ab1aef32fd0b7a27243e2139aef8cebbbbc50ce38df";
pub const REFERENCE_ACCOUNT: &str =
    "0x014dc7d7b6d2ea2a3c0173bb0450e52fe09fa349346862434d98fbb108f07e83";

/// Pedersen `compute_hash_on_elements` digests of the reference tuple for indices 1 and 2,
/// computed with an implementation independent of this crate
pub const REFERENCE_HASHES: [(&str, &str); 2] = [
    ("1", "0x18334f411d338fa24ed26ac51353bb6582dd92d763a4798a0a4b7aa0c5e391e"),
    ("2", "0x41e862c9a95432278e6732132bff8b5017d38cd822b797d663da3d4476f0880"),
];

#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Failed to read vector file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse vector table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Vector table is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestVector {
    pub name: String,
    pub contract: String,
    pub account: String,
    pub index: String,
    #[serde(default)]
    pub expected_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VectorTable {
    #[serde(rename = "vector", default)]
    pub vectors: Vec<TestVector>,
}

impl VectorTable {
    /// The reference signing runs, pinned to their Pedersen digests
    pub fn builtin() -> Self {
        let vectors = REFERENCE_HASHES
            .into_iter()
            .map(|(index, hash)| TestVector {
                name: format!("achievement-{}", index),
                contract: REFERENCE_CONTRACT.to_string(),
                account: REFERENCE_ACCOUNT.to_string(),
                index: index.to_string(),
                expected_hash: Some(hash.to_string()),
            })
            .collect();

        Self { vectors }
    }

    /// Drop every pinned digest, for running a table under another hash scheme
    pub fn without_expected_hashes(mut self) -> Self {
        for vector in &mut self.vectors {
            vector.expected_hash = None;
        }
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, VectorError> {
        let table: VectorTable = toml::from_str(text)?;
        if table.vectors.is_empty() {
            return Err(VectorError::Empty);
        }
        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VectorError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Outcome of signing one vector
#[derive(Debug)]
pub struct VectorOutcome {
    pub name: String,
    pub result: Result<SignedMessage, SignerError>,
    /// `None` when the vector carries no expected hash
    pub hash_matches: Option<bool>,
}

impl VectorOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok() && self.hash_matches != Some(false)
    }
}

/// Sign every vector in order. Failures are reported per row; one bad row does not stop the run.
pub fn run_vectors(signer: &MessageSigner, table: &VectorTable) -> Vec<VectorOutcome> {
    table
        .vectors
        .iter()
        .map(|vector| run_vector(signer, vector))
        .collect()
}

fn run_vector(signer: &MessageSigner, vector: &TestVector) -> VectorOutcome {
    let signed = MessageTuple::parse(&vector.contract, &vector.account, &vector.index)
        .and_then(|tuple| signer.sign_tuple(&tuple));

    let expected = vector
        .expected_hash
        .as_deref()
        .map(parse_field_element)
        .transpose()
        .map_err(|e| SignerError::invalid_input("expected_hash", e));

    match (signed, expected) {
        (Ok(signed), Ok(expected)) => VectorOutcome {
            name: vector.name.clone(),
            hash_matches: expected.map(|hash| hash == signed.hash),
            result: Ok(signed),
        },
        (Err(e), _) | (Ok(_), Err(e)) => VectorOutcome {
            name: vector.name.clone(),
            result: Err(e),
            hash_matches: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{felt_to_hex, HashScheme, SigningKey};

    fn signer() -> MessageSigner {
        let key = SigningKey::parse("0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79")
            .unwrap();
        MessageSigner::new(key, HashScheme::Pedersen)
    }

    #[test]
    fn test_builtin_table() {
        let table = VectorTable::builtin();
        assert_eq!(table.vectors.len(), 2);
        assert_eq!(table.vectors[0].index, "1");
        assert_eq!(table.vectors[1].index, "2");

        let outcomes = run_vectors(&signer(), &table);
        assert!(outcomes.iter().all(VectorOutcome::passed));
        assert!(outcomes.iter().all(|outcome| outcome.hash_matches == Some(true)));

        let first = outcomes[0].result.as_ref().unwrap();
        let second = outcomes[1].result.as_ref().unwrap();
        assert_eq!(felt_to_hex(&first.hash), REFERENCE_HASHES[0].1);
        assert_eq!(felt_to_hex(&second.hash), REFERENCE_HASHES[1].1);
    }

    #[test]
    fn test_builtin_table_rejects_other_digests() {
        let key = SigningKey::parse("0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79")
            .unwrap();
        let poseidon = MessageSigner::new(key, HashScheme::Poseidon);

        let outcomes = run_vectors(&poseidon, &VectorTable::builtin());
        assert!(outcomes.iter().all(|outcome| outcome.hash_matches == Some(false)));
        assert!(!outcomes.iter().any(VectorOutcome::passed));

        let relaxed = VectorTable::builtin().without_expected_hashes();
        assert!(run_vectors(&poseidon, &relaxed).iter().all(VectorOutcome::passed));
    }

    #[test]
    fn test_toml_table_with_expected_hashes() {
        let signer = signer();
        let reference = signer.sign(REFERENCE_CONTRACT, REFERENCE_ACCOUNT, "1").unwrap();

        let text = format!(
            r#"
[[vector]]
name = "matching"
contract = "{contract}"
account = "{account}"
index = "1"
expected_hash = "{hash}"

[[vector]]
name = "mismatching"
contract = "{contract}"
account = "{account}"
index = "2"
expected_hash = "{hash}"

[[vector]]
name = "no-expectation"
contract = "{contract}"
account = "{account}"
index = "3"

[[vector]]
name = "bad-input"
contract = "not-a-number"
account = "{account}"
index = "1"
"#,
            contract = REFERENCE_CONTRACT,
            account = REFERENCE_ACCOUNT,
            hash = felt_to_hex(&reference.hash),
        );

        let table = VectorTable::from_toml_str(&text).unwrap();
        let outcomes = run_vectors(&signer, &table);
        assert_eq!(outcomes.len(), 4);

        assert_eq!(outcomes[0].hash_matches, Some(true));
        assert!(outcomes[0].passed());

        assert_eq!(outcomes[1].hash_matches, Some(false));
        assert!(!outcomes[1].passed());

        assert_eq!(outcomes[2].hash_matches, None);
        assert!(outcomes[2].passed());

        assert!(matches!(
            outcomes[3].result,
            Err(SignerError::InvalidInput { field: "contract_id", .. })
        ));
        assert!(!outcomes[3].passed());
    }

    #[test]
    fn test_unparsable_expected_hash() {
        let text = format!(
            "[[vector]]\nname = \"x\"\ncontract = \"0x1\"\naccount = \"{}\"\nindex = \"1\"\nexpected_hash = \"0xnope\"\n",
            REFERENCE_ACCOUNT
        );
        let table = VectorTable::from_toml_str(&text).unwrap();
        let outcomes = run_vectors(&signer(), &table);
        assert!(matches!(
            outcomes[0].result,
            Err(SignerError::InvalidInput { field: "expected_hash", .. })
        ));
    }

    #[test]
    fn test_empty_and_malformed_tables() {
        assert!(matches!(VectorTable::from_toml_str(""), Err(VectorError::Empty)));
        assert!(matches!(
            VectorTable::from_toml_str("[[vector]]\nname = 1"),
            Err(VectorError::Parse(_))
        ));
    }
}
