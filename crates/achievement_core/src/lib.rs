//! Core functionality for the achievement signer
//! Contains field-element handling, message hashing, STARK ECDSA signing and test-vector tables

pub mod traits;
pub mod types;
pub mod impls;
pub mod vectors;


pub use traits::*;
pub use types::*;
pub use impls::*;
pub use vectors::*;
