pub mod allowance;
pub mod keypair;
pub mod sign;
pub mod vectors;
pub mod verify;
