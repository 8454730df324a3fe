use achievement_core::{felt_to_hex, generate_keypair, MessageSigner};
use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::output::{render, OutputFormat};

#[derive(Args, Debug, Clone)]
#[command(name = "generate-keypair", about = "Generate a new STARK-curve keypair")]
pub struct GenerateKeypairArgs {}

#[derive(Debug, Serialize)]
struct KeypairView {
    public_key: String,
    private_key: String,
}

#[derive(Debug, Serialize)]
struct PublicKeyView {
    public_key: String,
    hash_scheme: String,
}

pub fn handle_generate_keypair_command(_args: &GenerateKeypairArgs, format: OutputFormat) -> Result<String> {
    let (key, public_key) = generate_keypair();
    let view = KeypairView {
        public_key: felt_to_hex(&public_key),
        private_key: key.expose_secret_hex(),
    };

    render(
        format,
        &view,
        &[
            ("Public Key", view.public_key.clone()),
            ("Private Key", view.private_key.clone()),
        ],
    )
}

/// Public key of the configured signing key
pub fn handle_pubkey_command(signer: &MessageSigner, format: OutputFormat) -> Result<String> {
    let view = PublicKeyView {
        public_key: felt_to_hex(&signer.public_key()),
        hash_scheme: signer.hash_scheme().to_string(),
    };

    render(
        format,
        &view,
        &[
            ("Public Key", view.public_key.clone()),
            ("Hash scheme", view.hash_scheme.clone()),
        ],
    )
}
