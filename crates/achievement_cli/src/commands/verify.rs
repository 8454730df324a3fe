use achievement_core::{
    felt_to_hex, parse_field_element, verify_signed_message, FieldElement, HashScheme, MessageHasher,
    MessageTuple, SignedMessage, SignerError,
};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::output::{render, OutputFormat};

#[derive(Args, Debug, Clone)]
#[command(about = "Verify a signature over an achievement message")]
pub struct VerifyArgs {
    #[arg(long)]
    pub contract: String,
    #[arg(long)]
    pub account: String,
    #[arg(long)]
    pub index: String,
    /// Signature component r
    #[arg(long)]
    pub r: String,
    /// Signature component s
    #[arg(long)]
    pub s: String,
    /// Public key to check against; defaults to the configured key's
    #[arg(long)]
    pub public_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    hash: String,
    public_key: String,
    valid: bool,
}

/// Returns the rendered report and whether the signature checked out
pub fn handle_verify_command(args: &VerifyArgs, config: &AppConfig, format: OutputFormat) -> Result<(String, bool)> {
    let public_key = match &args.public_key {
        Some(text) => parse_field_element(text)
            .map_err(|e| SignerError::invalid_input("public_key", e))
            .context("Invalid public key")?,
        None => config.signing_key()?.public_key(),
    };

    verify_with_key(args, public_key, config.hash_scheme, format)
}

fn verify_with_key(
    args: &VerifyArgs,
    public_key: FieldElement,
    hash_scheme: HashScheme,
    format: OutputFormat,
) -> Result<(String, bool)> {
    let tuple = MessageTuple::parse(&args.contract, &args.account, &args.index)?;
    let r = parse_field_element(&args.r).map_err(|e| SignerError::invalid_input("r", e))?;
    let s = parse_field_element(&args.s).map_err(|e| SignerError::invalid_input("s", e))?;

    let signed = SignedMessage {
        hash: hash_scheme.hash_elements(&tuple.elements()),
        r,
        s,
    };

    let valid = match verify_signed_message(&public_key, &tuple, &signed, hash_scheme) {
        Ok(()) => true,
        Err(SignerError::InvalidSignature) => false,
        Err(SignerError::InvalidPublicKey) => {
            return Err(anyhow!("{} is not a valid public key", felt_to_hex(&public_key)))
        }
        Err(e) => return Err(e.into()),
    };

    let report = VerifyReport {
        hash: felt_to_hex(&signed.hash),
        public_key: felt_to_hex(&public_key),
        valid,
    };
    let status = if valid { "valid" } else { "INVALID" };
    let rendered = render(
        format,
        &report,
        &[
            ("Hash", report.hash.clone()),
            ("Public key", report.public_key.clone()),
            ("Signature", status.to_string()),
        ],
    )?;

    Ok((rendered, valid))
}
