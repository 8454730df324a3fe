use achievement_core::{MessageSigner, NumberFormat};
use anyhow::{Context, Result};
use clap::Args;

use crate::output::{render, OutputFormat};

#[derive(Args, Debug, Clone)]
#[command(about = "Sign an achievement message")]
pub struct SignArgs {
    /// Contract address (hex with 0x prefix, or decimal)
    #[arg(long)]
    pub contract: String,
    /// Account address (hex with 0x prefix, or decimal)
    #[arg(long)]
    pub account: String,
    /// Achievement index
    #[arg(long)]
    pub index: String,
    /// Print r and s in hex instead of decimal
    #[arg(long)]
    pub hex: bool,
}

pub fn handle_sign_command(args: &SignArgs, signer: &MessageSigner, format: OutputFormat) -> Result<String> {
    let signed = signer
        .sign(&args.contract, &args.account, &args.index)
        .context("Failed to sign achievement message")?;

    let number_format = if args.hex {
        NumberFormat::Hex
    } else {
        NumberFormat::Decimal
    };
    let view = signed.render(number_format);

    render(
        format,
        &view,
        &[
            ("Hash", view.hash.clone()),
            ("r", view.r.clone()),
            ("s", view.s.clone()),
        ],
    )
}
