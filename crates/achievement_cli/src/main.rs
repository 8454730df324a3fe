use std::path::PathBuf;

use achievement_cli::commands::{
    allowance::{handle_allowance_command, AllowanceArgs},
    keypair::{handle_generate_keypair_command, handle_pubkey_command, GenerateKeypairArgs},
    sign::{handle_sign_command, SignArgs},
    vectors::{handle_vectors_command, VectorsArgs},
    verify::{handle_verify_command, VerifyArgs},
};
use achievement_cli::{AppConfig, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "achievement-cli")]
#[command(about = "Sign and verify achievement messages on the STARK curve")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Additional configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign (contract, account, index)
    Sign(SignArgs),
    /// Verify a signature
    Verify(VerifyArgs),
    /// Run a test-vector table
    Vectors(VectorsArgs),
    /// Print the configured public key
    Pubkey,
    /// Generate a new keypair
    GenerateKeypair(GenerateKeypairArgs),
    /// Query an ERC-20 allowance
    Allowance(AllowanceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing on stderr so stdout only carries command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Configuration loaded: {:?}", config);

    match cli.command {
        Commands::Sign(args) => {
            let signer = config.signer()?;
            println!("{}", handle_sign_command(&args, &signer, cli.format)?);
        }
        Commands::Verify(args) => {
            let (report, valid) = handle_verify_command(&args, &config, cli.format)?;
            println!("{}", report);
            if !valid {
                bail!("Signature verification failed");
            }
        }
        Commands::Vectors(args) => {
            let signer = config.signer()?;
            let report = handle_vectors_command(&args, &signer)?;
            println!("{}", report.render(cli.format)?);
            if !report.all_passed() {
                bail!("{} of {} vectors failed", report.failed(), report.len());
            }
        }
        Commands::Pubkey => {
            let signer = config.signer()?;
            println!("{}", handle_pubkey_command(&signer, cli.format)?);
        }
        Commands::GenerateKeypair(args) => {
            println!("{}", handle_generate_keypair_command(&args, cli.format)?);
        }
        Commands::Allowance(args) => {
            if let Some(public_key) = config.signer_public_key() {
                tracing::info!("Signer public key: {:#x}", public_key);
            }
            println!("{}", handle_allowance_command(&args, &config.rpc, cli.format).await?);
        }
    }

    Ok(())
}
