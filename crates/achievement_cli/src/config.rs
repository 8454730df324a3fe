//! Layered configuration for the signer CLI

use std::fmt;
use std::path::{Path, PathBuf};

use achievement_chain::RpcConfig;
use achievement_core::{FieldElement, HashScheme, MessageSigner, SigningKey};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_LOG_FILTER: &str = "achievement_cli=info,achievement_core=info,achievement_chain=info";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:5050";

/// Main application configuration
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Secret signing key, hex (`0x...`) or decimal
    #[serde(default)]
    pub signing_key: Option<String>,
    /// Hash applied to the message tuple before signing
    pub hash_scheme: HashScheme,
    /// Starknet node used by the allowance query
    pub rpc: RpcConfig,
    /// Fallback `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("hash_scheme", &self.hash_scheme)
            .field("rpc", &self.rpc)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default locations, then `explicit` if given, then the environment
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(user_config_path(), explicit)
    }

    /// Same as [`AppConfig::load`] with the per-user file location supplied by the caller
    pub fn load_from(user_file: Option<PathBuf>, explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            // Default configuration
            .set_default("hash_scheme", "pedersen")?
            .set_default("rpc.url", DEFAULT_RPC_URL)?
            .set_default("rpc.timeout_secs", 30)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;

        // Per-user file
        if let Some(path) = user_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        // Project file
        builder = builder.add_source(config::File::with_name("config/achievement").required(false));

        // File named on the command line must exist
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path));
        }

        // Environment variables, e.g. ACHIEVEMENT_SIGNING_KEY or ACHIEVEMENT_RPC__URL
        let config = builder
            .add_source(
                config::Environment::with_prefix("ACHIEVEMENT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Parse the configured signing key
    pub fn signing_key(&self) -> Result<SigningKey> {
        let text = self.signing_key.as_deref().ok_or_else(|| {
            anyhow!("No signing key configured; set ACHIEVEMENT_SIGNING_KEY or `signing_key` in the config file")
        })?;
        SigningKey::parse(text).context("Configured signing key is invalid")
    }

    /// Public key of the configured signing key, if one is set. An unusable key is reported and skipped.
    pub fn signer_public_key(&self) -> Option<FieldElement> {
        self.signing_key.as_ref()?;
        match self.signing_key() {
            Ok(key) => Some(key.public_key()),
            Err(e) => {
                warn!("Cannot derive signer public key: {:#}", e);
                None
            }
        }
    }

    /// Build the signer from the configured key and hash scheme
    pub fn signer(&self) -> Result<MessageSigner> {
        Ok(MessageSigner::new(self.signing_key()?, self.hash_scheme))
    }
}

/// `~/.achievement/signer.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".achievement").join("signer.toml"))
}
