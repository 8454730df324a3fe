//! Command-line front end for the achievement signer

pub mod commands;
pub mod config;
pub mod output;

pub use config::AppConfig;
pub use output::OutputFormat;
