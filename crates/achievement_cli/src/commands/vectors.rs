use std::path::PathBuf;

use achievement_core::{felt_to_hex, run_vectors, HashScheme, MessageSigner, VectorOutcome, VectorTable};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::OutputFormat;

#[derive(Args, Debug, Clone)]
#[command(about = "Sign every row of a test-vector table")]
pub struct VectorsArgs {
    /// TOML vector table; the built-in table is used when omitted
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct VectorRow {
    name: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    r: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash_matches: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&VectorOutcome> for VectorRow {
    fn from(outcome: &VectorOutcome) -> Self {
        let (hash, r, s, error) = match &outcome.result {
            Ok(signed) => (
                Some(felt_to_hex(&signed.hash)),
                Some(signed.r.to_string()),
                Some(signed.s.to_string()),
                None,
            ),
            Err(e) => (None, None, None, Some(e.to_string())),
        };

        Self {
            name: outcome.name.clone(),
            passed: outcome.passed(),
            hash,
            r,
            s,
            hash_matches: outcome.hash_matches,
            error,
        }
    }
}

/// Report over a whole table
#[derive(Debug)]
pub struct VectorReport {
    rows: Vec<VectorRow>,
}

impl VectorReport {
    pub fn all_passed(&self) -> bool {
        self.rows.iter().all(|row| row.passed)
    }

    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|row| !row.passed).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.rows)?),
            OutputFormat::Text => Ok(self
                .rows
                .iter()
                .map(render_row)
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }
}

fn render_row(row: &VectorRow) -> String {
    let mut lines = vec![format!("[{}] {}", if row.passed { "PASS" } else { "FAIL" }, row.name)];

    if let (Some(hash), Some(r), Some(s)) = (&row.hash, &row.r, &row.s) {
        lines.push(format!("  Hash: {}", hash));
        lines.push(format!("  r: {}", r));
        lines.push(format!("  s: {}", s));
    }
    if row.hash_matches == Some(false) {
        lines.push("  Hash does not match the expected value".to_string());
    }
    if let Some(error) = &row.error {
        lines.push(format!("  Error: {}", error));
    }

    lines.join("\n")
}

pub fn handle_vectors_command(args: &VectorsArgs, signer: &MessageSigner) -> Result<VectorReport> {
    let table = match &args.file {
        Some(path) => VectorTable::from_path(path)
            .with_context(|| format!("Failed to load vector table from {}", path.display()))?,
        None if signer.hash_scheme() != HashScheme::Pedersen => {
            warn!(
                "Built-in digests are for pedersen hashing; checking {} vectors without them",
                signer.hash_scheme()
            );
            VectorTable::builtin().without_expected_hashes()
        }
        None => VectorTable::builtin(),
    };

    info!("Running {} vectors with {} hashing", table.vectors.len(), signer.hash_scheme());

    let outcomes = run_vectors(signer, &table);
    let report = VectorReport {
        rows: outcomes.iter().map(VectorRow::from).collect(),
    };

    if !report.all_passed() {
        warn!("{} of {} vectors failed", report.failed(), report.len());
    }

    Ok(report)
}
