use crate::inspect::{AnalysisPolicy, DEFAULT_MAX_INPUT_BYTES, InspectorConfig};
use crate::signature::SignatureSet;
use crate::stego::{DEFAULT_MIN_PAYLOAD_LEN, StegoConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lynceus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Content-safety inspection for untrusted image uploads", long_about = None)]
pub struct Cli {
    /// Image files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// JSON file with extra malicious signatures, extending the built-in set
    #[arg(long)]
    pub signatures: Option<PathBuf>,

    /// Maximum input size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub max_bytes: usize,

    /// Minimum recovered payload length treated as hidden data
    #[arg(long, default_value_t = DEFAULT_MIN_PAYLOAD_LEN)]
    pub min_payload: usize,

    /// Reject uploads whose steganography analysis cannot complete
    #[arg(long)]
    pub strict: bool,

    /// Declared MIME type to cross-check against the detected format
    #[arg(long)]
    pub declared_mime: Option<String>,

    /// Emit one JSON object per file instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn build_config(cli: &Cli) -> Result<InspectorConfig> {
    let mut signatures = SignatureSet::default_threats();
    if let Some(path) = &cli.signatures {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read signature file {}", path.display()))?;
        let extra = SignatureSet::from_json_slice(&data)
            .with_context(|| format!("invalid signature file {}", path.display()))?;
        signatures.extend(extra);
    }

    let analysis_policy = if cli.strict {
        AnalysisPolicy::Strict
    } else {
        AnalysisPolicy::Lenient
    };

    Ok(InspectorConfig::new()
        .with_signatures(signatures)
        .with_stego(StegoConfig::new().with_min_payload_len(cli.min_payload))
        .with_analysis_policy(analysis_policy)
        .with_max_input_bytes(cli.max_bytes))
}
