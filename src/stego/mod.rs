pub mod lsb;
pub mod metadata;

use crate::format::ImageArtifact;
use tracing::debug;

/// Recovered payloads at least this long count as hidden data. Shorter
/// recoveries are overwhelmingly pixel noise that happens to parse.
pub const DEFAULT_MIN_PAYLOAD_LEN: usize = 10;

/// Outcome of the steganography stage. `AnalysisError` means the checks
/// could not run to completion; it is explicitly distinct from both "no
/// hidden data" and "hidden data found" so the orchestrator's policy, not
/// an accident of control flow, decides what happens to the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoFinding {
    NoHiddenData,
    HiddenDataFound {
        source: HiddenDataSource,
        detail: String,
    },
    AnalysisError {
        cause: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenDataSource {
    LsbPayload,
    MetadataField,
}

#[derive(Debug, Clone)]
pub struct StegoConfig {
    pub min_payload_len: usize,
    pub check_metadata: bool,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            min_payload_len: DEFAULT_MIN_PAYLOAD_LEN,
            check_metadata: true,
        }
    }
}

impl StegoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_payload_len(mut self, len: usize) -> Self {
        self.min_payload_len = len;
        self
    }

    pub fn with_metadata_check(mut self, enabled: bool) -> Self {
        self.check_metadata = enabled;
        self
    }
}

pub struct StegoDetector {
    config: StegoConfig,
}

impl StegoDetector {
    pub fn new(config: StegoConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(StegoConfig::default())
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Runs the metadata check over the raw container bytes and the LSB
    /// extraction over the decoded pixels. Either sub-check finding hidden
    /// data decides immediately; sub-check failures are pooled into one
    /// `AnalysisError` so a clean result is only reported when every check
    /// actually ran.
    pub fn analyze(&self, raw: &[u8], artifact: &ImageArtifact) -> StegoFinding {
        let mut failures: Vec<String> = Vec::new();

        if self.config.check_metadata && artifact.kind.supports_exif() {
            match metadata::inspect_metadata(raw) {
                Ok(Some(field)) => {
                    debug!(field, "flagged metadata field present");
                    return StegoFinding::HiddenDataFound {
                        source: HiddenDataSource::MetadataField,
                        detail: format!("metadata field {field:?} is populated"),
                    };
                }
                Ok(None) => {}
                Err(err) => failures.push(err.to_string()),
            }
        }

        match lsb::reveal(&artifact.image) {
            Ok(Some(payload)) if payload.len() >= self.config.min_payload_len => {
                debug!(payload_len = payload.len(), "embedded payload recovered");
                return StegoFinding::HiddenDataFound {
                    source: HiddenDataSource::LsbPayload,
                    detail: format!("embedded payload of {} bytes", payload.len()),
                };
            }
            Ok(_) => {}
            Err(err) => failures.push(err.to_string()),
        }

        if failures.is_empty() {
            StegoFinding::NoHiddenData
        } else {
            StegoFinding::AnalysisError {
                cause: failures.join("; "),
            }
        }
    }
}
