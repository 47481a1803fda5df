use crate::format::{FormatRejection, FormatValidator};
use crate::policy::{AcceptedFormatPolicy, ImageKind};
use crate::signature::SignatureSet;
use crate::stego::{StegoConfig, StegoDetector, StegoFinding};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

pub const SUCCESS_REASON: &str = "validated successfully";
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Every way an upload can be refused. `reason` strings on the verdict are
/// derived from these and stay safe to show to the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CorruptOrUnreadable,
    UnsupportedFormat,
    UnsupportedColorMode,
    OversizedDimensions,
    MaliciousSignatureFound,
    HiddenDataDetected,
    AnalysisError,
    InputTooLarge,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::CorruptOrUnreadable => "corrupt_or_unreadable",
            FailureKind::UnsupportedFormat => "unsupported_format",
            FailureKind::UnsupportedColorMode => "unsupported_color_mode",
            FailureKind::OversizedDimensions => "oversized_dimensions",
            FailureKind::MaliciousSignatureFound => "malicious_signature_found",
            FailureKind::HiddenDataDetected => "hidden_data_detected",
            FailureKind::AnalysisError => "analysis_error",
            FailureKind::InputTooLarge => "input_too_large",
        }
    }
}

/// The single immutable answer for one buffer. `failure_kind` is `None`
/// exactly when `safe` is true; `digest` is the SHA-256 of the inspected
/// bytes, binding the verdict to its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionVerdict {
    pub safe: bool,
    pub reason: String,
    pub failure_kind: Option<FailureKind>,
    pub digest: String,
}

impl InspectionVerdict {
    fn accepted(digest: String) -> Self {
        Self {
            safe: true,
            reason: SUCCESS_REASON.to_string(),
            failure_kind: None,
            digest,
        }
    }

    fn rejected(kind: FailureKind, reason: String, digest: String) -> Self {
        Self {
            safe: false,
            reason,
            failure_kind: Some(kind),
            digest,
        }
    }
}

/// What to do when the steganography stage cannot complete its analysis.
/// Lenient passes the upload and logs; Strict rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPolicy {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Clone)]
pub struct InspectorConfig {
    pub format_policy: AcceptedFormatPolicy,
    pub signatures: SignatureSet,
    pub stego: StegoConfig,
    pub analysis_policy: AnalysisPolicy,
    pub max_input_bytes: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            format_policy: AcceptedFormatPolicy::default(),
            signatures: SignatureSet::default_threats(),
            stego: StegoConfig::default(),
            analysis_policy: AnalysisPolicy::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl InspectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format_policy(mut self, policy: AcceptedFormatPolicy) -> Self {
        self.format_policy = policy;
        self
    }

    pub fn with_signatures(mut self, signatures: SignatureSet) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn with_stego(mut self, stego: StegoConfig) -> Self {
        self.stego = stego;
        self
    }

    pub fn with_analysis_policy(mut self, policy: AnalysisPolicy) -> Self {
        self.analysis_policy = policy;
        self
    }

    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }
}

/// Counters over a run of inspections. Observability only; verdict logic
/// never reads them back.
#[derive(Debug, Default)]
pub struct InspectionStats {
    total: AtomicUsize,
    accepted: AtomicUsize,
    rejected: AtomicUsize,
    degraded_passes: AtomicUsize,
}

impl InspectionStats {
    pub fn record(&self, verdict: &InspectionVerdict) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if verdict.safe {
            self.accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_degraded(&self) {
        self.degraded_passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn degraded_passes(&self) -> usize {
        self.degraded_passes.load(Ordering::Relaxed)
    }

    pub fn summary(&self) -> String {
        let total = self.total();
        let accepted = self.accepted();
        let rejected = self.rejected();
        let degraded = self.degraded_passes();

        format!(
            "Inspection Summary:\n\
             - Total inspected: {}\n\
             - Accepted: {}\n\
             - Rejected: {} ({:.1}%)\n\
             - Degraded passes: {}",
            total,
            accepted,
            rejected,
            if total > 0 {
                (rejected as f64 / total as f64) * 100.0
            } else {
                0.0
            },
            degraded
        )
    }
}

/// Runs the full pipeline over one buffer at a time: input bound, format
/// validation, signature scan, steganography analysis, in that order, the
/// first failure deciding the verdict. Holds no mutable state besides the
/// atomic counters, so one instance can be shared across threads.
pub struct Inspector {
    format: FormatValidator,
    signatures: SignatureSet,
    stego: StegoDetector,
    analysis_policy: AnalysisPolicy,
    max_input_bytes: usize,
    stats: InspectionStats,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self {
            format: FormatValidator::new(config.format_policy),
            signatures: config.signatures,
            stego: StegoDetector::new(config.stego),
            analysis_policy: config.analysis_policy,
            max_input_bytes: config.max_input_bytes,
            stats: InspectionStats::default(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(InspectorConfig::default())
    }

    pub fn stats(&self) -> &InspectionStats {
        &self.stats
    }

    pub fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// Inspects one buffer and returns the verdict. Pure in the bytes and
    /// the injected config: the same input always yields the same verdict.
    /// The declared MIME type is advisory; a mismatch is logged and never
    /// influences the outcome.
    pub fn inspect(&self, data: &[u8], declared_mime: Option<&str>) -> InspectionVerdict {
        let digest = content_digest(data);

        if data.len() > self.max_input_bytes {
            return self.finish(InspectionVerdict::rejected(
                FailureKind::InputTooLarge,
                format!("input larger than the {} byte limit", self.max_input_bytes),
                digest,
            ));
        }

        let artifact = match self.format.validate(data) {
            Ok(artifact) => artifact,
            Err(rejection) => {
                return self.finish(InspectionVerdict::rejected(
                    rejection_kind(&rejection),
                    rejection.to_string(),
                    digest,
                ));
            }
        };

        if let Some(declared) = declared_mime {
            if !mime_agrees(declared, artifact.kind) {
                warn!(
                    declared,
                    detected = artifact.kind.name(),
                    "declared MIME type disagrees with detected format"
                );
            }
        }

        if let Some(hit) = self.signatures.scan(data) {
            debug!(offset = hit.offset, "malicious signature matched");
            return self.finish(InspectionVerdict::rejected(
                FailureKind::MaliciousSignatureFound,
                format!("malicious content detected: {}", hit.description),
                digest,
            ));
        }

        match self.stego.analyze(data, &artifact) {
            StegoFinding::NoHiddenData => {}
            StegoFinding::HiddenDataFound { detail, .. } => {
                return self.finish(InspectionVerdict::rejected(
                    FailureKind::HiddenDataDetected,
                    format!("hidden data detected: {detail}"),
                    digest,
                ));
            }
            StegoFinding::AnalysisError { cause } => match self.analysis_policy {
                AnalysisPolicy::Lenient => {
                    warn!(%cause, "steganography analysis incomplete; passing under lenient policy");
                    self.stats.record_degraded();
                }
                AnalysisPolicy::Strict => {
                    warn!(%cause, "steganography analysis incomplete; rejecting under strict policy");
                    return self.finish(InspectionVerdict::rejected(
                        FailureKind::AnalysisError,
                        "content analysis could not be completed".to_string(),
                        digest,
                    ));
                }
            },
        }

        self.finish(InspectionVerdict::accepted(digest))
    }

    fn finish(&self, verdict: InspectionVerdict) -> InspectionVerdict {
        self.stats.record(&verdict);
        if let Some(kind) = verdict.failure_kind {
            debug!(kind = kind.label(), reason = %verdict.reason, "upload rejected");
        }
        verdict
    }
}

pub fn content_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn rejection_kind(rejection: &FormatRejection) -> FailureKind {
    match rejection {
        FormatRejection::Corrupt => FailureKind::CorruptOrUnreadable,
        FormatRejection::UnsupportedFormat(_) => FailureKind::UnsupportedFormat,
        FormatRejection::UnsupportedColorMode(_) => FailureKind::UnsupportedColorMode,
        FormatRejection::Oversized { .. } => FailureKind::OversizedDimensions,
    }
}

fn mime_agrees(declared: &str, kind: ImageKind) -> bool {
    if declared.eq_ignore_ascii_case(kind.mime_type()) {
        return true;
    }
    // image/jpg is wrong but ubiquitous.
    kind == ImageKind::Jpeg && declared.eq_ignore_ascii_case("image/jpg")
}
