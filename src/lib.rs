pub mod cli;
pub mod format;
pub mod inspect;
pub mod policy;
pub mod signature;
pub mod stego;

pub use format::{FormatRejection, FormatValidator, ImageArtifact};
pub use inspect::{
    AnalysisPolicy, DEFAULT_MAX_INPUT_BYTES, FailureKind, InspectionStats, InspectionVerdict,
    Inspector, InspectorConfig, SUCCESS_REASON,
};
pub use policy::{AcceptedFormatPolicy, ColorMode, ImageKind};
pub use signature::{MaliciousSignature, SignatureHit, SignatureSet};
pub use stego::{DEFAULT_MIN_PAYLOAD_LEN, HiddenDataSource, StegoConfig, StegoDetector, StegoFinding};
