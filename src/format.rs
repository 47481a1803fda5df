use crate::policy::{AcceptedFormatPolicy, ColorMode, ImageKind};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView};
use std::io::Cursor;
use tracing::debug;

/// Summary of a fully decoded upload, handed to the steganography stage.
#[derive(Debug, PartialEq)]
pub struct ImageArtifact {
    pub image: DynamicImage,
    pub kind: ImageKind,
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
}

/// Why the format stage refused a buffer. `Display` renders the
/// uploader-facing reason; decode internals only go to the log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatRejection {
    #[error("image is corrupt or cannot be decoded")]
    Corrupt,
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("unsupported color mode: {0}")]
    UnsupportedColorMode(String),
    #[error("image dimensions {width}x{height} exceed the {max_width}x{max_height} limit")]
    Oversized {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
}

/// Runs the structural checks: identify, decode in full, then apply the
/// format, color-mode, and dimension policy.
pub struct FormatValidator {
    policy: AcceptedFormatPolicy,
}

impl FormatValidator {
    pub fn new(policy: AcceptedFormatPolicy) -> Self {
        Self { policy }
    }

    pub fn with_defaults() -> Self {
        Self::new(AcceptedFormatPolicy::default())
    }

    pub fn policy(&self) -> &AcceptedFormatPolicy {
        &self.policy
    }

    pub fn validate(&self, data: &[u8]) -> Result<ImageArtifact, FormatRejection> {
        if data.is_empty() {
            return Err(FormatRejection::Corrupt);
        }

        // Header-declared dimensions are checked before any pixel data is
        // inflated so a decompression bomb never reaches the decoder.
        if let Ok(size) = imagesize::blob_size(data) {
            if size.width as u64 > self.policy.max_width as u64
                || size.height as u64 > self.policy.max_height as u64
            {
                return Err(FormatRejection::Oversized {
                    width: clamp_u32(size.width),
                    height: clamp_u32(size.height),
                    max_width: self.policy.max_width,
                    max_height: self.policy.max_height,
                });
            }
        }

        let reader = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|_| FormatRejection::Corrupt)?;
        let Some(format) = reader.format() else {
            return Err(FormatRejection::Corrupt);
        };

        let kind = match ImageKind::from_detected(format) {
            Some(kind) => kind,
            None => return Err(FormatRejection::UnsupportedFormat(format!("{format:?}"))),
        };
        if !self.policy.allows_format(kind) {
            return Err(FormatRejection::UnsupportedFormat(kind.name().to_string()));
        }

        // Full structural decode. Header sniffing is not enough: a file that
        // fails anywhere in its scanline or frame data is rejected.
        let image = if kind == ImageKind::Gif {
            decode_all_gif_frames(data)?
        } else {
            reader.decode().map_err(|err| {
                debug!(error = %err, "structural decode failed");
                FormatRejection::Corrupt
            })?
        };

        let Some(mode) = ColorMode::from_color_type(image.color()) else {
            return Err(FormatRejection::UnsupportedColorMode(
                "unrecognized pixel layout".to_string(),
            ));
        };
        if !self.policy.allows_mode(mode) {
            return Err(FormatRejection::UnsupportedColorMode(mode.name().to_string()));
        }

        let (width, height) = image.dimensions();
        if !self.policy.within_dimensions(width, height) {
            return Err(FormatRejection::Oversized {
                width,
                height,
                max_width: self.policy.max_width,
                max_height: self.policy.max_height,
            });
        }

        Ok(ImageArtifact {
            image,
            kind,
            mode,
            width,
            height,
        })
    }
}

/// Animated GIFs must decode every frame, not just the first. The artifact
/// keeps the first frame; a failure in any later frame still rejects.
fn decode_all_gif_frames(data: &[u8]) -> Result<DynamicImage, FormatRejection> {
    let decoder = GifDecoder::new(Cursor::new(data)).map_err(|err| {
        debug!(error = %err, "GIF header decode failed");
        FormatRejection::Corrupt
    })?;
    let frames = decoder.into_frames().collect_frames().map_err(|err| {
        debug!(error = %err, "GIF frame decode failed");
        FormatRejection::Corrupt
    })?;
    match frames.into_iter().next() {
        Some(first) => Ok(DynamicImage::ImageRgba8(first.into_buffer())),
        None => Err(FormatRejection::Corrupt),
    }
}

fn clamp_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
