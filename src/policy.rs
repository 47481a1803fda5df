use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_IMAGE_WIDTH: u32 = 7680;
pub const MAX_IMAGE_HEIGHT: u32 = 4320;

/// Image container formats the pipeline knows how to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
}

impl ImageKind {
    pub fn from_detected(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            image::ImageFormat::Png => Some(ImageKind::Png),
            image::ImageFormat::Gif => Some(ImageKind::Gif),
            image::ImageFormat::Bmp => Some(ImageKind::Bmp),
            image::ImageFormat::WebP => Some(ImageKind::WebP),
            image::ImageFormat::Tiff => Some(ImageKind::Tiff),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::Gif => "GIF",
            ImageKind::Bmp => "BMP",
            ImageKind::WebP => "WebP",
            ImageKind::Tiff => "TIFF",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Bmp => "image/bmp",
            ImageKind::WebP => "image/webp",
            ImageKind::Tiff => "image/tiff",
        }
    }

    /// Containers that can carry an EXIF block. GIF and BMP cannot, so the
    /// metadata sub-check skips them instead of reporting a parse failure.
    pub fn supports_exif(&self) -> bool {
        matches!(
            self,
            ImageKind::Jpeg | ImageKind::Png | ImageKind::WebP | ImageKind::Tiff
        )
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pixel layout of a decoded image, collapsed over sample depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    RgbAlpha,
}

impl ColorMode {
    pub fn from_color_type(color: image::ColorType) -> Option<Self> {
        match color {
            image::ColorType::L8 | image::ColorType::L16 => Some(ColorMode::Grayscale),
            image::ColorType::La8 | image::ColorType::La16 => Some(ColorMode::GrayscaleAlpha),
            image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F => {
                Some(ColorMode::Rgb)
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
                Some(ColorMode::RgbAlpha)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Grayscale => "grayscale",
            ColorMode::GrayscaleAlpha => "grayscale with alpha",
            ColorMode::Rgb => "RGB",
            ColorMode::RgbAlpha => "RGBA",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What the deployment accepts: container formats, pixel layouts, and the
/// dimension ceiling. Injected read-only into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedFormatPolicy {
    pub allowed_formats: Vec<ImageKind>,
    pub allowed_modes: Vec<ColorMode>,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for AcceptedFormatPolicy {
    fn default() -> Self {
        Self {
            allowed_formats: vec![ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif, ImageKind::Bmp],
            allowed_modes: vec![ColorMode::Grayscale, ColorMode::Rgb, ColorMode::RgbAlpha],
            max_width: MAX_IMAGE_WIDTH,
            max_height: MAX_IMAGE_HEIGHT,
        }
    }
}

impl AcceptedFormatPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: Vec<ImageKind>) -> Self {
        self.allowed_formats = formats;
        self
    }

    pub fn with_modes(mut self, modes: Vec<ColorMode>) -> Self {
        self.allowed_modes = modes;
        self
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn allows_format(&self, kind: ImageKind) -> bool {
        self.allowed_formats.contains(&kind)
    }

    pub fn allows_mode(&self, mode: ColorMode) -> bool {
        self.allowed_modes.contains(&mode)
    }

    /// Dimensions at the ceiling pass; only strictly larger images fail.
    pub fn within_dimensions(&self, width: u32, height: u32) -> bool {
        width <= self.max_width && height <= self.max_height
    }
}
