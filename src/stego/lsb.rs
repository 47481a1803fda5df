//! Least-significant-bit payload codec.
//!
//! The embedded stream is an ASCII decimal payload length, a `:` separator,
//! then the payload bytes, packed MSB-first into the LSB of every 8-bit
//! channel sample in row-major order. This matches the wire format produced
//! by the embedding tools the pipeline is deployed against, alpha channels
//! included.

use image::DynamicImage;

const LENGTH_SEPARATOR: u8 = b':';
// A real length prefix fits comfortably; anything longer is pixel noise.
const MAX_LENGTH_DIGITS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LsbError {
    #[error("unsupported sample depth for LSB analysis")]
    UnsupportedSampleDepth,
    #[error("payload needs {needed_bits} bits but the image holds {capacity_bits}")]
    PayloadTooLarge {
        needed_bits: usize,
        capacity_bits: usize,
    },
}

fn samples(image: &DynamicImage) -> Option<&[u8]> {
    match image {
        DynamicImage::ImageLuma8(b) => Some(b.as_raw().as_slice()),
        DynamicImage::ImageLumaA8(b) => Some(b.as_raw().as_slice()),
        DynamicImage::ImageRgb8(b) => Some(b.as_raw().as_slice()),
        DynamicImage::ImageRgba8(b) => Some(b.as_raw().as_slice()),
        _ => None,
    }
}

fn samples_mut(image: &mut DynamicImage) -> Option<&mut [u8]> {
    match image {
        DynamicImage::ImageLuma8(b) => Some(b.as_flat_samples_mut().samples),
        DynamicImage::ImageLumaA8(b) => Some(b.as_flat_samples_mut().samples),
        DynamicImage::ImageRgb8(b) => Some(b.as_flat_samples_mut().samples),
        DynamicImage::ImageRgba8(b) => Some(b.as_flat_samples_mut().samples),
        _ => None,
    }
}

struct BitCursor<'a> {
    samples: &'a [u8],
    pos: usize,
}

impl<'a> BitCursor<'a> {
    fn new(samples: &'a [u8]) -> Self {
        Self { samples, pos: 0 }
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.pos + 8 > self.samples.len() {
            return None;
        }
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | (self.samples[self.pos] & 1);
            self.pos += 1;
        }
        Some(byte)
    }

    fn remaining_bytes(&self) -> usize {
        (self.samples.len() - self.pos) / 8
    }
}

/// Extracts an embedded payload if one is present.
///
/// `Ok(None)` means the image carries no well-formed stream: no digit
/// before the separator, a missing separator, or a declared length the
/// pixel data cannot hold. Those are ordinary outcomes for clean images,
/// not analysis failures.
pub fn reveal(image: &DynamicImage) -> Result<Option<Vec<u8>>, LsbError> {
    let samples = samples(image).ok_or(LsbError::UnsupportedSampleDepth)?;
    let mut bits = BitCursor::new(samples);

    let mut digits: Vec<u8> = Vec::new();
    loop {
        let Some(byte) = bits.read_byte() else {
            return Ok(None);
        };
        if byte == LENGTH_SEPARATOR {
            break;
        }
        if !byte.is_ascii_digit() || digits.len() >= MAX_LENGTH_DIGITS {
            return Ok(None);
        }
        digits.push(byte);
    }
    if digits.is_empty() {
        return Ok(None);
    }

    let declared = match std::str::from_utf8(&digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
    {
        Some(len) => len,
        None => return Ok(None),
    };
    if declared > bits.remaining_bytes() {
        return Ok(None);
    }

    let mut payload = Vec::with_capacity(declared);
    for _ in 0..declared {
        match bits.read_byte() {
            Some(byte) => payload.push(byte),
            None => return Ok(None),
        }
    }
    Ok(Some(payload))
}

/// Writes `payload` into a copy of `image` in the format `reveal` reads.
/// Used to produce inspection fixtures; the pipeline itself never embeds.
pub fn embed(image: &DynamicImage, payload: &[u8]) -> Result<DynamicImage, LsbError> {
    let mut stego = image.clone();
    let samples = samples_mut(&mut stego).ok_or(LsbError::UnsupportedSampleDepth)?;

    let header = format!("{}:", payload.len()).into_bytes();
    let needed_bits = (header.len() + payload.len()) * 8;
    if needed_bits > samples.len() {
        return Err(LsbError::PayloadTooLarge {
            needed_bits,
            capacity_bits: samples.len(),
        });
    }

    let mut pos = 0;
    for &byte in header.iter().chain(payload.iter()) {
        for shift in (0..8).rev() {
            samples[pos] = (samples[pos] & !1) | ((byte >> shift) & 1);
            pos += 1;
        }
    }
    Ok(stego)
}
