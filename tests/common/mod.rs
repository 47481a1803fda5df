#![allow(dead_code)]

use image::codecs::gif::GifEncoder;
use image::{DynamicImage, Frame, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};
use std::io::Cursor;

pub fn rgb_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([0, 0, 0])))
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), format).unwrap();
    data
}

pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    encode(&rgb_image(width, height), ImageFormat::Png)
}

pub fn rgb_jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(&rgb_image(width, height), ImageFormat::Jpeg)
}

pub fn rgb_bmp(width: u32, height: u32) -> Vec<u8> {
    encode(&rgb_image(width, height), ImageFormat::Bmp)
}

pub fn grayscale_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(width, height, Luma([0])));
    encode(&img, ImageFormat::Png)
}

pub fn rgb16_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb16(ImageBuffer::from_pixel(width, height, Rgb([0u16, 0, 0])));
    encode(&img, ImageFormat::Png)
}

pub fn animated_gif(frame_count: u32) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut data);
        let frames = (0..frame_count).map(|i| {
            let shade = (i * 20) as u8;
            Frame::new(ImageBuffer::from_pixel(16, 16, Rgba([shade, 0, 0, 255])))
        });
        encoder.encode_frames(frames).unwrap();
    }
    data
}

/// PNG signature plus a valid IHDR claiming the given dimensions, with no
/// pixel data behind it. Enough for the header probe to read.
pub fn png_header_claiming(width: u32, height: u32) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);

    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&(ihdr.len() as u32).to_be_bytes());
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&ihdr);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(b"IHDR");
    hasher.update(&ihdr);
    data.extend_from_slice(&hasher.finalize().to_be_bytes());
    data
}

/// PNG carrying the given payload in its pixel LSBs. PNG is lossless, so
/// the embedded stream survives the encode/decode round trip untouched.
pub fn png_with_lsb_payload(payload: &[u8]) -> Vec<u8> {
    let stego = lynceus::stego::lsb::embed(&rgb_image(64, 64), payload).unwrap();
    encode(&stego, ImageFormat::Png)
}

pub fn bmp_with_lsb_payload(payload: &[u8]) -> Vec<u8> {
    let stego = lynceus::stego::lsb::embed(&rgb_image(64, 64), payload).unwrap();
    encode(&stego, ImageFormat::Bmp)
}

/// Little-endian TIFF block with a single ASCII entry in IFD0.
pub fn tiff_with_ascii_field(tag: u16, text: &str) -> Vec<u8> {
    let mut value = text.as_bytes().to_vec();
    value.push(0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&tag.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_le_bytes());
    if value.len() <= 4 {
        let mut inline = value.clone();
        inline.resize(4, 0);
        tiff.extend_from_slice(&inline);
        tiff.extend_from_slice(&0u32.to_le_bytes());
    } else {
        tiff.extend_from_slice(&26u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(&value);
    }
    tiff
}

/// TIFF block whose IFD0 points at an Exif sub-IFD holding a UserComment.
pub fn tiff_with_user_comment(text: &str) -> Vec<u8> {
    let mut comment = b"ASCII\0\0\0".to_vec();
    comment.extend_from_slice(text.as_bytes());

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    // IFD0: one entry, the Exif IFD pointer.
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    // Exif IFD at offset 26: one UNDEFINED UserComment entry.
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9286u16.to_le_bytes());
    tiff.extend_from_slice(&7u16.to_le_bytes());
    tiff.extend_from_slice(&(comment.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&44u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&comment);
    tiff
}

/// Splices an EXIF APP1 segment into a freshly encoded JPEG, right after
/// the SOI marker where decoders expect it.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let base = rgb_jpeg(16, 16);
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);

    let mut out = base[..2].to_vec();
    out.push(0xFF);
    out.push(0xE1);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&base[2..]);
    out
}

/// Splices an eXIf chunk into a freshly encoded PNG after its IHDR.
pub fn png_with_exif_chunk(tiff: &[u8]) -> Vec<u8> {
    let base = rgb_png(16, 16);

    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(tiff.len() as u32).to_be_bytes());
    chunk.extend_from_slice(b"eXIf");
    chunk.extend_from_slice(tiff);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(b"eXIf");
    hasher.update(tiff);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());

    // 8-byte signature + 25-byte IHDR chunk.
    let mut out = base[..33].to_vec();
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&base[33..]);
    out
}
