use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;

use lynceus::{Inspector, SignatureSet};

fn encoded_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([0, 0, 0])));
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .expect("encode failed");
    data
}

/// Single-pass Aho-Corasick scan over clean buffers of increasing size.
fn bench_signature_scan(c: &mut Criterion) {
    let set = SignatureSet::default();
    let sizes: &[(&str, usize)] = &[
        ("64 KiB", 64 * 1024),
        ("1 MiB", 1024 * 1024),
        ("8 MiB", 8 * 1024 * 1024),
    ];

    let mut group = c.benchmark_group("signature_scan");
    for &(label, size) in sizes {
        let data = vec![0xA7u8; size];
        group.bench_function(label, |b| {
            b.iter(|| black_box(set.scan(black_box(&data))));
        });
    }
    group.finish();
}

/// Full pipeline on a clean upload: decode, scan, and LSB extraction.
fn bench_full_inspection(c: &mut Criterion) {
    let data = encoded_png(256, 256);

    c.bench_function("inspect_clean_png (256x256)", |b| {
        let inspector = Inspector::with_defaults();
        b.iter(|| {
            let verdict = inspector.inspect(black_box(&data), None);
            assert!(verdict.safe);
            black_box(verdict);
        });
    });
}

/// LSB extraction alone, over already-decoded pixels.
fn bench_lsb_reveal(c: &mut Criterion) {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(256, 256, Rgb([0, 0, 0])));

    c.bench_function("lsb_reveal (256x256)", |b| {
        b.iter(|| black_box(lynceus::stego::lsb::reveal(black_box(&img))));
    });
}

criterion_group!(
    benches,
    bench_signature_scan,
    bench_full_inspection,
    bench_lsb_reveal,
);
criterion_main!(benches);
