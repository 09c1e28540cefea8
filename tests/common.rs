#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use img_shrink::ImageKind;
use std::fs;
use std::path::{Path, PathBuf};

/// Deterministic pixel noise, hard for any codec to compress.
pub fn noise_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503))
            .wrapping_mul(2_246_822_519);
        Rgb([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8])
    }))
}

pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

/// PNG that exceeds the maximum dimension.
pub fn write_oversized_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_image(width, height).save(&path).unwrap();
    path
}

/// JPEG at quality 100, which a quality 85 re-encode always shrinks.
pub fn write_heavy_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = Vec::new();
    noise_image(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, 100))
        .unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

pub fn write_small_webp(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    gradient_image(80, 60).save(&path).unwrap();
    path
}

/// Lossy WebP at quality 90, the way a camera export or CMS would ship it.
pub fn write_lossy_webp(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let bytes = ImageKind::WebP.encode(&noise_image(width, height), 90).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

/// PNG data with an alpha channel stored under a `.jpg` name.
pub fn write_rgba_as_jpg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 90])))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"fake image data").unwrap();
    path
}
