/// Image format handling for the files we rewrite.
///
/// The target format is always taken from the file's own extension: a file is
/// written back in the format its name promises, whatever it decoded from.
use crate::constants::{
    HIGH_COMPRESSION_QUALITY_THRESHOLD, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL,
    OXIPNG_PRESET, ZOPFLI_ITERATIONS, ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{OptimizeError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageFormat};
use oxipng::{Deflaters, Options};
use std::fmt;
use std::path::Path;

/// Formats handled by the optimizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG, lossy, honours the quality setting
    Jpeg,
    /// PNG, lossless, recompressed with oxipng
    Png,
    /// WebP, lossy, honours the quality setting
    WebP,
}

impl ImageKind {
    /// Detects the format from the extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Detects the format or fails with `UnsupportedFormat`.
    pub fn require_from_path(path: &Path) -> Result<Self> {
        Self::from_path(path).ok_or_else(|| {
            OptimizeError::UnsupportedFormat(format!("{} has no supported extension", path.display()))
        })
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::WebP => ImageFormat::WebP,
        }
    }

    /// Converts the pixel layout into one the target encoder can write.
    ///
    /// JPEG has no alpha channel, so anything carrying alpha becomes RGB.
    /// JPEG only takes 8-bit samples, the WebP encoder only RGB8 or RGBA8.
    pub fn normalize(self, img: DynamicImage) -> DynamicImage {
        match self {
            ImageKind::Jpeg => match img {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
                DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(img.to_luma8()),
                _ => DynamicImage::ImageRgb8(img.to_rgb8()),
            },
            ImageKind::WebP => match img {
                DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
                _ if img.color().has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
                _ => DynamicImage::ImageRgb8(img.to_rgb8()),
            },
            ImageKind::Png => match img.color() {
                ColorType::Rgba32F => DynamicImage::ImageRgba16(img.to_rgba16()),
                ColorType::Rgb32F => DynamicImage::ImageRgb16(img.to_rgb16()),
                _ => img,
            },
        }
    }

    /// Encodes `img` into memory with compression optimization enabled.
    pub fn encode(self, img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            ImageKind::Jpeg => {
                img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
            }
            ImageKind::Png => {
                img.write_with_encoder(PngEncoder::new_with_quality(
                    &mut buffer,
                    CompressionType::Fast,
                    PngFilterType::Adaptive,
                ))?;
                buffer = optimize_png(&buffer, quality)?;
            }
            ImageKind::WebP => {
                buffer = encode_webp(img, quality)?;
            }
        }
        Ok(buffer)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// oxipng settings for a given quality level. Higher quality spends more effort.
pub fn png_options(quality: u8) -> Options {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.deflate = if quality >= ZOPFLI_QUALITY_THRESHOLD {
        Deflaters::Zopfli {
            iterations: ZOPFLI_ITERATIONS,
        }
    } else if quality >= HIGH_COMPRESSION_QUALITY_THRESHOLD {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };
    options
}

/// Lossy WebP through libwebp. Expects a layout produced by `normalize`.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let encoder = match img {
        DynamicImage::ImageRgb8(rgb) => webp::Encoder::from_rgb(rgb.as_raw(), width, height),
        DynamicImage::ImageRgba8(rgba) => webp::Encoder::from_rgba(rgba.as_raw(), width, height),
        other => {
            return Err(OptimizeError::WebPEncoding(format!(
                "unsupported color type {:?}",
                other.color()
            )))
        }
    };
    let encoded = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| OptimizeError::WebPEncoding(format!("{:?}", e)))?;
    Ok(encoded.to_vec())
}

pub fn optimize_png(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    oxipng::optimize_from_memory(data, &png_options(quality))
        .map_err(|e| OptimizeError::PngOptimization(e.to_string()))
}
