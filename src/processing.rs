use crate::constants::{
    DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY, DEFAULT_SIZE_THRESHOLD, MAX_QUALITY, MIN_QUALITY,
};
use crate::error::{OptimizeError, Result};
use crate::formats::ImageKind;
use crate::utils::{format_file_size, replace_file_atomically, size_delta};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Longest side allowed before an image gets downsampled.
    pub max_dimension: u32,
    /// Files above this many bytes are re-encoded even when not oversized.
    pub size_threshold: u64,
    pub quality: u8,
    /// Write re-encodes that did not come out smaller.
    pub keep_larger: bool,
    pub dry_run: bool,
}

impl OptimizeOptions {
    pub fn new(
        max_dimension: Option<u32>,
        size_threshold: Option<u64>,
        quality: Option<u8>,
    ) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(OptimizeError::InvalidQuality(quality));
        }

        let max_dimension = max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION);
        if max_dimension == 0 {
            return Err(OptimizeError::InvalidMaxDimension(max_dimension));
        }

        Ok(Self {
            max_dimension,
            size_threshold: size_threshold.unwrap_or(DEFAULT_SIZE_THRESHOLD),
            quality,
            keep_larger: false,
            dry_run: false,
        })
    }

    pub fn keep_larger(mut self, keep_larger: bool) -> Self {
        self.keep_larger = keep_larger;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            quality: DEFAULT_QUALITY,
            keep_larger: false,
            dry_run: false,
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Downsampled and written back. `new_size` may exceed `original_size`.
    Resized {
        from: (u32, u32),
        to: (u32, u32),
        original_size: u64,
        new_size: u64,
    },
    /// Re-encoded at the same dimensions and came out smaller.
    Optimized { original_size: u64, new_size: u64 },
    /// Re-encoded but not smaller; `written` tells whether it replaced the file anyway.
    NotSmaller {
        original_size: u64,
        encoded_size: u64,
        written: bool,
    },
    /// Within bounds and below the size threshold.
    Untouched { original_size: u64 },
}

impl FileOutcome {
    /// Bytes this outcome contributes to the run total, `None` if it is not counted.
    pub fn bytes_saved(&self) -> Option<i64> {
        match *self {
            FileOutcome::Resized {
                original_size,
                new_size,
                ..
            }
            | FileOutcome::Optimized {
                original_size,
                new_size,
            } => Some(size_delta(original_size, new_size)),
            FileOutcome::NotSmaller { .. } | FileOutcome::Untouched { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeAction {
    Resize { width: u32, height: u32 },
    Reencode,
    Leave,
}

fn plan_action(
    (width, height): (u32, u32),
    original_size: u64,
    options: &OptimizeOptions,
) -> SizeAction {
    if let Some((width, height)) = scaled_dimensions(width, height, options.max_dimension) {
        SizeAction::Resize { width, height }
    } else if original_size > options.size_threshold {
        SizeAction::Reencode
    } else {
        SizeAction::Leave
    }
}

/// Dimensions that fit inside a `max_dimension` square with the aspect ratio kept.
///
/// Returns `None` when neither side exceeds the limit. The scaled side is
/// truncated, never rounded up, and is at least one pixel.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    let longest = u64::from(width.max(height));
    let scale = |side: u32| -> u32 {
        let scaled = u64::from(side) * u64::from(max_dimension) / longest;
        scaled.max(1) as u32
    };
    Some((scale(width), scale(height)))
}

/// Loads an image file and returns it along with its size on disk.
///
/// The container is sniffed from the content, so a PNG saved under a `.jpg`
/// name still decodes.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    let file_size = fs::metadata(input_path)?.len();
    let reader = ImageReader::open(input_path)?.with_guessed_format()?;
    let decoded_format = reader.format();
    let img = reader.decode()?;

    if let (Some(found), Some(expected)) = (decoded_format, ImageKind::from_path(input_path)) {
        if found != expected.to_image_format() {
            crate::verbose!(
                "{} holds {:?} data, it will be written as {}",
                input_path.display(),
                found,
                expected
            );
        }
    }

    Ok((img, file_size))
}

pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Runs one file through the size policy and writes the result back in place.
///
/// Encoding happens in memory first, so a failed encode never touches the
/// file. The error is returned to the caller, which decides how to report it.
pub fn optimize_file(path: &Path, options: &OptimizeOptions) -> Result<FileOutcome> {
    let kind = ImageKind::require_from_path(path)?;
    let (img, original_size) = load_image_with_metadata(path)?;
    let img = kind.normalize(img);
    let dimensions = img.dimensions();

    match plan_action(dimensions, original_size, options) {
        SizeAction::Resize { width, height } => {
            let resized = resize_image(&img, width, height);
            let encoded = kind.encode(&resized, options.quality)?;
            let new_size = commit(path, &encoded, options)?;
            Ok(FileOutcome::Resized {
                from: dimensions,
                to: (width, height),
                original_size,
                new_size,
            })
        }
        SizeAction::Reencode => {
            let encoded = kind.encode(&img, options.quality)?;
            let encoded_size = encoded.len() as u64;
            if encoded_size < original_size {
                let new_size = commit(path, &encoded, options)?;
                if new_size < original_size {
                    return Ok(FileOutcome::Optimized {
                        original_size,
                        new_size,
                    });
                }
                return Ok(FileOutcome::NotSmaller {
                    original_size,
                    encoded_size: new_size,
                    written: !options.dry_run,
                });
            }

            let written = options.keep_larger && !options.dry_run;
            if written {
                commit(path, &encoded, options)?;
            }
            crate::verbose!(
                "{} re-encoded to {} (was {}), {}",
                path.display(),
                format_file_size(encoded_size),
                format_file_size(original_size),
                if written { "written anyway" } else { "kept original" }
            );
            Ok(FileOutcome::NotSmaller {
                original_size,
                encoded_size,
                written,
            })
        }
        SizeAction::Leave => Ok(FileOutcome::Untouched { original_size }),
    }
}

/// Writes `encoded` over `path` and returns the size now on disk.
/// In dry-run mode nothing is written and the encoded size is returned.
fn commit(path: &Path, encoded: &[u8], options: &OptimizeOptions) -> Result<u64> {
    if options.dry_run {
        return Ok(encoded.len() as u64);
    }
    replace_file_atomically(path, encoded)?;
    Ok(fs::metadata(path)?.len())
}
