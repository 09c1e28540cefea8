use std::num::NonZeroU8;

pub const DEFAULT_MAX_DIMENSION: u32 = 1600;
pub const DEFAULT_SIZE_THRESHOLD: u64 = 1024 * 1024;
pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

// PNG quality thresholds for picking the oxipng deflater
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const HIGH_COMPRESSION_QUALITY_THRESHOLD: u8 = 70;

pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: NonZeroU8 = match NonZeroU8::new(15) {
    Some(n) => n,
    None => panic!("zopfli iterations must be non-zero"),
};
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

pub const TEMP_FILE_PREFIX: &str = ".img-shrink-";
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";
