use crate::constants::{DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY, DEFAULT_SIZE_THRESHOLD};
use crate::error::Result;
use crate::processing::OptimizeOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-shrink",
    about = "Shrink oversized images in a directory tree, in place",
    long_about = "img-shrink walks a directory and rewrites PNG, JPEG and WebP files in place. \
                  Images wider or taller than the maximum dimension are downsampled with a \
                  Lanczos filter, and images that already fit but are heavier than the size \
                  threshold are re-encoded. A summary of the space saved is printed at the end.",
    version,
    after_help = "EXAMPLES:\n  \
    img-shrink ./public/images\n  \
    img-shrink ./assets -m 1920 -q 80\n  \
    img-shrink ./assets --dry-run -v"
)]
pub struct Args {
    #[arg(help = "Directory to optimize recursively")]
    pub root: PathBuf,

    #[arg(
        short = 'm',
        long,
        default_value_t = DEFAULT_MAX_DIMENSION,
        help = "Maximum width or height in pixels",
        long_help = "Images with either side above this value are downsampled so both sides \
                     fit, preserving the aspect ratio."
    )]
    pub max_dimension: u32,

    #[arg(
        short = 's',
        long,
        default_value_t = DEFAULT_SIZE_THRESHOLD,
        help = "Re-encode files larger than this many bytes",
        long_help = "Images within the maximum dimension are re-encoded when their file is \
                     larger than this many bytes. The result is kept only if it is smaller."
    )]
    pub size_threshold: u64,

    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY,
        help = "Compression quality (1-100)",
        long_help = "JPEG and WebP quality from 1 (lowest) to 100 (highest). For PNG it \
                     selects the oxipng effort: >=90 uses Zopfli, >=70 high compression."
    )]
    pub quality: u8,

    #[arg(
        long,
        help = "Write re-encodes even when they are not smaller",
        long_help = "By default a re-encode that does not shrink the file is discarded and \
                     the original is kept. With this flag the re-encoded file is written anyway \
                     (it is still not counted in the savings)."
    )]
    pub keep_larger: bool,

    #[arg(
        short = 'n',
        long,
        help = "Report what would change without writing any file"
    )]
    pub dry_run: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only print errors and the summary")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Also report files that are left unchanged")]
    pub verbose: bool,
}

impl Args {
    pub fn options(&self) -> Result<OptimizeOptions> {
        Ok(OptimizeOptions::new(
            Some(self.max_dimension),
            Some(self.size_threshold),
            Some(self.quality),
        )?
        .keep_larger(self.keep_larger)
        .dry_run(self.dry_run))
    }
}
