pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod utils;

pub use batch::{collect_image_files, optimize_directory, RunSummary};
pub use error::{OptimizeError, Result};
pub use formats::ImageKind;
pub use processing::{
    load_image_with_metadata, optimize_file, resize_image, scaled_dimensions, FileOutcome,
    OptimizeOptions,
};
pub use utils::is_image_file;
