/// Utility functions for common operations
///
/// Extension filtering, size formatting, report lines and the atomic
/// file replacement used when writing optimized images back in place.
use crate::constants::{
    BYTES_PER_MEGABYTE, PROGRESS_BAR_TEMPLATE, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX,
};
use crate::error::Result;
use crate::formats::ImageKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Check if a file path represents a supported image file
///
/// # Arguments
/// * `path` - The file path to check
///
/// # Returns
/// * `true` if the extension is png, jpg, jpeg or webp (any case)
pub fn is_image_file(path: &Path) -> bool {
    ImageKind::from_path(path).is_some()
}

/// Signed byte count as megabytes with two decimals, e.g. `"1.50"` or `"-0.02"`.
pub fn format_megabytes(bytes: i64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MEGABYTE)
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Difference between the two sizes, positive when the file shrank.
pub fn size_delta(original_size: u64, new_size: u64) -> i64 {
    original_size as i64 - new_size as i64
}

pub fn resized_line(
    file_name: &str,
    from: (u32, u32),
    to: (u32, u32),
    saved_bytes: i64,
) -> String {
    format!(
        "[RESIZED] {}: {}x{} -> {}x{} | Saved {} MB",
        file_name,
        from.0,
        from.1,
        to.0,
        to.1,
        format_megabytes(saved_bytes)
    )
}

pub fn optimized_line(file_name: &str, saved_bytes: i64) -> String {
    format!(
        "[OPTIMIZED] {}: Saved {} MB",
        file_name,
        format_megabytes(saved_bytes)
    )
}

pub fn error_line(path: &Path, message: &str) -> String {
    format!("[ERROR] Could not process {}: {}", path.display(), message)
}

/// The two closing lines of a run.
pub fn summary_lines(processed_count: usize, bytes_saved: i64) -> [String; 2] {
    [
        format!("Finished! Processed {} images.", processed_count),
        format!("Total space saved: {} MB", format_megabytes(bytes_saved)),
    ]
}

/// Replaces the contents of `path` with `bytes` without ever exposing a
/// partially written file.
///
/// Symlinks are resolved first, so the link target is rewritten and the link
/// itself stays in place. The data goes to a temp file next to the target,
/// which is then renamed over it. The target's permissions are carried over.
/// If anything fails before the rename the temp file is removed on drop.
pub fn replace_file_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(&target)?.permissions();

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(TEMP_FILE_SUFFIX)
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.as_file().set_permissions(permissions)?;
    temp.persist(&target)?;
    Ok(())
}

/// Create a progress bar with consistent styling
///
/// Hidden in quiet mode. indicatif also skips drawing when stderr is not a
/// terminal, so piped runs only see the report lines.
pub fn create_progress_bar(len: u64) -> ProgressBar {
    if crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}
