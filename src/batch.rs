use crate::error::{OptimizeError, Result};
use crate::processing::{optimize_file, FileOutcome, OptimizeOptions};
use crate::utils::{
    create_progress_bar, error_line, format_file_size, is_image_file, optimized_line,
    resized_line, size_delta, summary_lines,
};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Counters for one run over a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files rewritten and counted (resized, or re-encoded smaller).
    pub processed_count: usize,
    /// Sum of `original - new` over counted files. Negative if resizes grew files.
    pub bytes_saved: i64,
    pub failed_count: usize,
    /// Files left as they were: within limits, or re-encodes that did not shrink.
    pub skipped_count: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome.bytes_saved() {
            Some(saved) => {
                self.processed_count += 1;
                self.bytes_saved += saved;
            }
            None => self.skipped_count += 1,
        }
    }

    pub fn record_failure(&mut self) {
        self.failed_count += 1;
    }
}

/// Walks `root` and optimizes every supported image in place.
///
/// Per-file failures are reported and counted; only a root that cannot be
/// traversed at all is returned as an error.
pub fn optimize_directory(root: &Path, options: &OptimizeOptions) -> Result<RunSummary> {
    crate::info!("Starting optimization in: {}", root.display());
    let start_time = Instant::now();

    let image_files = collect_image_files(root)?;
    crate::verbose!("Found {} image files", image_files.len());

    let progress = create_progress_bar(image_files.len() as u64);
    let mut summary = RunSummary::default();

    for path in &image_files {
        progress.set_message(display_name(path));
        match optimize_file(path, options) {
            Ok(outcome) => {
                report_outcome(&progress, path, &outcome);
                summary.record(&outcome);
            }
            Err(e) => {
                progress.suspend(|| {
                    crate::error!("{}", error_line(path, &e.to_string()));
                });
                summary.record_failure();
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let [finished, saved] = summary_lines(summary.processed_count, summary.bytes_saved);
    println!();
    println!("{}", finished);
    println!("{}", saved);

    if options.dry_run {
        crate::info!("Dry run: no files were modified.");
    }
    if summary.failed_count > 0 {
        crate::warn!("Failed files: {}", summary.failed_count);
    }
    crate::verbose!(
        "{} files left unchanged, finished in {:.2?}",
        summary.skipped_count,
        start_time.elapsed()
    );

    Ok(summary)
}

fn report_outcome(progress: &ProgressBar, path: &Path, outcome: &FileOutcome) {
    let name = display_name(path);
    match *outcome {
        FileOutcome::Resized {
            from,
            to,
            original_size,
            new_size,
        } => progress.suspend(|| {
            crate::info!("{}", resized_line(&name, from, to, size_delta(original_size, new_size)))
        }),
        FileOutcome::Optimized {
            original_size,
            new_size,
        } => progress.suspend(|| {
            crate::info!("{}", optimized_line(&name, size_delta(original_size, new_size)))
        }),
        FileOutcome::NotSmaller { .. } => {}
        FileOutcome::Untouched { original_size } => progress.suspend(|| {
            crate::verbose!("{} is within limits ({})", name, format_file_size(original_size))
        }),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Recursively lists the supported image files under `root`, sorted by name
/// within each directory.
///
/// A missing or unreadable root is an error. Unreadable entries below the
/// root are reported and skipped. Symlinks to files are kept; symlinked
/// directories are not descended into.
pub fn collect_image_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(OptimizeError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut image_files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                crate::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && is_image_file(entry.path()) {
            image_files.push(entry.into_path());
        }
    }

    Ok(image_files)
}
