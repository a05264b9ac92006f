//! Discovery of video files to process.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SheetError;

/// File extensions treated as video, lower case without the dot.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "divx", "flv", "m4v", "mkv", "mov", "mp4", "mpg", "wmv",
];

/// Whether `path` carries a recognized video extension (case-insensitive).
pub fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            let lowered = extension.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&lowered.as_str())
        })
        .unwrap_or(false)
}

/// Collect the video files under `path` in deterministic name order.
///
/// A single file is returned as-is when it has a video extension, otherwise
/// the result is empty. A directory is scanned one level deep, or fully when
/// `recursive` is set; symlinks are not followed.
///
/// # Errors
///
/// Returns [`SheetError::Config`] when `path` is neither a file nor a
/// directory, and [`SheetError::Io`] when the directory walk fails.
pub fn discover(path: &Path, recursive: bool) -> Result<Vec<PathBuf>, SheetError> {
    if path.is_file() {
        if has_video_extension(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        log::warn!(
            "{} does not have a recognized video extension, skipping",
            path.display()
        );
        return Ok(Vec::new());
    }

    if !path.is_dir() {
        return Err(SheetError::Config {
            reason: format!("{} is neither a file nor a directory", path.display()),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|error| {
            std::io::Error::other(format!("directory walk failed: {error}"))
        })?;
        if entry.file_type().is_file() && has_video_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    log::debug!("Discovered {} video file(s) under {}", files.len(), path.display());

    Ok(files)
}
