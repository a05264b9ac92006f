//! Batch processing with per-file error isolation.

use std::path::{Path, PathBuf};

use crate::{config::Settings, error::SheetError, sheet};

/// What happened to one file in a batch.
#[derive(Debug)]
pub enum Outcome {
    /// A contact sheet was written to this path.
    Written(PathBuf),
    /// An output already existed and overriding is off.
    SkippedExisting(PathBuf),
    /// Processing failed; the batch may continue depending on settings.
    Failed { path: PathBuf, error: SheetError },
}

impl Outcome {
    /// Log level this outcome is reported at. Writes and skips only show
    /// under verbose logging; failures always do.
    pub fn log_level(&self) -> log::Level {
        match self {
            Outcome::Written(_) | Outcome::SkippedExisting(_) => log::Level::Info,
            Outcome::Failed { .. } => log::Level::Error,
        }
    }
}

/// Tallies for a completed batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Written(_) => self.written += 1,
            Outcome::SkippedExisting(_) => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }
}

/// Output path for a video's contact sheet.
///
/// The sheet lands next to the video unless `output_directory` is set. The
/// file name keeps the video's full name (extension included), then appends
/// the optional suffix and `.jpg`: `clip.mp4` becomes `clip.mp4.jpg`.
pub fn output_path(
    video: &Path,
    output_directory: Option<&Path>,
    suffix: Option<&str>,
) -> PathBuf {
    let directory = output_directory
        .map(Path::to_path_buf)
        .or_else(|| video.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let mut name = video
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(suffix) = suffix {
        name.push_str(suffix);
    }
    name.push_str(".jpg");

    directory.join(name)
}

/// Process a single video, honoring the skip-existing policy.
pub fn process_file(video: &Path, settings: &Settings) -> Outcome {
    let destination = output_path(
        video,
        settings.output_directory.as_deref(),
        settings.suffix.as_deref(),
    );

    if destination.exists() {
        if !settings.override_existing {
            return Outcome::SkippedExisting(destination);
        }
        if !destination.is_file() {
            // Never replace a directory or other non-file path.
            log::warn!(
                "{} exists and is not a regular file, skipping",
                destination.display()
            );
            return Outcome::SkippedExisting(destination);
        }
    }

    match sheet::write_contact_sheet(video, &destination, settings) {
        Ok(()) => Outcome::Written(destination),
        Err(error) => Outcome::Failed {
            path: video.to_path_buf(),
            error,
        },
    }
}

/// Run the batch over `files`.
///
/// Each outcome is passed to `observe` (for progress reporting) as it
/// happens. Failures are logged and counted; with `raise_errors` set, the
/// first failure aborts the batch instead.
///
/// # Errors
///
/// Propagates the first per-file error only when `settings.raise_errors` is
/// set.
pub fn run<F>(
    files: &[PathBuf],
    settings: &Settings,
    mut observe: F,
) -> Result<BatchSummary, SheetError>
where
    F: FnMut(&Outcome),
{
    let mut summary = BatchSummary::default();

    for video in files {
        let outcome = process_file(video, settings);
        summary.record(&outcome);

        let level = outcome.log_level();
        match &outcome {
            Outcome::Written(path) => {
                log::log!(level, "Wrote {}", path.display());
            }
            Outcome::SkippedExisting(path) => {
                log::log!(level, "{} already exists, skipping", path.display());
            }
            Outcome::Failed { path, error } => {
                log::log!(level, "Failed to process {}: {error}", path.display());
            }
        }

        observe(&outcome);

        if settings.raise_errors {
            if let Outcome::Failed { error, .. } = outcome {
                return Err(error);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn skips_and_writes_are_quiet_unless_verbose() {
        // The default log filter is `warn`; only failures may reach it.
        let written = Outcome::Written(PathBuf::from("a.jpg"));
        let skipped = Outcome::SkippedExisting(PathBuf::from("b.jpg"));
        let failed = Outcome::Failed {
            path: PathBuf::from("c.mp4"),
            error: SheetError::Config {
                reason: "x".to_string(),
            },
        };

        assert!(written.log_level() > log::Level::Warn);
        assert!(skipped.log_level() > log::Level::Warn);
        assert_eq!(failed.log_level(), log::Level::Error);
    }

    #[test]
    fn output_lands_next_to_the_video() {
        let path = output_path(Path::new("/media/show/clip.mp4"), None, None);
        assert_eq!(path, PathBuf::from("/media/show/clip.mp4.jpg"));
    }

    #[test]
    fn output_directory_redirects_the_sheet() {
        let path = output_path(
            Path::new("/media/show/clip.mp4"),
            Some(Path::new("/tmp/sheets")),
            None,
        );
        assert_eq!(path, PathBuf::from("/tmp/sheets/clip.mp4.jpg"));
    }

    #[test]
    fn suffix_sits_between_name_and_extension() {
        let path = output_path(Path::new("clip.mkv"), None, Some("_preview"));
        assert_eq!(path, PathBuf::from("clip.mkv_preview.jpg"));
    }

    #[test]
    fn existing_output_is_skipped_without_override() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        File::create(&video).unwrap();
        let existing = dir.path().join("clip.mp4.jpg");
        File::create(&existing).unwrap();

        let mut settings = Settings::default();
        settings.output_directory = Some(dir.path().to_path_buf());

        let outcome = process_file(&video, &settings);
        assert!(matches!(outcome, Outcome::SkippedExisting(path) if path == existing));
    }

    #[test]
    fn batch_counts_skips_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        File::create(&video).unwrap();
        File::create(dir.path().join("clip.mp4.jpg")).unwrap();

        let mut settings = Settings::default();
        settings.output_directory = Some(dir.path().to_path_buf());
        settings.raise_errors = true;

        let summary = run(std::slice::from_ref(&video), &settings, |_| {}).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                written: 0,
                skipped: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn unreadable_video_fails_softly_by_default() {
        let dir = tempfile::tempdir().unwrap();
        // Zero-byte file: probing fails, but the batch finishes.
        let video = dir.path().join("broken.mp4");
        File::create(&video).unwrap();

        let settings = Settings::default();

        let mut observed = 0;
        let summary = run(std::slice::from_ref(&video), &settings, |_| observed += 1).unwrap();
        assert_eq!(observed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.written, 0);
    }

    #[test]
    fn raise_errors_aborts_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("broken.mp4");
        File::create(&video).unwrap();

        let mut settings = Settings::default();
        settings.raise_errors = true;

        let result = run(std::slice::from_ref(&video), &settings, |_| {});
        assert!(result.is_err());
    }
}
