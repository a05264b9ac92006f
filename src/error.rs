//! Error types for the `videosheet` crate.
//!
//! This module defines [`SheetError`], the unified error type returned by all
//! fallible operations in the crate. Variants carry enough context (file
//! paths, timestamps, layout inputs) to diagnose a failure without extra
//! logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `videosheet` operations.
///
/// Every public method that can fail returns `Result<T, SheetError>`. The
/// batch driver catches all variants at the per-file boundary; whether a
/// failure aborts the batch depends solely on the `raise_errors` setting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// The media file could not be opened or its metadata is unreadable.
    #[error("Failed to probe media file at {path}: {reason}")]
    Probe {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The video is not longer than the configured skip, so no samples fit.
    #[error("Video duration ({duration:.2} s) does not exceed the skip ({skip:.2} s)")]
    TooShort {
        /// Total duration of the video in seconds.
        duration: f64,
        /// Configured number of seconds to skip at the start.
        skip: f64,
    },

    /// The sampled range holds fewer frames than the grid has cells.
    #[error("Video has only ~{available} frame(s) after the skip, cannot capture {requested} distinct thumbnails")]
    TooFewFrames {
        /// Number of thumbnails the grid calls for.
        requested: u32,
        /// Approximate number of frames available in the sampled range.
        available: u64,
    },

    /// A frame at a specific timestamp could not be decoded.
    #[error("Failed to decode frame at {timestamp:.3} s: {reason}")]
    Decode {
        /// The timestamp that was requested, in seconds.
        timestamp: f64,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// The requested geometry leaves no room for thumbnails.
    #[error("Degenerate layout: width {target_width} px cannot fit {columns} column(s) with {spacing} px spacing")]
    Layout {
        /// The configured sheet width in pixels.
        target_width: u32,
        /// The effective number of grid columns.
        columns: u32,
        /// The configured spacing in pixels.
        spacing: u32,
    },

    /// A header or timestamp font could not be loaded.
    #[error("Failed to load font: {reason}")]
    Font {
        /// Underlying reason the font failed to load.
        reason: String,
    },

    /// The merged configuration is invalid.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// Description of the invalid value.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate during scaling or encoding.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}
