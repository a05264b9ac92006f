//! # videosheet
//!
//! Generate contact sheets — preview grids of evenly sampled, timestamped
//! frame thumbnails with a metadata header — from video files, powered by
//! FFmpeg via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)
//! crate.
//!
//! ## Quick Start
//!
//! ### Render One Sheet
//!
//! ```no_run
//! use std::path::Path;
//! use videosheet::{Settings, sheet};
//!
//! let settings = Settings::default();
//! sheet::write_contact_sheet(
//!     Path::new("input.mp4"),
//!     Path::new("input.mp4.jpg"),
//!     &settings,
//! ).unwrap();
//! ```
//!
//! ### Process a Directory
//!
//! ```no_run
//! use std::path::Path;
//! use videosheet::{Settings, batch, discover};
//!
//! let settings = Settings::default();
//! let files = discover::discover(Path::new("/media/videos"), true).unwrap();
//! let summary = batch::run(&files, &settings, |_| {}).unwrap();
//! println!("{} sheet(s) written", summary.written);
//! ```
//!
//! ## Features
//!
//! - **Even sampling** — one frame per grid cell, centered in equal slices
//!   of the video past a configurable lead-in skip
//! - **Metadata header** — file name, duration, dimensions, codec, bit rate,
//!   frame rate, size, audio facts, and an optional comment line
//! - **Rotation aware** — display rotation corrects dimensions and frames,
//!   and vertical videos can use their own grid shape
//! - **Timestamp overlays** — `mm:ss` labels with an optional drop shadow
//!   in each cell's bottom-right corner
//! - **Batch processing** — recursive discovery, skip-existing policy, and
//!   per-file error isolation
//! - **Layered configuration** — defaults, `~/.videosheet.toml`, then
//!   command-line flags
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod batch;
pub mod color;
pub mod config;
pub mod discover;
pub mod error;
pub mod layout;
pub mod sampler;
pub mod sheet;
pub mod source;
pub mod text;

pub use batch::{BatchSummary, Outcome};
pub use config::{ConfigFile, Overrides, Settings};
pub use error::SheetError;
pub use layout::{GridShape, Orientation, SheetLayout};
pub use sampler::sample_timestamps;
pub use source::{AudioInfo, VideoFile, VideoMetadata};
pub use text::FontChoice;
