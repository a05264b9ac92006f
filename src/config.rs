//! Configuration: defaults, the optional TOML config file, and CLI overrides.
//!
//! Three layers merge into one resolved [`Settings`] value, lowest priority
//! first: built-in defaults, then `~/.videosheet.toml`, then command-line
//! flags. Every layer only overrides the fields it actually sets.

use std::{fs, path::PathBuf};

use image::Rgb;
use serde::Deserialize;

use crate::{
    color::parse_color,
    error::SheetError,
    text::{DEFAULT_HEADER_FONT_SIZE, DEFAULT_TIMESTAMP_FONT_SIZE, FontChoice},
};

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// File or directory to process.
    pub path: PathBuf,
    /// Descend into subdirectories when `path` is a directory.
    pub recursive: bool,
    /// Total sheet width in pixels.
    pub width: u32,
    /// Grid columns for horizontal video.
    pub columns: u32,
    /// Grid rows for horizontal video.
    pub rows: u32,
    /// Grid columns for vertical video; falls back to `columns`.
    pub vertical_columns: Option<u32>,
    /// Grid rows for vertical video; falls back to `rows`.
    pub vertical_rows: Option<u32>,
    /// Gutter between cells and around the grid, in pixels.
    pub spacing: u32,
    /// Canvas background color.
    pub background_color: Rgb<u8>,
    /// Render the metadata header.
    pub header_enabled: bool,
    /// Font file for the header; `None` probes the system.
    pub header_font: Option<PathBuf>,
    /// Header font size; applies to user-supplied fonts only.
    pub header_font_size: f32,
    pub header_font_color: Rgb<u8>,
    /// Font file for timestamps; `None` probes the system.
    pub timestamp_font: Option<PathBuf>,
    /// Timestamp font size; applies to user-supplied fonts only.
    pub timestamp_font_size: f32,
    pub timestamp_font_color: Rgb<u8>,
    /// Timestamp drop shadow color; `None` disables the shadow.
    pub timestamp_shadow_color: Option<Rgb<u8>>,
    /// Label prefixed to the comment line.
    pub comment_label: String,
    /// Optional free-form comment appended to the header.
    pub comment_text: Option<String>,
    /// Seconds of lead-in excluded from sampling.
    pub skip_seconds: f64,
    /// Extra suffix inserted before the `.jpg` extension.
    pub suffix: Option<String>,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
    /// Overwrite existing sheets instead of skipping them.
    pub override_existing: bool,
    /// Directory for output files; `None` writes next to each video.
    pub output_directory: Option<PathBuf>,
    /// Abort the batch on the first failure.
    pub raise_errors: bool,
    /// Verbose logging.
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            recursive: false,
            width: 800,
            columns: 4,
            rows: 3,
            vertical_columns: None,
            vertical_rows: None,
            spacing: 2,
            background_color: Rgb([255, 255, 255]),
            header_enabled: true,
            header_font: None,
            header_font_size: DEFAULT_HEADER_FONT_SIZE,
            header_font_color: Rgb([0, 0, 0]),
            timestamp_font: None,
            timestamp_font_size: DEFAULT_TIMESTAMP_FONT_SIZE,
            timestamp_font_color: Rgb([255, 255, 255]),
            timestamp_shadow_color: Some(Rgb([0, 0, 0])),
            comment_label: "Comment:".to_string(),
            comment_text: None,
            skip_seconds: 10.0,
            suffix: None,
            jpeg_quality: 95,
            override_existing: false,
            output_directory: None,
            raise_errors: false,
            verbose: false,
        }
    }
}

impl Settings {
    /// The header font as a [`FontChoice`].
    pub fn header_font_choice(&self) -> FontChoice {
        match &self.header_font {
            Some(path) => FontChoice::User {
                path: path.clone(),
                size: self.header_font_size,
            },
            None => FontChoice::Builtin,
        }
    }

    /// The timestamp font as a [`FontChoice`].
    pub fn timestamp_font_choice(&self) -> FontChoice {
        match &self.timestamp_font {
            Some(path) => FontChoice::User {
                path: path.clone(),
                size: self.timestamp_font_size,
            },
            None => FontChoice::Builtin,
        }
    }
}

/// Command-line overrides; `None`/`false` leaves the lower layer untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub path: Option<PathBuf>,
    pub recursive: bool,
    pub width: Option<u32>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub vertical_columns: Option<u32>,
    pub vertical_rows: Option<u32>,
    pub spacing: Option<u32>,
    pub background_color: Option<String>,
    pub no_header: bool,
    pub header_font: Option<PathBuf>,
    pub header_font_size: Option<f32>,
    pub header_font_color: Option<String>,
    pub timestamp_font: Option<PathBuf>,
    pub timestamp_font_size: Option<f32>,
    pub timestamp_font_color: Option<String>,
    pub timestamp_shadow_color: Option<String>,
    pub comment_label: Option<String>,
    pub comment_text: Option<String>,
    pub skip_seconds: Option<f64>,
    pub suffix: Option<String>,
    pub jpeg_quality: Option<u8>,
    pub override_existing: bool,
    pub output_directory: Option<PathBuf>,
    pub raise_errors: bool,
    pub verbose: bool,
}

/// On-disk config file shape, mirroring the resolved settings by section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "Layout", default)]
    pub layout: LayoutSection,
    #[serde(rename = "Header", default)]
    pub header: HeaderSection,
    #[serde(rename = "Video", default)]
    pub video: VideoSection,
    #[serde(rename = "File", default)]
    pub file: FileSection,
    #[serde(rename = "Program", default)]
    pub program: ProgramSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSection {
    pub width: Option<u32>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub vertical_video_columns: Option<u32>,
    pub vertical_video_rows: Option<u32>,
    pub spacing: Option<u32>,
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderSection {
    pub enabled: Option<bool>,
    pub font: Option<PathBuf>,
    pub font_size: Option<f32>,
    pub font_color: Option<String>,
    pub timestamp_font: Option<PathBuf>,
    pub timestamp_font_size: Option<f32>,
    pub timestamp_font_color: Option<String>,
    pub timestamp_shadow_color: Option<String>,
    pub comment_label: Option<String>,
    pub comment_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoSection {
    pub skip_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    pub recursive: Option<bool>,
    pub suffix: Option<String>,
    pub jpeg_quality: Option<u8>,
    pub override_existing: Option<bool>,
    pub output_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramSection {
    pub raise_errors: Option<bool>,
    pub verbose: Option<bool>,
}

impl ConfigFile {
    /// Load the config file at `path`, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Config`] when the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &std::path::Path) -> Result<Option<Self>, SheetError> {
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(|error| SheetError::Config {
            reason: format!("cannot read config file {}: {error}", path.display()),
        })?;
        let parsed = toml::from_str(&contents).map_err(|error| SheetError::Config {
            reason: format!("cannot parse config file {}: {error}", path.display()),
        })?;
        Ok(Some(parsed))
    }
}

/// Default location of the config file: `~/.videosheet.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".videosheet.toml"))
}

/// Merge defaults, an optional config file, and CLI overrides into resolved
/// [`Settings`].
///
/// # Errors
///
/// Returns [`SheetError::Config`] for unparseable colors or out-of-range
/// numeric values.
pub fn resolve(overrides: &Overrides, file: Option<&ConfigFile>) -> Result<Settings, SheetError> {
    let mut settings = Settings::default();

    if let Some(file) = file {
        apply_file(&mut settings, file)?;
    }
    apply_overrides(&mut settings, overrides)?;
    validate(&settings)?;

    Ok(settings)
}

fn apply_file(settings: &mut Settings, file: &ConfigFile) -> Result<(), SheetError> {
    let layout = &file.layout;
    merge(&mut settings.width, &layout.width);
    merge(&mut settings.columns, &layout.columns);
    merge(&mut settings.rows, &layout.rows);
    merge_option(&mut settings.vertical_columns, &layout.vertical_video_columns);
    merge_option(&mut settings.vertical_rows, &layout.vertical_video_rows);
    merge(&mut settings.spacing, &layout.spacing);
    if let Some(color) = &layout.background_color {
        settings.background_color = parse_color(color)?;
    }

    let header = &file.header;
    merge(&mut settings.header_enabled, &header.enabled);
    merge_option(&mut settings.header_font, &header.font);
    merge(&mut settings.header_font_size, &header.font_size);
    if let Some(color) = &header.font_color {
        settings.header_font_color = parse_color(color)?;
    }
    merge_option(&mut settings.timestamp_font, &header.timestamp_font);
    merge(&mut settings.timestamp_font_size, &header.timestamp_font_size);
    if let Some(color) = &header.timestamp_font_color {
        settings.timestamp_font_color = parse_color(color)?;
    }
    if let Some(color) = &header.timestamp_shadow_color {
        settings.timestamp_shadow_color = parse_shadow_color(color)?;
    }
    merge(&mut settings.comment_label, &header.comment_label);
    merge_option(&mut settings.comment_text, &header.comment_text);

    merge(&mut settings.skip_seconds, &file.video.skip_seconds);

    let file_section = &file.file;
    merge(&mut settings.recursive, &file_section.recursive);
    merge_option(&mut settings.suffix, &file_section.suffix);
    merge(&mut settings.jpeg_quality, &file_section.jpeg_quality);
    merge(&mut settings.override_existing, &file_section.override_existing);
    merge_option(&mut settings.output_directory, &file_section.output_directory);

    merge(&mut settings.raise_errors, &file.program.raise_errors);
    merge(&mut settings.verbose, &file.program.verbose);

    Ok(())
}

fn apply_overrides(settings: &mut Settings, overrides: &Overrides) -> Result<(), SheetError> {
    merge(&mut settings.path, &overrides.path);
    merge(&mut settings.width, &overrides.width);
    merge(&mut settings.columns, &overrides.columns);
    merge(&mut settings.rows, &overrides.rows);
    merge_option(&mut settings.vertical_columns, &overrides.vertical_columns);
    merge_option(&mut settings.vertical_rows, &overrides.vertical_rows);
    merge(&mut settings.spacing, &overrides.spacing);
    if let Some(color) = &overrides.background_color {
        settings.background_color = parse_color(color)?;
    }
    if overrides.no_header {
        settings.header_enabled = false;
    }
    merge_option(&mut settings.header_font, &overrides.header_font);
    merge(&mut settings.header_font_size, &overrides.header_font_size);
    if let Some(color) = &overrides.header_font_color {
        settings.header_font_color = parse_color(color)?;
    }
    merge_option(&mut settings.timestamp_font, &overrides.timestamp_font);
    merge(
        &mut settings.timestamp_font_size,
        &overrides.timestamp_font_size,
    );
    if let Some(color) = &overrides.timestamp_font_color {
        settings.timestamp_font_color = parse_color(color)?;
    }
    if let Some(color) = &overrides.timestamp_shadow_color {
        settings.timestamp_shadow_color = parse_shadow_color(color)?;
    }
    merge(&mut settings.comment_label, &overrides.comment_label);
    merge_option(&mut settings.comment_text, &overrides.comment_text);
    merge(&mut settings.skip_seconds, &overrides.skip_seconds);
    merge_option(&mut settings.suffix, &overrides.suffix);
    merge(&mut settings.jpeg_quality, &overrides.jpeg_quality);
    merge_option(&mut settings.output_directory, &overrides.output_directory);

    // Boolean flags only ever switch a behavior on.
    if overrides.recursive {
        settings.recursive = true;
    }
    if overrides.override_existing {
        settings.override_existing = true;
    }
    if overrides.raise_errors {
        settings.raise_errors = true;
    }
    if overrides.verbose {
        settings.verbose = true;
    }

    Ok(())
}

fn validate(settings: &Settings) -> Result<(), SheetError> {
    if settings.width == 0 {
        return Err(SheetError::Config {
            reason: "width must be positive".to_string(),
        });
    }
    if settings.columns == 0 || settings.rows == 0 {
        return Err(SheetError::Config {
            reason: "columns and rows must be at least 1".to_string(),
        });
    }
    if settings.vertical_columns == Some(0) || settings.vertical_rows == Some(0) {
        return Err(SheetError::Config {
            reason: "vertical video columns and rows must be at least 1".to_string(),
        });
    }
    if !(1..=100).contains(&settings.jpeg_quality) {
        return Err(SheetError::Config {
            reason: format!(
                "jpeg quality must be between 1 and 100, got {}",
                settings.jpeg_quality
            ),
        });
    }
    if settings.skip_seconds < 0.0 || !settings.skip_seconds.is_finite() {
        return Err(SheetError::Config {
            reason: format!(
                "skip seconds must be non-negative, got {}",
                settings.skip_seconds
            ),
        });
    }
    Ok(())
}

/// Parse a shadow color, where the literal `"none"` disables the shadow.
fn parse_shadow_color(value: &str) -> Result<Option<Rgb<u8>>, SheetError> {
    if value.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_color(value).map(Some)
    }
}

fn merge<T: Clone>(target: &mut T, source: &Option<T>) {
    if let Some(value) = source {
        *target = value.clone();
    }
}

fn merge_option<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        *target = source.clone();
    }
}
