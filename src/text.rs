//! Font loading, text measurement and label formatting.

use std::{fs, path::PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{config::Settings, error::SheetError, source::VideoMetadata};

/// Default header font size in pixels.
pub const DEFAULT_HEADER_FONT_SIZE: f32 = 14.0;
/// Default timestamp font size in pixels.
pub const DEFAULT_TIMESTAMP_FONT_SIZE: f32 = 12.0;
/// Vertical gap between header lines in pixels.
pub const LINE_SPACING: u32 = 2;
/// Distance of timestamp labels from the cell's bottom-right corner.
pub const TIMESTAMP_INSET: u32 = 2;
/// Offset of the timestamp drop shadow in pixels.
pub const SHADOW_OFFSET: i32 = 1;

/// Well-known locations of a usable sans-serif font, tried in order when no
/// font file is configured.
const BUILTIN_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Where a rendered font comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FontChoice {
    /// Probe the system for a well-known sans-serif font.
    Builtin,
    /// Load a TrueType/OpenType font from a user-supplied path.
    User { path: PathBuf, size: f32 },
}

/// A loaded font together with its pixel scale.
pub struct SheetFont {
    font: FontVec,
    scale: PxScale,
}

impl SheetFont {
    /// Load the font named by `choice`.
    ///
    /// `builtin_size` is the fixed pixel size the builtin font renders at;
    /// configured sizes only apply to user-supplied font files.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Font`] if no usable font file can be found or
    /// the file does not parse as a font.
    pub fn resolve(choice: &FontChoice, builtin_size: f32) -> Result<Self, SheetError> {
        match choice {
            FontChoice::Builtin => {
                for candidate in BUILTIN_FONT_PATHS {
                    if let Ok(bytes) = fs::read(candidate) {
                        if let Ok(font) = FontVec::try_from_vec(bytes) {
                            log::debug!("Using system font {candidate}");
                            return Ok(Self {
                                font,
                                scale: PxScale::from(builtin_size),
                            });
                        }
                    }
                }
                Err(SheetError::Font {
                    reason: "no usable system font found; pass a font file path".to_string(),
                })
            }
            FontChoice::User { path, size } => {
                let bytes = fs::read(path).map_err(|error| SheetError::Font {
                    reason: format!("cannot read font file {}: {error}", path.display()),
                })?;
                let font = FontVec::try_from_vec(bytes).map_err(|error| SheetError::Font {
                    reason: format!("cannot parse font file {}: {error}", path.display()),
                })?;
                Ok(Self {
                    font,
                    scale: PxScale::from(*size),
                })
            }
        }
    }

    /// Pixel size this font renders at.
    pub fn size(&self) -> f32 {
        self.scale.y
    }

    /// Rendered height of `text` in pixels.
    pub fn line_height(&self, text: &str) -> u32 {
        text_size(self.scale, &self.font, text).1
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        text_size(self.scale, &self.font, text).0
    }

    /// Draw `text` onto `canvas` with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}

/// Format seconds as `mm:ss`, or `h:mm:ss` from one hour upwards.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Format a byte count with a binary-prefixed unit, two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for candidate in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = candidate;
    }
    format!("{value:.2} {unit}")
}

/// Compose the header lines for a contact sheet.
///
/// Facts that were not probed (zero bit rate or frame rate, missing audio)
/// simply drop their line rather than printing a placeholder.
pub fn header_lines(metadata: &VideoMetadata, settings: &Settings) -> Vec<String> {
    let mut lines = Vec::new();

    let file_name = metadata
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| metadata.path.display().to_string());
    lines.push(format!("File: {file_name}"));

    lines.push(format!(
        "Duration: {}",
        format_time(metadata.duration_seconds)
    ));

    let (width, height) = metadata.corrected_dimensions();
    lines.push(format!("Dimensions: {width}x{height} px"));

    lines.push(format!("Codec: {}", metadata.codec));

    if metadata.bit_rate_kbps > 0 {
        lines.push(format!("Bit rate: {} kb/s", metadata.bit_rate_kbps));
    }

    if metadata.frame_rate > 0.0 {
        lines.push(format!("Frame rate: {:.2} fps", metadata.frame_rate));
    }

    if metadata.file_size_bytes >= 1024 {
        lines.push(format!(
            "Size: {} B ({})",
            metadata.file_size_bytes,
            format_size(metadata.file_size_bytes)
        ));
    } else {
        lines.push(format!("Size: {} B", metadata.file_size_bytes));
    }

    if let Some(audio) = &metadata.audio {
        let channels = match audio.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{n} channels"),
        };
        lines.push(format!(
            "Audio: {}, {} Hz, {channels}",
            audio.codec, audio.sample_rate
        ));
    }

    if let Some(comment) = &settings.comment_text {
        lines.push(format!("{} {comment}", normalize_label(&settings.comment_label)));
    }

    lines
}

/// Ensure a comment label ends with a colon.
fn normalize_label(label: &str) -> String {
    let trimmed = label.trim_end();
    if trimmed.ends_with(':') {
        trimmed.to_string()
    } else {
        format!("{trimmed}:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::AudioInfo;
    use std::path::PathBuf;

    fn sample_metadata() -> VideoMetadata {
        VideoMetadata {
            path: PathBuf::from("/media/clip.mp4"),
            duration_seconds: 596.46,
            width: 1280,
            height: 720,
            rotation_degrees: 0,
            container_format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            codec: "h264".to_string(),
            bit_rate_kbps: 1536,
            frame_rate: 23.98,
            file_size_bytes: 115_343_360,
            audio: Some(AudioInfo {
                codec: "aac".to_string(),
                sample_rate: 48_000,
                channels: 2,
            }),
        }
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(9.9), "00:09");
        assert_eq!(format_time(75.0), "01:15");
        assert_eq!(format_time(596.46), "09:56");
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(36_000.0), "10:00:00");
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(1024), "1.00 KiB");
        assert_eq!(format_size(1_536_000), "1.46 MiB");
        assert_eq!(format_size(115_343_360), "110.00 MiB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.00 GiB");
    }

    #[test]
    fn header_lines_complete() {
        let metadata = sample_metadata();
        let settings = Settings::default();
        let lines = header_lines(&metadata, &settings);

        assert_eq!(
            lines,
            vec![
                "File: clip.mp4".to_string(),
                "Duration: 09:56".to_string(),
                "Dimensions: 1280x720 px".to_string(),
                "Codec: h264".to_string(),
                "Bit rate: 1536 kb/s".to_string(),
                "Frame rate: 23.98 fps".to_string(),
                "Size: 115343360 B (110.00 MiB)".to_string(),
                "Audio: aac, 48000 Hz, stereo".to_string(),
            ]
        );
    }

    #[test]
    fn header_lines_drop_missing_facts() {
        let mut metadata = sample_metadata();
        metadata.bit_rate_kbps = 0;
        metadata.frame_rate = 0.0;
        metadata.audio = None;
        metadata.file_size_bytes = 512;

        let lines = header_lines(&metadata, &Settings::default());
        assert!(!lines.iter().any(|line| line.starts_with("Bit rate")));
        assert!(!lines.iter().any(|line| line.starts_with("Frame rate")));
        assert!(!lines.iter().any(|line| line.starts_with("Audio")));
        assert!(lines.contains(&"Size: 512 B".to_string()));
    }

    #[test]
    fn rotated_dimensions_in_header() {
        let mut metadata = sample_metadata();
        metadata.rotation_degrees = 90;
        let lines = header_lines(&metadata, &Settings::default());
        assert!(lines.contains(&"Dimensions: 720x1280 px".to_string()));
    }

    #[test]
    fn comment_line_uses_custom_label() {
        let metadata = sample_metadata();
        let mut settings = Settings::default();
        settings.comment_text = Some("archived 2024".to_string());
        settings.comment_label = "Note".to_string();

        let lines = header_lines(&metadata, &settings);
        assert_eq!(lines.last().unwrap(), "Note: archived 2024");
    }

    #[test]
    fn label_normalization() {
        assert_eq!(normalize_label("Comment:"), "Comment:");
        assert_eq!(normalize_label("Comment"), "Comment:");
        assert_eq!(normalize_label("Comment  "), "Comment:");
    }
}
