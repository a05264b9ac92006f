//! Contact sheet rendering.
//!
//! Composes one JPEG per video: an optional metadata header at the top and a
//! grid of evenly sampled, timestamped frame thumbnails beneath it.

use std::{fs::File, io::BufWriter, path::Path};

use image::{
    RgbImage,
    codecs::jpeg::JpegEncoder,
    imageops::{self, FilterType},
};

use crate::{
    config::Settings,
    error::SheetError,
    layout::{Orientation, SheetLayout, effective_grid},
    sampler::sample_timestamps,
    source::VideoFile,
    text::{self, LINE_SPACING, SHADOW_OFFSET, SheetFont, TIMESTAMP_INSET},
};

/// Render the contact sheet for one video in memory.
///
/// # Errors
///
/// Fails when the video cannot be probed, is too short for the configured
/// lead-in skip, holds fewer frames than the grid needs, a font cannot be
/// loaded, the layout degenerates, or any single frame fails to decode.
pub fn render_contact_sheet(
    video_path: &Path,
    settings: &Settings,
) -> Result<RgbImage, SheetError> {
    let mut video = VideoFile::open(video_path)?;
    let metadata = video.metadata().clone();

    let (corrected_width, corrected_height) = metadata.corrected_dimensions();
    let orientation = Orientation::classify(corrected_width, corrected_height);
    let grid = effective_grid(
        orientation,
        settings.columns,
        settings.rows,
        settings.vertical_columns,
        settings.vertical_rows,
    );

    let timestamps = sample_timestamps(
        metadata.duration_seconds,
        settings.skip_seconds,
        grid.cell_count(),
    )?;

    // A grid of N cells needs at least N distinct frames in the sampled span.
    if metadata.frame_rate > 0.0 {
        let span = metadata.duration_seconds - settings.skip_seconds;
        let available = (span * metadata.frame_rate) as u64;
        if available < u64::from(grid.cell_count()) {
            return Err(SheetError::TooFewFrames {
                requested: grid.cell_count(),
                available,
            });
        }
    }

    let timestamp_font = timestamp_font(settings)?;

    let (header_font, header_lines) = if settings.header_enabled {
        let font = header_font(settings)?;
        let lines = text::header_lines(&metadata, settings);
        (Some(font), lines)
    } else {
        (None, Vec::new())
    };

    let header_height = match &header_font {
        Some(font) => {
            let heights: Vec<u32> = header_lines
                .iter()
                .map(|line| font.line_height(line))
                .collect();
            header_block_height(&heights, settings.spacing)
        }
        None => 0,
    };

    let layout = SheetLayout::compute(
        settings.width,
        grid,
        settings.spacing,
        metadata.corrected_aspect(),
        header_height,
    )?;

    log::debug!(
        "Rendering {}: {}x{} canvas, {}x{} grid, {}x{} cells, header {}px",
        video_path.display(),
        layout.canvas_width,
        layout.canvas_height,
        grid.columns,
        grid.rows,
        layout.cell_width,
        layout.cell_height,
        layout.header_height,
    );

    let mut canvas = RgbImage::from_pixel(
        layout.canvas_width,
        layout.canvas_height,
        settings.background_color,
    );

    if let Some(font) = &header_font {
        let mut y = settings.spacing;
        for line in &header_lines {
            font.draw(
                &mut canvas,
                settings.spacing as i32,
                y as i32,
                settings.header_font_color,
                line,
            );
            y += font.line_height(line) + LINE_SPACING;
        }
    }

    for (index, &timestamp) in timestamps.iter().enumerate() {
        let index = index as u32;
        let row = index / grid.columns;
        let column = index % grid.columns;
        let (cell_x, cell_y) = layout.cell_origin(row, column);

        let frame = video.frame_at(timestamp)?;
        let frame = match metadata.rotation_degrees {
            90 => imageops::rotate90(&frame),
            180 => imageops::rotate180(&frame),
            270 => imageops::rotate270(&frame),
            _ => frame,
        };
        let thumbnail = imageops::resize(
            &frame,
            layout.cell_width,
            layout.cell_height,
            FilterType::Triangle,
        );
        imageops::replace(&mut canvas, &thumbnail, i64::from(cell_x), i64::from(cell_y));

        let label = text::format_time(timestamp);
        let label_width = timestamp_font.text_width(&label);
        let label_height = timestamp_font.line_height(&label);
        let (label_x, label_y) = label_origin(
            cell_x,
            cell_y,
            layout.cell_width,
            layout.cell_height,
            label_width,
            label_height,
        );

        if let Some(shadow) = settings.timestamp_shadow_color {
            timestamp_font.draw(
                &mut canvas,
                label_x + SHADOW_OFFSET,
                label_y + SHADOW_OFFSET,
                shadow,
                &label,
            );
        }
        timestamp_font.draw(
            &mut canvas,
            label_x,
            label_y,
            settings.timestamp_font_color,
            &label,
        );
    }

    Ok(canvas)
}

/// Render a video's contact sheet and write it to `output_path` as JPEG.
pub fn write_contact_sheet(
    video_path: &Path,
    output_path: &Path,
    settings: &Settings,
) -> Result<(), SheetError> {
    let sheet = render_contact_sheet(video_path, settings)?;
    save_jpeg(&sheet, output_path, settings.jpeg_quality)
}

/// The header font; the builtin font always renders at its fixed default
/// size, configured sizes apply to user font files only.
fn header_font(settings: &Settings) -> Result<SheetFont, SheetError> {
    SheetFont::resolve(&settings.header_font_choice(), text::DEFAULT_HEADER_FONT_SIZE)
}

/// The timestamp font, with the same builtin-size rule as [`header_font`].
fn timestamp_font(settings: &Settings) -> Result<SheetFont, SheetError> {
    SheetFont::resolve(
        &settings.timestamp_font_choice(),
        text::DEFAULT_TIMESTAMP_FONT_SIZE,
    )
}

/// Height of the rendered header block: top margin, the line heights, and
/// gaps between lines (none after the last).
fn header_block_height(line_heights: &[u32], spacing: u32) -> u32 {
    if line_heights.is_empty() {
        return 0;
    }
    let gaps = LINE_SPACING * (line_heights.len() as u32 - 1);
    spacing + line_heights.iter().sum::<u32>() + gaps
}

/// Top-left corner of a timestamp label inset from its cell's bottom-right
/// corner, clamped so the label never leaves the cell.
fn label_origin(
    cell_x: u32,
    cell_y: u32,
    cell_width: u32,
    cell_height: u32,
    label_width: u32,
    label_height: u32,
) -> (i32, i32) {
    let x = (cell_x + cell_width)
        .saturating_sub(label_width + TIMESTAMP_INSET)
        .max(cell_x);
    let y = (cell_y + cell_height)
        .saturating_sub(label_height + TIMESTAMP_INSET)
        .max(cell_y);
    (x as i32, y as i32)
}

fn save_jpeg(sheet: &RgbImage, output_path: &Path, quality: u8) -> Result<(), SheetError> {
    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality);
    sheet.write_with_encoder(encoder)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{DEFAULT_HEADER_FONT_SIZE, DEFAULT_TIMESTAMP_FONT_SIZE};

    #[test]
    fn header_block_has_no_gap_after_the_last_line() {
        // Top margin, three 10px lines, gaps between lines only.
        assert_eq!(header_block_height(&[10, 10, 10], 2), 2 + 30 + 2 * 2);
        assert_eq!(header_block_height(&[14], 2), 2 + 14);
        assert_eq!(header_block_height(&[], 2), 0);
    }

    #[test]
    fn builtin_fonts_ignore_configured_sizes() {
        let mut settings = Settings::default();
        settings.header_font_size = 30.0;
        settings.timestamp_font_size = 30.0;

        // Needs a system font to probe.
        let Ok(header) = header_font(&settings) else {
            return;
        };
        assert_eq!(header.size(), DEFAULT_HEADER_FONT_SIZE);

        let timestamp = timestamp_font(&settings).unwrap();
        assert_eq!(timestamp.size(), DEFAULT_TIMESTAMP_FONT_SIZE);
    }

    #[test]
    fn labels_are_inset_from_the_bottom_right_corner() {
        // Cell at (2, 52), 197x111; a 34x12 label.
        let (x, y) = label_origin(2, 52, 197, 111, 34, 12);
        assert_eq!(x, (2 + 197 - 34 - 2) as i32);
        assert_eq!(y, (52 + 111 - 12 - 2) as i32);
    }

    #[test]
    fn oversized_labels_clamp_to_the_cell_origin() {
        let (x, y) = label_origin(10, 20, 30, 10, 100, 40);
        assert_eq!((x, y), (10, 20));
    }

    #[test]
    fn saved_jpeg_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.jpg");
        let sheet = RgbImage::from_pixel(32, 16, image::Rgb([128, 64, 32]));

        save_jpeg(&sheet, &path, 95).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded.dimensions(), (32, 16));
    }
}
