//! Sheet geometry.
//!
//! This module computes every pixel position on a contact sheet: cell
//! dimensions, grid and canvas size, and per-cell origins. Width is the
//! single authoritative sizing input; cell height is always derived from the
//! video's rotation-corrected aspect ratio, so thumbnails cannot be
//! distorted by mis-configured dimensions.

use crate::error::SheetError;

/// Whether a video is wider than tall or the other way around.
///
/// Classified from rotation-corrected dimensions; a portrait phone clip
/// stored as landscape-with-rotation-tag counts as vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Width >= height after rotation correction.
    Horizontal,
    /// Height > width after rotation correction.
    Vertical,
}

impl Orientation {
    /// Classify rotation-corrected dimensions.
    pub fn classify(corrected_width: u32, corrected_height: u32) -> Self {
        if corrected_height > corrected_width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }
}

/// The number of thumbnail columns and rows on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    /// Number of thumbnail columns.
    pub columns: u32,
    /// Number of thumbnail rows.
    pub rows: u32,
}

impl GridShape {
    /// Total number of cells (thumbnails) on the sheet.
    pub fn cell_count(self) -> u32 {
        self.columns * self.rows
    }
}

/// Pick the grid shape for a video's orientation.
///
/// Vertical videos substitute the alternate column/row counts where
/// configured; horizontal videos (and vertical videos without alternates)
/// use the base shape.
pub fn effective_grid(
    orientation: Orientation,
    columns: u32,
    rows: u32,
    vertical_columns: Option<u32>,
    vertical_rows: Option<u32>,
) -> GridShape {
    match orientation {
        Orientation::Horizontal => GridShape { columns, rows },
        Orientation::Vertical => GridShape {
            columns: vertical_columns.unwrap_or(columns),
            rows: vertical_rows.unwrap_or(rows),
        },
    }
}

/// Computed pixel geometry for one contact sheet.
///
/// Produced by [`SheetLayout::compute`]; deterministic for identical inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    /// Width of each thumbnail cell in pixels (uniform across the sheet).
    pub cell_width: u32,
    /// Height of each thumbnail cell in pixels.
    pub cell_height: u32,
    /// Final canvas width; may be a few pixels under the requested width
    /// because cell width is rounded down to whole pixels.
    pub canvas_width: u32,
    /// Final canvas height: header plus grid.
    pub canvas_height: u32,
    /// Height of the header region (zero when the header is disabled).
    pub header_height: u32,
    grid: GridShape,
    spacing: u32,
}

impl SheetLayout {
    /// Compute the sheet geometry.
    ///
    /// `aspect` is the rotation-corrected width/height ratio of the video.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Layout`] when the spacing consumes the whole
    /// target width and no room is left for cells.
    pub fn compute(
        target_width: u32,
        grid: GridShape,
        spacing: u32,
        aspect: f64,
        header_height: u32,
    ) -> Result<Self, SheetError> {
        let GridShape { columns, rows } = grid;

        let gutters = i64::from(spacing) * i64::from(columns + 1);
        let available = i64::from(target_width) - gutters;
        let cell_width = if columns > 0 {
            available / i64::from(columns)
        } else {
            0
        };
        if cell_width <= 0 {
            return Err(SheetError::Layout {
                target_width,
                columns,
                spacing,
            });
        }

        let cell_width = cell_width as u32;
        let cell_height = (f64::from(cell_width) / aspect).round() as u32;

        let grid_width = spacing * (columns + 1) + cell_width * columns;
        let grid_height = spacing * (rows + 1) + cell_height * rows;

        Ok(SheetLayout {
            cell_width,
            cell_height,
            canvas_width: grid_width,
            canvas_height: header_height + grid_height,
            header_height,
            grid,
            spacing,
        })
    }

    /// Top-left pixel origin of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        debug_assert!(row < self.grid.rows && col < self.grid.columns);
        let x = self.spacing + col * (self.cell_width + self.spacing);
        let y = self.header_height + self.spacing + row * (self.cell_height + self.spacing);
        (x, y)
    }
}
