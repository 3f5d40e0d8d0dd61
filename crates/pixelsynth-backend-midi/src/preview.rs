//! Per-cell classification for visual previews.
//!
//! A [`CellMap`] shows which grid cells will sound and whether each one's
//! unquantized pitch already lies in the chosen scale. Off-scale cells are
//! the ones the mapper will move.

use pixelsynth_spec::Settings;
use thiserror::Error;

use crate::mapper::raw_pitch;
use crate::sampler::{active_samples, PixelSource};

/// Largest preview image [`CellMap::to_rgba`] will render, in pixels.
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 26;

/// Preview color for in-scale cells.
pub const IN_SCALE_RGBA: [u8; 4] = [255, 255, 255, 255];

/// Preview color for off-scale cells.
pub const OFF_SCALE_RGBA: [u8; 4] = [139, 0, 0, 255];

/// Preview color for silent cells.
pub const INACTIVE_RGBA: [u8; 4] = [0, 0, 0, 255];

/// Errors from rendering a preview image.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The scaled preview does not fit in memory or a PNG header.
    #[error("Preview of {width}x{height} pixels exceeds the {max} pixel limit")]
    TooLarge {
        /// Requested pixel width.
        width: u64,
        /// Requested pixel height.
        height: u64,
        /// Pixel limit.
        max: u64,
    },
}

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Below threshold or transparent.
    Inactive,
    /// Active, raw pitch is a scale member.
    InScale,
    /// Active, raw pitch will be snapped.
    OffScale,
}

impl CellState {
    /// Preview color for this state.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            CellState::Inactive => INACTIVE_RGBA,
            CellState::InScale => IN_SCALE_RGBA,
            CellState::OffScale => OFF_SCALE_RGBA,
        }
    }
}

/// Grid of cell states, `width` columns by `height` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMap {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl CellMap {
    /// Number of columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// State at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<CellState> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Number of cells that will produce a note.
    pub fn active_count(&self) -> usize {
        self.cells.len() - self.count(CellState::Inactive)
    }

    /// Renders the map as a row-major RGBA8 buffer with each cell drawn as a
    /// `cell_size × cell_size` square.
    ///
    /// Returns the buffer with its pixel width and height, or
    /// [`PreviewError::TooLarge`] when the result would exceed
    /// [`MAX_PREVIEW_PIXELS`] or a `u32` side.
    pub fn to_rgba(&self, cell_size: u32) -> Result<(u32, u32, Vec<u8>), PreviewError> {
        let cell_size = cell_size.max(1);
        let too_large = || PreviewError::TooLarge {
            width: self.width as u64 * cell_size as u64,
            height: self.height as u64 * cell_size as u64,
            max: MAX_PREVIEW_PIXELS,
        };
        let width = self.width.checked_mul(cell_size).ok_or_else(too_large)?;
        let height = self.height.checked_mul(cell_size).ok_or_else(too_large)?;
        if width as u64 * height as u64 > MAX_PREVIEW_PIXELS {
            return Err(too_large());
        }
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for py in 0..height {
            for px in 0..width {
                let state = self
                    .get(px / cell_size, py / cell_size)
                    .unwrap_or(CellState::Inactive);
                data.extend_from_slice(&state.rgba());
            }
        }
        Ok((width, height, data))
    }
}

/// Classifies every grid cell of `pixels` under `settings`.
///
/// Uses the same sampling and activation rule as generation, so the active
/// cells here are exactly the cells that become notes.
pub fn classify_cells<P: PixelSource + ?Sized>(pixels: &P, settings: &Settings) -> CellMap {
    let (width, height) = (settings.resolution_x, settings.resolution_y);
    if pixels.width() == 0 || pixels.height() == 0 || width == 0 || height == 0 {
        return CellMap {
            width: 0,
            height: 0,
            cells: Vec::new(),
        };
    }

    let mut cells = vec![CellState::Inactive; width as usize * height as usize];
    for sample in active_samples(pixels, settings) {
        let pitch = raw_pitch(sample.y, settings);
        let state = if settings.scale.contains(pitch, settings.root_note) {
            CellState::InScale
        } else {
            CellState::OffScale
        };
        cells[(sample.y * width + sample.x) as usize] = state;
    }

    log::debug!(
        "classified {} cells: {} in scale, {} off scale",
        cells.len(),
        cells.iter().filter(|c| **c == CellState::InScale).count(),
        cells.iter().filter(|c| **c == CellState::OffScale).count()
    );
    CellMap {
        width,
        height,
        cells,
    }
}
