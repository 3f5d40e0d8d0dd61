//! Grid sampling over an RGBA pixel source.
//!
//! The grid divides the image into `resolution_x × resolution_y` cells and
//! reads the single pixel at each cell center. This is nearest-point
//! sampling, not an area average.

use pixelsynth_spec::Settings;

use crate::generate::GenerateError;

/// ITU-R BT.601 luma weights.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// A rectangular source of RGBA8 pixels addressable by `(x, y)`.
///
/// Decoding and scaling happen outside the backend; the sampler only reads.
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// RGBA value of the pixel at `(x, y)`. Callers guarantee `x < width`, `y < height`.
    fn rgba(&self, x: u32, y: u32) -> [u8; 4];
}

/// Owned RGBA8 image stored row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbaImage {
    /// Wraps a row-major RGBA8 buffer.
    ///
    /// Fails if either dimension is zero or the buffer length is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, GenerateError> {
        if width == 0 || height == 0 {
            return Err(GenerateError::InvalidImage(format!(
                "image must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(GenerateError::InvalidImage(format!(
                "expected {} bytes for a {}x{} RGBA image, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Creates an image filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, GenerateError> {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(width, height, data)
    }

    /// Overwrites the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        let offset = self.offset(x, y);
        self.data[offset..offset + 4].copy_from_slice(&rgba);
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = self.offset(x, y);
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}

/// One grid cell's measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Grid column (time step).
    pub x: u32,
    /// Grid row (0 = top = highest pitch).
    pub y: u32,
    /// Perceptual brightness, 0-255.
    pub brightness: f64,
    /// Alpha of the sampled pixel.
    pub alpha: u8,
}

impl Sample {
    /// A cell sounds iff it is not fully transparent and strictly brighter than `threshold`.
    pub fn is_active(&self, threshold: u8) -> bool {
        self.alpha > 0 && self.brightness > threshold as f64
    }
}

/// Perceptual brightness of an RGB triple (BT.601 luma), 0-255.
pub fn brightness(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Pixel coordinate of the center of cell `index` when `extent` pixels are split into `cells`.
///
/// `floor((index + 0.5) * extent / cells)` is always `< extent` for `index < cells`;
/// the clamp only guards against float rounding at the last cell.
fn cell_center(index: u32, extent: u32, cells: u32) -> u32 {
    let block = extent as f64 / cells as f64;
    let center = ((index as f64 + 0.5) * block).floor() as u32;
    center.min(extent - 1)
}

/// Samples every grid cell lazily, in outer-x / inner-y order.
///
/// Yields one [`Sample`] per cell, active or not. An empty image or a zero
/// resolution yields nothing.
pub fn sample_grid<'a, P: PixelSource + ?Sized>(
    pixels: &'a P,
    settings: &Settings,
) -> impl Iterator<Item = Sample> + 'a {
    let (width, height) = (pixels.width(), pixels.height());
    let (cols, rows) = if width == 0 || height == 0 {
        (0, 0)
    } else {
        (settings.resolution_x, settings.resolution_y)
    };

    (0..cols).flat_map(move |x| {
        let px = cell_center(x, width, cols);
        (0..rows).map(move |y| {
            let py = cell_center(y, height, rows);
            let [r, g, b, a] = pixels.rgba(px, py);
            Sample {
                x,
                y,
                brightness: brightness(r, g, b),
                alpha: a,
            }
        })
    })
}

/// Collects the cells that will sound under `settings.threshold`, in grid order.
///
/// Memory grows with the number of active cells, not the grid size.
pub fn active_samples<P: PixelSource + ?Sized>(pixels: &P, settings: &Settings) -> Vec<Sample> {
    let samples: Vec<Sample> = sample_grid(pixels, settings)
        .filter(|sample| sample.is_active(settings.threshold))
        .collect();

    log::debug!(
        "sampled {}x{} grid over {}x{} image: {} active",
        settings.resolution_x,
        settings.resolution_y,
        pixels.width(),
        pixels.height(),
        samples.len()
    );
    samples
}
