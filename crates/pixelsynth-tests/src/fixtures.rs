//! Test fixture utilities for synthetic images and settings files.

use pixelsynth_backend_midi::RgbaImage;
use pixelsynth_spec::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Opaque white.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Opaque black.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// A temporary directory holding input images and settings files.
pub struct ImageFixture {
    pub root: TempDir,
}

impl ImageFixture {
    /// Create a new empty fixture directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        Self { root }
    }

    /// Get the fixture root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a PNG whose pixels come from `pixel(x, y)`.
    pub fn write_png<F>(&self, name: &str, width: u32, height: u32, pixel: F) -> PathBuf
    where
        F: Fn(u32, u32) -> [u8; 4],
    {
        let image = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(pixel(x, y)));
        let path = self.path().join(name);
        image.save(&path).expect("Failed to write PNG fixture");
        path
    }

    /// Write a settings file serialized from `settings`.
    pub fn write_settings(&self, name: &str, settings: &Settings) -> PathBuf {
        let json = settings.to_json_pretty().expect("Failed to serialize settings");
        self.write_file(name, &json)
    }

    /// Write an arbitrary text file.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }
}

impl Default for ImageFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an in-memory image from `pixel(x, y)`.
pub fn image_from_fn<F>(width: u32, height: u32, pixel: F) -> RgbaImage
where
    F: Fn(u32, u32) -> [u8; 4],
{
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    RgbaImage::new(width, height, data).expect("fixture dimensions match buffer")
}

/// White pixels on the main diagonal, black elsewhere.
pub fn diagonal(size: u32) -> RgbaImage {
    image_from_fn(size, size, |x, y| if x == y { WHITE } else { BLACK })
}

/// Alternating white and black pixels, white at the origin.
pub fn checkerboard(width: u32, height: u32) -> RgbaImage {
    image_from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            WHITE
        } else {
            BLACK
        }
    })
}

/// Grey level rising left to right from 0 to 255.
pub fn horizontal_gradient(width: u32, height: u32) -> RgbaImage {
    let span = width.saturating_sub(1).max(1);
    image_from_fn(width, height, |x, _| {
        let v = (x * 255 / span) as u8;
        [v, v, v, 255]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelsynth_backend_midi::PixelSource;

    #[test]
    fn test_diagonal_pixels() {
        let image = diagonal(3);
        assert_eq!(image.rgba(1, 1), WHITE);
        assert_eq!(image.rgba(2, 1), BLACK);
    }

    #[test]
    fn test_gradient_endpoints() {
        let image = horizontal_gradient(4, 1);
        assert_eq!(image.rgba(0, 0), [0, 0, 0, 255]);
        assert_eq!(image.rgba(3, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_png_fixture_round_trips_through_loader() {
        let fixture = ImageFixture::new();
        let path = fixture.write_png("dot.png", 2, 2, |x, y| {
            if x == 1 && y == 0 {
                WHITE
            } else {
                BLACK
            }
        });
        let loaded = pixelsynth_cli::input::load_image(&path, 512).unwrap();
        assert_eq!(loaded.image.width(), 2);
        assert_eq!(loaded.image.rgba(1, 0), WHITE);
        assert_eq!(loaded.image.rgba(0, 0), BLACK);
    }
}
