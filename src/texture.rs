use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::grid::{ByteGrid, NoiseGrid};

#[derive(Debug)]
pub enum TextureError {
    Io(std::io::Error),
    Image(image::ImageError),
    TooLarge { width: usize, height: usize },
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TextureError::Io(err) => write!(f, "IO Error: {}", err),
            TextureError::Image(err) => write!(f, "Image Error: {}", err),
            TextureError::TooLarge { width, height } => {
                write!(f, "Texture {}x{} exceeds the PNG size limit", width, height)
            }
        }
    }
}

impl std::error::Error for TextureError {}

impl From<std::io::Error> for TextureError {
    fn from(err: std::io::Error) -> Self {
        TextureError::Io(err)
    }
}

impl From<image::ImageError> for TextureError {
    fn from(err: image::ImageError) -> Self {
        TextureError::Image(err)
    }
}

/// Scales each value by 256 and truncates to a byte.
///
/// Values in [0,1) map monotonically onto 0..=255. Exactly 1.0 scales to 256
/// and wraps around to 0, the same as the integer truncation it mirrors.
/// Negative values clamp to 0.
pub fn map_to_gray(grid: &NoiseGrid) -> ByteGrid {
    grid.map(|&value| gray_level(value))
}

#[inline]
fn gray_level(value: f32) -> u8 {
    (256.0 * value) as u32 as u8
}

/// Greyscale texture ready to hand to a renderer or write to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct GreyscaleTexture {
    pixels: ByteGrid,
}

impl GreyscaleTexture {
    pub fn from_noise(noise: &NoiseGrid) -> Self {
        Self { pixels: map_to_gray(noise) }
    }

    pub fn from_pixels(pixels: ByteGrid) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> usize { self.pixels.width() }

    pub fn height(&self) -> usize { self.pixels.height() }

    pub fn pixels(&self) -> &ByteGrid {
        &self.pixels
    }

    /// Row-major RGBA8 bytes, grey in every colour channel and opaque alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for &g in self.pixels.iter() {
            data.extend_from_slice(&[g, g, g, 255]);
        }
        data
    }

    pub fn histogram(&self) -> [u32; 256] {
        let mut bins = [0u32; 256];
        for &g in self.pixels.iter() {
            bins[g as usize] += 1;
        }
        bins
    }

    pub fn mean(&self) -> f32 {
        let sum: u64 = self.pixels.iter().map(|&g| g as u64).sum();
        sum as f32 / self.pixels.len() as f32
    }

    /// Writes an 8-bit luma PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), TextureError> {
        let too_large = || TextureError::TooLarge { width: self.width(), height: self.height() };
        let width = u32::try_from(self.width()).map_err(|_| too_large())?;
        let height = u32::try_from(self.height()).map_err(|_| too_large())?;

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let encoder = PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
        encoder.write_image(self.pixels.as_slice(), width, height, ExtendedColorType::L8)?;

        log::debug!("Wrote {}x{} greyscale PNG to {}", width, height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use tempfile::tempdir;

    #[test]
    fn test_map_to_gray_values() {
        let noise = Grid::from_vec(4, 1, vec![0.0, 0.5, 0.999, 0.25]).unwrap();
        let gray = map_to_gray(&noise);
        assert_eq!(gray.as_slice(), &[0, 128, 255, 64]);
    }

    #[test]
    fn test_map_to_gray_one_wraps_to_zero() {
        let noise = Grid::from_vec(2, 1, vec![1.0, -0.2]).unwrap();
        let gray = map_to_gray(&noise);
        assert_eq!(gray.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_map_to_gray_monotonic() {
        let values: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        let noise = Grid::from_vec(values.len(), 1, values).unwrap();
        let gray = map_to_gray(&noise);
        for pair in gray.as_slice().windows(2) {
            assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
        assert_eq!(gray.as_slice()[999], 255);
    }

    #[test]
    fn test_to_rgba() {
        let texture = GreyscaleTexture::from_pixels(Grid::from_vec(2, 1, vec![10u8, 200]).unwrap());
        assert_eq!(texture.to_rgba(), vec![10, 10, 10, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_histogram_and_mean() {
        let texture = GreyscaleTexture::from_pixels(Grid::from_vec(2, 2, vec![0u8, 0, 100, 200]).unwrap());
        let histogram = texture.histogram();
        assert_eq!(histogram[0], 2);
        assert_eq!(histogram[100], 1);
        assert_eq!(histogram.iter().sum::<u32>(), 4);
        assert!((texture.mean() - 75.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_png() {
        let noise = Grid::from_fn(16, 8, |x, y| (x + y) as f32 / 24.0).unwrap();
        let texture = GreyscaleTexture::from_noise(&noise);

        let dir = tempdir().unwrap();
        let path = dir.path().join("noise.png");
        texture.save_png(&path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_save_png_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("noise.png");
        let texture = GreyscaleTexture::from_pixels(Grid::filled(2, 2, 7u8).unwrap());
        assert!(matches!(texture.save_png(&path), Err(TextureError::Io(_))));
    }
}
