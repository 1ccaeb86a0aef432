//! Grayscale page rasters for margin detection.
//!
//! The host renders each page and hands over the pixels; this module turns
//! them into a single-channel intensity image the trimmer can sample.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageReader, Luma};
use thiserror::Error;

use super::IntensitySampler;

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
const LUMINANCE_B: f32 = 0.0722;

/// Errors from building or sampling a page raster.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Pixel data length doesn't match the dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoded page image could not be decoded
    #[error("Could not decode page image: {0}")]
    Decode(String),

    /// A scan line reached outside the raster
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} page raster")]
    OutOfBounds { x: i32, y: i32, width: u32, height: u32 },
}

/// Luminance (0-255) of an RGB pixel.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// A rendered page reduced to grayscale intensities.
#[derive(Debug, Clone)]
pub struct PageRaster {
    image: GrayImage,
}

impl PageRaster {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    /// Build a raster from interleaved RGB pixels (3 bytes per pixel).
    pub fn from_rgb(width: u32, height: u32, pixels: &[u8]) -> Result<Self, RasterError> {
        Self::from_interleaved(width, height, pixels, 3)
    }

    /// Build a raster from interleaved RGBA pixels, as read back from an
    /// HTML canvas. Alpha is ignored.
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<Self, RasterError> {
        Self::from_interleaved(width, height, pixels, 4)
    }

    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::new(image.to_luma8())
    }

    /// Decode an encoded page image (PNG or JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RasterError::Decode(e.to_string()))?;

        let image = reader
            .decode()
            .map_err(|e| RasterError::Decode(e.to_string()))?;

        Ok(Self::from_dynamic(&image))
    }

    fn from_interleaved(
        width: u32,
        height: u32,
        pixels: &[u8],
        channels: usize,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * channels;
        if pixels.len() != expected {
            return Err(RasterError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }

        let luma: Vec<u8> = pixels
            .chunks_exact(channels)
            .map(|px| luma_u8(px[0], px[1], px[2]))
            .collect();

        GrayImage::from_raw(width, height, luma)
            .map(Self::new)
            .ok_or(RasterError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }
}

impl IntensitySampler for PageRaster {
    type Error = RasterError;

    fn intensity(&self, x: i32, y: i32) -> Result<u8, RasterError> {
        let (width, height) = self.image.dimensions();
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(px), Ok(py)) if px < width && py < height => {
                let Luma([value]) = *self.image.get_pixel(px, py);
                Ok(value)
            }
            _ => Err(RasterError::OutOfBounds {
                x,
                y,
                width,
                height,
            }),
        }
    }
}
