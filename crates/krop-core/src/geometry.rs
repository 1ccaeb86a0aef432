//! Crop rectangles, padding, and the mapping between page and pixel space.
//!
//! # Coordinate Systems
//!
//! - [`Rect`] lives in the page's document space (points, as stored by the
//!   selection collaborator)
//! - [`PixelRect`] lives in the rendered image's pixel space
//! - Origin is the top-left corner in both, y grows downwards
//!
//! The two spaces are never mixed implicitly: a [`PageMapping`] converts
//! between them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CropError;

/// A crop rectangle in document space.
///
/// Valid rectangles satisfy `top < bottom` and `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Check the edge-ordering invariant.
    pub fn is_valid(&self) -> bool {
        self.top < self.bottom && self.left < self.right
    }

    /// Expand (or, with negative amounts, contract) all four edges.
    ///
    /// Returns `None` if a contraction would leave the rectangle empty or
    /// inverted.
    pub fn pad(&self, padding: Padding) -> Option<Rect> {
        let padded = Rect {
            top: self.top - padding.dh,
            left: self.left - padding.dw,
            bottom: self.bottom + padding.dh,
            right: self.right + padding.dw,
        };
        padded.is_valid().then_some(padded)
    }
}

/// A rectangle in image pixel space, as scanned by the margin trimmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl PixelRect {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Width in pixels; widened so edges at the ends of the `i32` range
    /// cannot overflow.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    pub fn is_valid(&self) -> bool {
        self.top < self.bottom && self.left < self.right
    }
}

/// The same rectangle with `f64` edges, still in pixel units.
impl From<PixelRect> for Rect {
    fn from(rect: PixelRect) -> Self {
        Rect {
            top: f64::from(rect.top),
            left: f64::from(rect.left),
            bottom: f64::from(rect.bottom),
            right: f64::from(rect.right),
        }
    }
}

/// A document-space rectangle whose mapped edges are not finite or do not
/// fit in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Selection {0:?} does not map onto the page raster")]
pub struct PixelRangeError(pub Rect);

/// Symmetric padding applied after trimming: `dw` on left/right, `dh` on
/// top/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub dw: f64,
    pub dh: f64,
}

impl Padding {
    pub fn new(dw: f64, dh: f64) -> Self {
        Self { dw, dh }
    }

    /// Parse the padding field.
    ///
    /// - `""` => `(0, 0)`
    /// - `"v"` => `(v, v)`
    /// - `"a, ..., b"` => `(a, b)` (first and last value)
    ///
    /// Every comma-separated entry must be a finite number.
    pub fn parse(input: &str) -> Result<Padding, CropError> {
        if input.trim().is_empty() {
            return Ok(Padding::default());
        }

        let values = input
            .split(',')
            .map(|token| {
                let token = token.trim();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CropError::parse("padding", token))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [v] => Ok(Padding::new(*v, *v)),
            [first, .., last] => Ok(Padding::new(*first, *last)),
            [] => Ok(Padding::default()),
        }
    }
}

/// Scale factors between document space and the rendered image.
///
/// `scale_x` and `scale_y` are image pixels per document unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMapping {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for PageMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl PageMapping {
    /// One pixel per document unit.
    pub fn identity() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Derive the mapping from a page size and the size it was rendered at.
    ///
    /// Falls back to identity on an axis whose page extent is not positive.
    pub fn from_sizes(page_width: f64, page_height: f64, image_width: u32, image_height: u32) -> Self {
        let scale = |page: f64, image: u32| {
            if page > 0.0 {
                image as f64 / page
            } else {
                1.0
            }
        };
        Self {
            scale_x: scale(page_width, image_width),
            scale_y: scale(page_height, image_height),
        }
    }

    /// Map a document-space rectangle to pixels, rounding each edge.
    ///
    /// # Errors
    ///
    /// Returns [`PixelRangeError`] if an edge is NaN, infinite, or outside
    /// the `i32` range once scaled.
    pub fn to_pixels(&self, rect: &Rect) -> Result<PixelRect, PixelRangeError> {
        match (
            to_pixel(rect.top, self.scale_y),
            to_pixel(rect.left, self.scale_x),
            to_pixel(rect.bottom, self.scale_y),
            to_pixel(rect.right, self.scale_x),
        ) {
            (Some(top), Some(left), Some(bottom), Some(right)) => Ok(PixelRect {
                top,
                left,
                bottom,
                right,
            }),
            _ => Err(PixelRangeError(*rect)),
        }
    }

    /// Map a pixel rectangle back to document space.
    pub fn from_pixels(&self, rect: &PixelRect) -> Rect {
        self.from_image(&Rect::from(*rect))
    }

    /// Map a rectangle with fractional pixel edges back to document space.
    pub fn from_image(&self, rect: &Rect) -> Rect {
        Rect {
            top: rect.top / self.scale_y,
            left: rect.left / self.scale_x,
            bottom: rect.bottom / self.scale_y,
            right: rect.right / self.scale_x,
        }
    }
}

fn to_pixel(value: f64, scale: f64) -> Option<i32> {
    let scaled = (value * scale).round();
    (f64::from(i32::MIN)..=f64::from(i32::MAX))
        .contains(&scaled)
        .then_some(scaled as i32)
}
