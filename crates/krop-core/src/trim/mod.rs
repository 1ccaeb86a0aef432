//! Automatic margin trimming.
//!
//! Given a page raster and a candidate rectangle, each edge is pushed inward
//! one pixel at a time for as long as the scan line under it looks like
//! background. A line is background when it has at most
//! [`TrimPolicy::allowed_changes`] jumps larger than
//! [`TrimPolicy::sensitivity`] between neighbouring samples.
//!
//! # Edge Order
//!
//! Edges are trimmed in the fixed order top, bottom, left, right:
//! 1. Top and bottom scan horizontal lines spanning the original left/right
//! 2. Left and right scan vertical lines spanning the trimmed top/bottom
//!
//! No edge moves once the extent of its axis is down to
//! [`TrimPolicy::min_dim`].
//!
//! # Padding
//!
//! [`trim`] never pads. Callers apply [`Padding`] on the result, in pixel
//! units; [`trim_selection`] does that for the common "trim a selection"
//! flow.
//!
//! # Sampler Errors
//!
//! A scan line stops reading as soon as it is classified as content, and an
//! edge whose axis is already at the minimum extent reads nothing. Sampler
//! errors are therefore only reported for coordinates that were actually
//! read; a rectangle reaching past the raster is not guaranteed to fail.

mod raster;
mod scan;

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CropError;
use crate::geometry::{PageMapping, Padding, PixelRangeError, PixelRect, Rect};

pub use raster::{luma_u8, PageRaster, RasterError};
pub use scan::{count_changes, is_content, scan_edge, ChangeCounter, Edge, EdgeState, StopReason};

/// Smallest height/width the trimmer shrinks a rectangle to.
pub const DEFAULT_MIN_DIM: u32 = 10;

/// Default minimum intensity jump counted as a change.
pub const DEFAULT_SENSITIVITY: f64 = 5.0;

/// Default number of changes tolerated on a background line.
pub const DEFAULT_ALLOWED_CHANGES: f64 = 0.0;

/// Read access to a page's grayscale intensity (0-255).
///
/// Out-of-range coordinates are the sampler's to report; the trimmer
/// propagates the error unchanged.
pub trait IntensitySampler {
    type Error;

    fn intensity(&self, x: i32, y: i32) -> Result<u8, Self::Error>;
}

impl<F> IntensitySampler for F
where
    F: Fn(i32, i32) -> u8,
{
    type Error = Infallible;

    #[inline]
    fn intensity(&self, x: i32, y: i32) -> Result<u8, Infallible> {
        Ok(self(x, y))
    }
}

/// Noise tolerance for margin detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimPolicy {
    /// Minimum intensity delta between adjacent samples counted as a change.
    pub sensitivity: f64,
    /// Maximum number of changes on a line still classified as background.
    pub allowed_changes: f64,
    /// Minimum height/width of the trimmed rectangle, in pixels.
    #[serde(default = "default_min_dim")]
    pub min_dim: u32,
}

fn default_min_dim() -> u32 {
    DEFAULT_MIN_DIM
}

impl Default for TrimPolicy {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            allowed_changes: DEFAULT_ALLOWED_CHANGES,
            min_dim: DEFAULT_MIN_DIM,
        }
    }
}

impl TrimPolicy {
    /// Build a policy from the sensitivity and allowed-changes text fields.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Parse`] if either field is not a finite,
    /// non-negative number.
    pub fn from_inputs(sensitivity: &str, allowed_changes: &str) -> Result<Self, CropError> {
        Ok(Self {
            sensitivity: parse_non_negative("sensitivity", sensitivity)?,
            allowed_changes: parse_non_negative("allowed changes", allowed_changes)?,
            min_dim: DEFAULT_MIN_DIM,
        })
    }

    /// Builder-style override of the minimum dimension.
    pub fn with_min_dim(mut self, min_dim: u32) -> Self {
        self.min_dim = min_dim;
        self
    }

    /// Minimum extent as used by the scan; never below one pixel so the
    /// rectangle cannot collapse.
    pub(crate) fn min_extent(&self) -> i64 {
        i64::from(self.min_dim.max(1))
    }
}

fn parse_non_negative(field: &'static str, input: &str) -> Result<f64, CropError> {
    let token = input.trim();
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| CropError::parse(field, token))
}

/// Shrink `rect` to the tightest bound around non-background content.
///
/// Pure apart from the sampler reads; see the module docs for the edge
/// order.
///
/// # Errors
///
/// Propagates the first error returned by `sampler`.
pub fn trim<S>(sampler: &S, rect: PixelRect, policy: &TrimPolicy) -> Result<PixelRect, S::Error>
where
    S: IntensitySampler + ?Sized,
{
    let mut trimmed = rect;
    for edge in Edge::ORDER {
        let (position, reason) = scan_edge(sampler, &trimmed, edge, policy)?;
        tracing::trace!(?edge, from = edge.position(&trimmed), to = position, ?reason, "edge trimmed");
        trimmed = edge.with_position(trimmed, position);
    }

    tracing::debug!(?rect, ?trimmed, "trimmed margins");
    Ok(trimmed)
}

/// Errors from [`trim_selection`].
#[derive(Debug, Error)]
pub enum TrimError<E> {
    /// The selection cannot be expressed in the raster's pixel coordinates.
    #[error(transparent)]
    Selection(#[from] PixelRangeError),

    /// The sampler failed to read a pixel.
    #[error(transparent)]
    Sampler(E),
}

/// Trim a document-space selection against its rendered page and pad it.
///
/// The selection is mapped into pixel space, trimmed, expanded by `padding`
/// (in pixels of the rendered page), then mapped back. A negative padding
/// that would invert the trimmed rectangle is not applied.
pub fn trim_selection<S>(
    sampler: &S,
    selection: &Rect,
    mapping: &PageMapping,
    policy: &TrimPolicy,
    padding: Padding,
) -> Result<Rect, TrimError<S::Error>>
where
    S: IntensitySampler + ?Sized,
{
    let pixels = mapping.to_pixels(selection)?;
    let trimmed = Rect::from(trim(sampler, pixels, policy).map_err(TrimError::Sampler)?);

    let padded = trimmed.pad(padding).unwrap_or_else(|| {
        tracing::debug!(?padding, ?trimmed, "padding would invert selection, left unpadded");
        trimmed
    });
    Ok(mapping.from_image(&padded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    const WHITE: u8 = 255;
    const BLACK: u8 = 0;

    fn raster(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PageRaster {
        PageRaster::new(GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])))
    }

    /// White page with a checkerboard block covering `[lo, hi)` on both axes.
    fn checker_page(size: u32, lo: u32, hi: u32) -> PageRaster {
        raster(size, size, move |x, y| {
            let inside = (lo..hi).contains(&x) && (lo..hi).contains(&y);
            if inside && (x + y) % 2 == 0 {
                BLACK
            } else {
                WHITE
            }
        })
    }

    #[test]
    fn test_uniform_region_collapses_to_min_dim() {
        let sampler = |_x: i32, _y: i32| 200u8;
        let result = trim(&sampler, PixelRect::new(0, 0, 50, 50), &TrimPolicy::default()).unwrap();

        assert_eq!(result, PixelRect::new(40, 40, 50, 50));
        assert_eq!(result.height(), 10);
        assert_eq!(result.width(), 10);
    }

    #[test]
    fn test_low_noise_is_background() {
        let sampler = |x: i32, y: i32| 200 + ((x + y) % 3) as u8;
        let result = trim(&sampler, PixelRect::new(0, 0, 60, 80), &TrimPolicy::default()).unwrap();

        assert_eq!(result.height(), 10);
        assert_eq!(result.width(), 10);
    }

    #[test]
    fn test_shrinks_to_content_block() {
        let page = checker_page(100, 20, 40);
        let result = trim(&page, PixelRect::new(0, 0, 99, 99), &TrimPolicy::default()).unwrap();

        assert_eq!(result, PixelRect::new(20, 20, 39, 39));
    }

    #[test]
    fn test_tight_rect_is_unchanged() {
        let page = checker_page(100, 20, 40);
        let tight = PixelRect::new(20, 20, 39, 39);

        assert_eq!(trim(&page, tight, &TrimPolicy::default()).unwrap(), tight);
    }

    #[test]
    fn test_trim_is_idempotent_on_content() {
        let page = checker_page(120, 30, 75);
        let policy = TrimPolicy::default();

        let once = trim(&page, PixelRect::new(5, 5, 110, 110), &policy).unwrap();
        let twice = trim(&page, once, &policy).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_second_trim_can_move_top_past_side_content() {
        // A dotted row at y = 10, left of the block. The first pass stops the
        // top edge on it, but the side scans then discard its columns
        // (one dot each is within the tolerance), so a second pass no longer
        // sees it on the narrowed top line.
        let page = raster(100, 100, |x, y| {
            let block = (40..60).contains(&x) && (40..60).contains(&y) && (x + y) % 2 == 0;
            let dots = y == 10 && (5..15).contains(&x) && x % 2 == 0;
            if block || dots {
                BLACK
            } else {
                WHITE
            }
        });
        let policy = TrimPolicy {
            allowed_changes: 2.0,
            ..TrimPolicy::default()
        };

        let once = trim(&page, PixelRect::new(0, 0, 99, 99), &policy).unwrap();
        assert_eq!(once, PixelRect::new(10, 40, 59, 59));

        let twice = trim(&page, once, &policy).unwrap();
        assert_eq!(twice, PixelRect::new(40, 40, 59, 59));
        assert_eq!(trim(&page, twice, &policy).unwrap(), twice);
    }

    #[test]
    fn test_extreme_rect_does_not_overflow() {
        let sampler = |x: i32, y: i32| if ((x ^ y) & 1) == 0 { BLACK } else { WHITE };
        let rect = PixelRect::new(i32::MIN, 0, i32::MAX, 50);

        assert_eq!(trim(&sampler, rect, &TrimPolicy::default()).unwrap(), rect);
    }

    #[test]
    fn test_allowed_changes_tolerates_rules() {
        // A horizontal rule gives its row exactly two changes.
        let page = raster(100, 100, |x, y| {
            if y == 30 && (10..90).contains(&x) {
                BLACK
            } else {
                WHITE
            }
        });
        let rect = PixelRect::new(0, 0, 99, 99);

        let strict = trim(&page, rect, &TrimPolicy::default()).unwrap();
        assert_eq!(strict.top, 30);

        let tolerant = TrimPolicy {
            allowed_changes: 2.0,
            ..TrimPolicy::default()
        };
        let result = trim(&page, rect, &tolerant).unwrap();
        assert_eq!(result.top, 89);
        assert_eq!(result.height(), 10);
    }

    #[test]
    fn test_side_scans_use_trimmed_height() {
        // A dotted column near the left margin, above the content block.
        // Rows crossing it have at most two changes, so top/bottom skip it.
        // The full-height column would be content, but the left scan only
        // looks between the trimmed top and bottom.
        let page = raster(100, 100, |x, y| {
            let block = (40..60).contains(&x) && (40..60).contains(&y) && (x + y) % 2 == 0;
            let dots = x == 10 && y < 20 && y % 2 == 0;
            if block || dots {
                BLACK
            } else {
                WHITE
            }
        });
        let policy = TrimPolicy {
            allowed_changes: 2.0,
            ..TrimPolicy::default()
        };

        let result = trim(&page, PixelRect::new(0, 0, 99, 99), &policy).unwrap();
        assert_eq!(result, PixelRect::new(40, 40, 59, 59));
    }

    #[test]
    fn test_zero_min_dim_keeps_rect_non_empty() {
        let sampler = |_x: i32, _y: i32| 0u8;
        let policy = TrimPolicy::default().with_min_dim(0);
        let result = trim(&sampler, PixelRect::new(0, 0, 5, 5), &policy).unwrap();

        assert_eq!(result, PixelRect::new(4, 4, 5, 5));
        assert!(result.is_valid());
    }

    #[test]
    fn test_small_rect_left_alone() {
        let sampler = |_x: i32, _y: i32| 0u8;
        let rect = PixelRect::new(3, 3, 10, 12);
        assert_eq!(trim(&sampler, rect, &TrimPolicy::default()).unwrap(), rect);
    }

    #[test]
    fn test_sampler_error_propagates() {
        let page = raster(20, 20, |_, _| WHITE);
        let err = trim(&page, PixelRect::new(0, 0, 30, 30), &TrimPolicy::default()).unwrap_err();

        assert!(matches!(
            err,
            RasterError::OutOfBounds {
                x: 20,
                y: 0,
                width: 20,
                height: 20
            }
        ));
    }

    #[test]
    fn test_policy_from_inputs() {
        let policy = TrimPolicy::from_inputs(" 7.5 ", "2").unwrap();
        assert_eq!(policy.sensitivity, 7.5);
        assert_eq!(policy.allowed_changes, 2.0);
        assert_eq!(policy.min_dim, DEFAULT_MIN_DIM);
    }

    #[test]
    fn test_policy_rejects_bad_inputs() {
        assert!(matches!(
            TrimPolicy::from_inputs("abc", "0"),
            Err(CropError::Parse { field: "sensitivity", .. })
        ));
        assert!(matches!(
            TrimPolicy::from_inputs("5", "-1"),
            Err(CropError::Parse { field: "allowed changes", .. })
        ));
        assert!(TrimPolicy::from_inputs("NaN", "0").is_err());
        assert!(TrimPolicy::from_inputs("", "0").is_err());
    }

    #[test]
    fn test_trim_selection_maps_and_pads() {
        // Page rendered at 2x: block covers pixels [20, 40), i.e. points [10, 20).
        let page = checker_page(100, 20, 40);
        let mapping = PageMapping {
            scale_x: 2.0,
            scale_y: 2.0,
        };
        let selection = Rect::new(0.0, 0.0, 49.5, 49.5);

        let result = trim_selection(
            &page,
            &selection,
            &mapping,
            &TrimPolicy::default(),
            Padding::new(2.0, 1.0),
        )
        .unwrap();

        // Padding is two pixels left/right and one pixel top/bottom of the
        // render, i.e. half that in points.
        assert_eq!(result, Rect::new(9.5, 9.0, 20.0, 20.5));
    }

    #[test]
    fn test_trim_selection_rejects_unmappable_selection() {
        let sampler = |_x: i32, _y: i32| WHITE;
        let selection = Rect::new(0.0, 0.0, 1e300, 50.0);

        let err = trim_selection(
            &sampler,
            &selection,
            &PageMapping::identity(),
            &TrimPolicy::default(),
            Padding::default(),
        )
        .unwrap_err();

        assert!(matches!(err, TrimError::Selection(PixelRangeError(r)) if r == selection));
        assert!(err.to_string().starts_with("Selection"));
    }

    #[test]
    fn test_trim_selection_propagates_sampler_error() {
        let page = raster(20, 20, |_, _| WHITE);
        let err = trim_selection(
            &page,
            &Rect::new(0.0, 0.0, 30.0, 30.0),
            &PageMapping::identity(),
            &TrimPolicy::default(),
            Padding::default(),
        )
        .unwrap_err();

        assert!(matches!(err, TrimError::Sampler(RasterError::OutOfBounds { .. })));
    }

    #[test]
    fn test_trim_selection_skips_inverting_padding() {
        let sampler = |_x: i32, _y: i32| 255u8;
        let result = trim_selection(
            &sampler,
            &Rect::new(0.0, 0.0, 50.0, 50.0),
            &PageMapping::identity(),
            &TrimPolicy::default(),
            Padding::new(-20.0, -20.0),
        )
        .unwrap();

        assert_eq!(result, Rect::new(40.0, 40.0, 50.0, 50.0));
    }
}
