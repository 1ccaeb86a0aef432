//! Output page rotation.
//!
//! The rotation selector in the host UI lists its entries in the order
//! 0°, 270°, 90°, 180°. [`ROTATION_TABLE`] maps the selector index to the
//! rotation and must keep exactly that order.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Rotation applied to a cropped page, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u16)]
pub enum Rotation {
    /// Keep the page upright.
    #[default]
    Rotate0 = 0,
    Rotate90 = 90,
    Rotate180 = 180,
    Rotate270 = 270,
}

/// Selector index to rotation.
pub const ROTATION_TABLE: [Rotation; 4] = [
    Rotation::Rotate0,
    Rotation::Rotate270,
    Rotation::Rotate90,
    Rotation::Rotate180,
];

impl Rotation {
    /// Look up the rotation for a selector index.
    ///
    /// # Errors
    ///
    /// Returns [`CropError::Parse`] for indices outside the table.
    pub fn from_index(index: usize) -> Result<Rotation, CropError> {
        ROTATION_TABLE
            .get(index)
            .copied()
            .ok_or_else(|| CropError::parse("rotation index", index.to_string()))
    }

    /// Rotation angle in degrees.
    pub fn degrees(self) -> u32 {
        self as u32
    }

    /// Returns true if the rotated page has its width and height swapped.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

impl From<Rotation> for u32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u32> for Rotation {
    type Error = String;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees % 360 {
            0 => Ok(Rotation::Rotate0),
            90 => Ok(Rotation::Rotate90),
            180 => Ok(Rotation::Rotate180),
            270 => Ok(Rotation::Rotate270),
            _ => Err(format!("rotation must be a multiple of 90 degrees, got {degrees}")),
        }
    }
}
