//! Krop Core - crop planning and margin detection
//!
//! This crate turns what the user entered in the crop dialog into a list of
//! per-page crop operations, and shrinks selections to the page content.
//!
//! - [`pages`] resolves page-range expressions like `"1,3-5,8-"`
//! - [`selection`] looks up the crop rectangle of a page
//! - [`trim`] detects and removes blank margins from a rendered page
//! - [`job`] builds the operation list and drives a cropping backend
//! - [`settings`] holds the persisted trim defaults and device profiles
//!
//! Rendering pages and encoding the output document are left to the host.

pub mod error;
pub mod geometry;
pub mod job;
pub mod pages;
pub mod rotation;
pub mod selection;
pub mod settings;
pub mod trim;

pub use error::{BackendError, CropError};
pub use geometry::{PageMapping, Padding, PixelRangeError, PixelRect, Rect};
pub use job::{build_crop_job, run_crop_job, CropBackend, CropOperation, CropRequest};
pub use pages::resolve_pages;
pub use rotation::{Rotation, ROTATION_TABLE};
pub use selection::{PageSelections, SelectionMode, SelectionModel};
pub use settings::{default_output_path, parse_aspect_ratio, DeviceType, Settings, SettingsError};
pub use trim::{trim, trim_selection, IntensitySampler, PageRaster, RasterError, TrimError, TrimPolicy};
