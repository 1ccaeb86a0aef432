//! Krop WASM - WebAssembly bindings for the Krop crop engine
//!
//! This crate exposes krop-core to a JavaScript/TypeScript host that renders
//! PDF pages and writes the output document itself.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for rectangles and page rasters
//! - `trim` - Automatic margin trimming of selections
//! - `job` - Page ranges, selections and crop planning
//! - `settings` - Persisted preferences and dialog helpers
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsRect, JsSelections, plan_crop } from '@krop/wasm';
//!
//! await init();
//!
//! const selections = new JsSelections(0);
//! selections.set(1, new JsRect(36, 36, 756, 576));
//! const plan = plan_crop("1-10", pdf.numPages, 0, selections);
//! console.log(`Cropping ${plan.len} pages`);
//! ```

use wasm_bindgen::prelude::*;

mod job;
mod settings;
mod trim;
mod types;

// Re-export public types
pub use job::{plan_crop, plan_crop_with_lookup, resolve_pages, rotation_degrees, JsCropPlan, JsSelections};
pub use settings::{default_output_path, load_settings, parse_aspect_ratio, save_settings};
pub use trim::{parse_padding, trim_margins};
pub use types::{JsPageRaster, JsRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
