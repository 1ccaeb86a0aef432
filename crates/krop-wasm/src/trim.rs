//! WASM bindings for automatic margin trimming.
//!
//! The host renders a page to a canvas, wraps the pixels in a
//! [`JsPageRaster`], and asks for the user's selection to be shrunk to the
//! page content.

use crate::types::{JsPageRaster, JsRect};
use krop_core::{trim_selection, PageMapping, Padding, Rect, TrimPolicy};
use wasm_bindgen::prelude::*;

/// Trim the blank margins of a selection.
///
/// # Arguments
///
/// * `raster` - The page rendered at any resolution
/// * `selection` - Selection in document space (points)
/// * `page_width`, `page_height` - Page size in points, used to map the
///   selection onto the raster
/// * `sensitivity` - Contrast threshold as entered in the UI (e.g. `"5"`)
/// * `allowed_changes` - Number of contrast changes a margin line may
///   contain and still count as blank (e.g. `"0"`)
/// * `padding` - Padding text in pixels of `raster`: `""`, `"4"` or `"4, 2"`
///
/// # Returns
///
/// The trimmed and padded selection in document space.
///
/// # Errors
///
/// Fails with a message if a field does not parse, or the selection does not
/// map onto the rendered page.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const raster = new JsPageRaster(canvas.width, canvas.height, imageData.data);
/// const trimmed = trim_margins(raster, selection, 612, 792, "5", "0", "2");
/// ```
#[wasm_bindgen]
pub fn trim_margins(
    raster: &JsPageRaster,
    selection: &JsRect,
    page_width: f64,
    page_height: f64,
    sensitivity: &str,
    allowed_changes: &str,
    padding: &str,
) -> Result<JsRect, JsValue> {
    trim_margins_impl(
        raster,
        (*selection).into(),
        page_width,
        page_height,
        sensitivity,
        allowed_changes,
        padding,
    )
    .map(JsRect::from)
    .map_err(|e| JsValue::from_str(&e))
}

/// Parse a padding field and return `[dw, dh]`.
#[wasm_bindgen]
pub fn parse_padding(input: &str) -> Result<Vec<f64>, JsValue> {
    Padding::parse(input)
        .map(|p| vec![p.dw, p.dh])
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn trim_margins_impl(
    raster: &JsPageRaster,
    selection: Rect,
    page_width: f64,
    page_height: f64,
    sensitivity: &str,
    allowed_changes: &str,
    padding: &str,
) -> Result<Rect, String> {
    let policy = TrimPolicy::from_inputs(sensitivity, allowed_changes).map_err(|e| e.to_string())?;
    let padding = Padding::parse(padding).map_err(|e| e.to_string())?;

    let page = raster.inner();
    let mapping = PageMapping::from_sizes(page_width, page_height, page.width(), page.height());

    trim_selection(page, &selection, &mapping, &policy, padding).map_err(|e| e.to_string())
}
