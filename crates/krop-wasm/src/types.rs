//! WASM-compatible wrapper types for rectangles and page rasters.
//!
//! These wrap the core Krop types and handle the conversion between Rust and
//! JavaScript data representations.

use krop_core::{PageRaster, Rect};
use wasm_bindgen::prelude::*;

/// A crop rectangle for JavaScript.
///
/// Edges are in the page's document space (points) unless a function says
/// otherwise.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsRect {
    top: f64,
    left: f64,
    bottom: f64,
    right: f64,
}

#[wasm_bindgen]
impl JsRect {
    #[wasm_bindgen(constructor)]
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> JsRect {
        JsRect {
            top,
            left,
            bottom,
            right,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn top(&self) -> f64 {
        self.top
    }

    #[wasm_bindgen(getter)]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[wasm_bindgen(getter)]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    #[wasm_bindgen(getter)]
    pub fn right(&self) -> f64 {
        self.right
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

impl From<Rect> for JsRect {
    fn from(rect: Rect) -> Self {
        JsRect::new(rect.top, rect.left, rect.bottom, rect.right)
    }
}

impl From<JsRect> for Rect {
    fn from(rect: JsRect) -> Self {
        Rect::new(rect.top, rect.left, rect.bottom, rect.right)
    }
}

/// A rendered page for margin detection.
///
/// Build it from the RGBA bytes of a canvas the page was drawn on
/// (`ctx.getImageData(...).data`).
#[wasm_bindgen]
pub struct JsPageRaster {
    inner: PageRaster,
}

#[wasm_bindgen]
impl JsPageRaster {
    /// Create a raster from RGBA pixel data (4 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, rgba: &[u8]) -> Result<JsPageRaster, JsValue> {
        PageRaster::from_rgba(width, height, rgba)
            .map(JsPageRaster::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode a PNG or JPEG rendering of the page.
    pub fn decode(bytes: &[u8]) -> Result<JsPageRaster, JsValue> {
        PageRaster::decode(bytes)
            .map(JsPageRaster::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPageRaster {
    pub(crate) fn from_core(inner: PageRaster) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &PageRaster {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krop_core::IntensitySampler;

    #[test]
    fn test_js_rect_dimensions() {
        let rect = JsRect::new(10.0, 20.0, 50.0, 80.0);
        assert_eq!(rect.width(), 60.0);
        assert_eq!(rect.height(), 40.0);
    }

    #[test]
    fn test_js_rect_core_conversion() {
        let core = Rect::new(1.0, 2.0, 3.0, 4.0);
        let js = JsRect::from(core);
        assert_eq!(js.top(), 1.0);
        assert_eq!(js.left(), 2.0);
        assert_eq!(Rect::from(js), core);
    }

    #[test]
    fn test_page_raster_from_core() {
        let core = PageRaster::from_rgba(2, 1, &[0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let raster = JsPageRaster::from_core(core);

        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 1);
        assert_eq!(raster.inner().intensity(1, 0).unwrap(), 255);
    }
}
