//! WASM bindings for page ranges, selections and crop planning.
//!
//! Planning is pure: the host gets back a [`JsCropPlan`] describing which
//! rectangle of which page goes into the output, with which rotation, and
//! performs the document writes itself.

use crate::types::JsRect;
use krop_core::{
    resolve_pages as core_resolve_pages, CropError, CropOperation, CropRequest, PageSelections,
    Rect, Rotation, SelectionMode, SelectionModel,
};
use wasm_bindgen::prelude::*;

fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Resolve a page-range expression such as `"1,3-5,8-"`.
///
/// An empty expression selects every page from 1 to `last_page`.
#[wasm_bindgen]
pub fn resolve_pages(expression: &str, last_page: u32) -> Result<Vec<u32>, JsValue> {
    core_resolve_pages(expression, last_page).map_err(to_js_error)
}

/// Rotation in degrees for an index of the rotation selector
/// (`0 -> 0`, `1 -> 270`, `2 -> 90`, `3 -> 180`).
#[wasm_bindgen]
pub fn rotation_degrees(index: usize) -> Result<u32, JsValue> {
    Rotation::from_index(index)
        .map(Rotation::degrees)
        .map_err(to_js_error)
}

/// Selection mode codes used across the JS boundary.
fn mode_from_code(code: u8) -> Option<SelectionMode> {
    match code {
        0 => Some(SelectionMode::All),
        1 => Some(SelectionMode::EvenOdd),
        2 => Some(SelectionMode::Individual),
        _ => None,
    }
}

fn mode_code(mode: SelectionMode) -> u8 {
    match mode {
        SelectionMode::All => 0,
        SelectionMode::EvenOdd => 1,
        SelectionMode::Individual => 2,
    }
}

fn invalid_mode(code: u8) -> JsValue {
    JsValue::from_str(&format!("Invalid selection mode: {code}"))
}

/// Crop selections drawn by the user.
///
/// Modes: `0` one selection for all pages, `1` separate odd/even
/// selections, `2` one selection per page.
#[wasm_bindgen]
pub struct JsSelections {
    inner: PageSelections,
}

#[wasm_bindgen]
impl JsSelections {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: u8) -> Result<JsSelections, JsValue> {
        mode_from_code(mode)
            .map(|mode| JsSelections {
                inner: PageSelections::new(mode),
            })
            .ok_or_else(|| invalid_mode(mode))
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> u8 {
        mode_code(self.inner.mode())
    }

    pub fn set_mode(&mut self, mode: u8) -> Result<(), JsValue> {
        let mode = mode_from_code(mode).ok_or_else(|| invalid_mode(mode))?;
        self.inner.set_mode(mode);
        Ok(())
    }

    /// Store the selection drawn on `page`.
    pub fn set(&mut self, page: u32, rect: &JsRect) {
        self.inner.set(page, (*rect).into());
    }

    /// Remove the selection seen on `page`.
    pub fn remove(&mut self, page: u32) -> Option<JsRect> {
        self.inner.remove(page).map(JsRect::from)
    }

    /// Selection that applies to `page`, if any.
    pub fn rect_for(&self, page: u32) -> Option<JsRect> {
        self.inner.rect_for(page).map(JsRect::from)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

/// The planned crop job.
#[wasm_bindgen]
pub struct JsCropPlan {
    operations: Vec<CropOperation>,
    rotation: Rotation,
}

#[wasm_bindgen]
impl JsCropPlan {
    /// Number of output pages.
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Source page numbers in output order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.operations.iter().map(|op| op.page).collect()
    }

    /// Rotation applied to every output page, in degrees.
    #[wasm_bindgen(getter)]
    pub fn rotation_degrees(&self) -> u32 {
        self.rotation.degrees()
    }

    /// Crop rectangles flattened as `[top, left, bottom, right, ...]`.
    pub fn rects(&self) -> Vec<f64> {
        self.operations
            .iter()
            .flat_map(|op| [op.rect.top, op.rect.left, op.rect.bottom, op.rect.right])
            .collect()
    }

    /// The operations as an array of `{ page, rect, rotation }` objects.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.operations).map_err(JsValue::from)
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsCropPlan {
    fn new(operations: Vec<CropOperation>, rotation: Rotation) -> Self {
        Self {
            operations,
            rotation,
        }
    }
}

/// Plan a crop job from the dialog inputs.
///
/// # Arguments
///
/// * `pages` - Page-range expression; empty means all pages
/// * `last_page` - Number of pages in the source document
/// * `rotation_index` - Index of the rotation selector
/// * `selections` - The user's selections
///
/// # Errors
///
/// Fails on a malformed page range or rotation index, and when a page has
/// no selection.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const selections = new JsSelections(0);
/// selections.set(1, new JsRect(36, 36, 756, 576));
/// const plan = plan_crop("1-3", doc.numPages, 0, selections);
/// for (const op of plan.to_js()) { ... }
/// ```
#[wasm_bindgen]
pub fn plan_crop(
    pages: &str,
    last_page: u32,
    rotation_index: usize,
    selections: &JsSelections,
) -> Result<JsCropPlan, JsValue> {
    plan_impl(pages, last_page, rotation_index, &selections.inner).map_err(to_js_error)
}

/// Plan a crop job with selections supplied by a JS callback.
///
/// `lookup(page)` must return `{ top, left, bottom, right }` or
/// `null`/`undefined` when the page has no selection. A callback that throws
/// or returns something else counts as a missing selection.
#[wasm_bindgen]
pub fn plan_crop_with_lookup(
    pages: &str,
    last_page: u32,
    rotation_index: usize,
    lookup: &js_sys::Function,
) -> Result<JsCropPlan, JsValue> {
    let selections = |page: u32| -> Option<Rect> {
        let value = lookup.call1(&JsValue::NULL, &JsValue::from(page)).ok()?;
        serde_wasm_bindgen::from_value::<Option<Rect>>(value).ok()?
    };
    plan_impl(pages, last_page, rotation_index, &selections).map_err(to_js_error)
}

fn plan_impl<M>(
    pages: &str,
    last_page: u32,
    rotation_index: usize,
    selections: &M,
) -> Result<JsCropPlan, CropError>
where
    M: SelectionModel + ?Sized,
{
    let request = CropRequest::new(pages, rotation_index);
    let operations = request.plan(last_page, selections)?;
    let rotation = Rotation::from_index(rotation_index)?;
    Ok(JsCropPlan::new(operations, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_rect() -> Rect {
        Rect::new(36.0, 36.0, 756.0, 576.0)
    }

    #[test]
    fn test_mode_codes() {
        for code in 0..3 {
            let mode = mode_from_code(code).unwrap();
            assert_eq!(mode_code(mode), code);
        }
        assert!(mode_from_code(3).is_none());
    }

    #[test]
    fn test_plan_uniform_selection() {
        let plan = plan_impl("1-2", 3, 2, &page_rect()).unwrap();

        assert_eq!(plan.len(), 2);
        assert!(!plan.is_empty());
        assert_eq!(plan.page_numbers(), vec![1, 2]);
        assert_eq!(plan.rotation_degrees(), 90);
        assert_eq!(
            plan.rects(),
            vec![36.0, 36.0, 756.0, 576.0, 36.0, 36.0, 756.0, 576.0]
        );
    }

    #[test]
    fn test_plan_even_odd_selections() {
        let mut inner = PageSelections::new(SelectionMode::EvenOdd);
        inner.set(1, Rect::new(0.0, 0.0, 10.0, 10.0));
        inner.set(2, Rect::new(5.0, 5.0, 15.0, 15.0));

        let plan = plan_impl("", 3, 0, &inner).unwrap();

        assert_eq!(plan.page_numbers(), vec![1, 2, 3]);
        assert_eq!(plan.rects()[4..8], [5.0, 5.0, 15.0, 15.0]);
        assert_eq!(plan.rects()[8..12], [0.0, 0.0, 10.0, 10.0]);
    }

    #[test]
    fn test_plan_missing_selection() {
        let inner = PageSelections::new(SelectionMode::Individual);
        let err = plan_impl("1", 1, 0, &inner).err().unwrap();
        assert!(matches!(err, CropError::MissingSelection(1)));
    }

    #[test]
    fn test_plan_rejects_bad_inputs() {
        assert!(matches!(
            plan_impl("1-x", 3, 0, &page_rect()),
            Err(CropError::Parse { field: "page range", .. })
        ));
        assert!(matches!(
            plan_impl("1", 3, 4, &page_rect()),
            Err(CropError::Parse { field: "rotation index", .. })
        ));
    }

    #[test]
    fn test_selections_wrapper() {
        let mut selections = JsSelections {
            inner: PageSelections::new(SelectionMode::All),
        };
        selections.set(4, &JsRect::from(page_rect()));

        assert_eq!(selections.mode(), 0);
        assert_eq!(selections.rect_for(1).map(Rect::from), Some(page_rect()));

        selections.clear();
        assert!(selections.rect_for(1).is_none());
    }
}
