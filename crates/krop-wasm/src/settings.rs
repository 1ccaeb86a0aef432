//! WASM bindings for user preferences and small dialog helpers.

use krop_core::Settings;
use std::path::Path;
use wasm_bindgen::prelude::*;

/// Default output file name for a source document
/// (`paper.pdf` becomes `paper-cropped.pdf`).
#[wasm_bindgen]
pub fn default_output_path(source: &str) -> String {
    krop_core::default_output_path(Path::new(source))
        .to_string_lossy()
        .into_owned()
}

/// Parse an aspect ratio entered as `"w:h"` or `"w"`.
///
/// Returns `undefined` if the text is not a positive ratio.
#[wasm_bindgen]
pub fn parse_aspect_ratio(input: &str) -> Option<f64> {
    krop_core::parse_aspect_ratio(input)
}

/// Parse a settings file and return it as a JS object.
///
/// An empty string gives the defaults.
#[wasm_bindgen]
pub fn load_settings(toml: &str) -> Result<JsValue, JsValue> {
    let settings = Settings::from_toml_str(toml).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&settings).map_err(JsValue::from)
}

/// Serialize settings received from JS back into TOML.
#[wasm_bindgen]
pub fn save_settings(settings: JsValue) -> Result<String, JsValue> {
    let settings: Settings = serde_wasm_bindgen::from_value(settings)?;
    settings
        .to_toml_string()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
