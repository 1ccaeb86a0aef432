//! Persisted user preferences: trim defaults and device profiles.
//!
//! Settings are an explicit value passed to whoever needs them. The host
//! decides where the file lives and calls [`Settings::load`] /
//! [`Settings::save`].
//!
//! ```toml
//! [trim]
//! padding = "2"
//! sensitivity = 5.0
//! allowed_changes = 0.0
//!
//! [[device_types]]
//! name = "4:3 eReader"
//! width = 4
//! height = 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CropError;
use crate::geometry::Padding;
use crate::trim::{TrimPolicy, DEFAULT_ALLOWED_CHANGES, DEFAULT_SENSITIVITY};

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Target device geometry used to constrain the selection aspect ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl DeviceType {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Width over height, or `None` for the unconstrained 0x0 profile.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }

    /// Built-in profiles used when no device types are configured.
    pub fn defaults() -> Vec<DeviceType> {
        vec![
            DeviceType::new("Generic (don't break pages into parts)", 0, 0),
            DeviceType::new("4:3 eReader", 4, 3),
            DeviceType::new("4:3 eReader (widescreen)", 3, 4),
            DeviceType::new("Nook 1st Ed.", 600, 730),
            DeviceType::new("Nook 1st Ed. (widescreen)", 730, 600),
        ]
    }
}

/// Trim field values as the user last entered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSettings {
    /// Raw padding text, parsed with [`Padding::parse`].
    pub padding: String,
    pub sensitivity: f64,
    pub allowed_changes: f64,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            padding: "2".to_string(),
            sensitivity: DEFAULT_SENSITIVITY,
            allowed_changes: DEFAULT_ALLOWED_CHANGES,
        }
    }
}

/// All persisted preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub trim: TrimSettings,
    pub device_types: Vec<DeviceType>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trim: TrimSettings::default(),
            device_types: DeviceType::defaults(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        if settings.device_types.is_empty() {
            settings.device_types = DeviceType::defaults();
        }
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from `path`, falling back to defaults if the file does
    /// not exist yet.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn trim_policy(&self) -> TrimPolicy {
        TrimPolicy {
            sensitivity: self.trim.sensitivity,
            allowed_changes: self.trim.allowed_changes,
            ..TrimPolicy::default()
        }
    }

    pub fn padding(&self) -> Result<Padding, CropError> {
        Padding::parse(&self.trim.padding)
    }

    /// Device profile at a selector index; `None` past the end (the host's
    /// "Custom" entry).
    pub fn device_type(&self, index: usize) -> Option<&DeviceType> {
        self.device_types.get(index)
    }
}

/// Parse an aspect ratio entered as `"w:h"` or `"w"`.
///
/// With more than one colon the first and last values are used. Returns
/// `None` for anything that does not give a positive, finite ratio.
pub fn parse_aspect_ratio(input: &str) -> Option<f64> {
    let mut parts = input.split(':').map(str::trim);
    let width = parts.next()?;
    let height = parts.last().unwrap_or("1");

    let ratio = width.parse::<f64>().ok()? / height.parse::<f64>().ok()?;
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

/// Default output path for a source document: `name.pdf` becomes
/// `name-cropped.pdf` next to it.
pub fn default_output_path(source: &Path) -> PathBuf {
    let stem = source.with_extension("");
    let mut name = stem.into_os_string();
    name.push("-cropped.pdf");
    PathBuf::from(name)
}
