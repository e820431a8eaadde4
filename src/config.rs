//! Viewer configuration, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "line_clipping": "liang_barsky", "projection": "perspective" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clipper::LineClipMethod;
use crate::colors;
use crate::error::{Result, ViewError};
use crate::pipeline::Tessellation;
use crate::projection::{ProjectionMode, DEFAULT_DISTANCE};
use crate::tessellate::{DEFAULT_CURVE_PRECISION, DEFAULT_SURFACE_PRECISION, MIN_PRECISION};
use crate::window::{DEFAULT_MIN_SIZE, DEFAULT_ZOOM_FACTOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub window_length: f64,
    pub window_width: f64,
    pub line_clipping: LineClipMethod,
    pub projection: ProjectionMode,
    pub curve_precision: f64,
    pub surface_precision: f64,
    pub zoom_factor: f64,
    pub min_window_size: f64,
    pub projection_distance: f64,
    pub pan_step: f64,
    pub rotate_step: f64,
    /// Half-length of the world axis overlay.
    pub axis_length: f64,
    pub background: u32,
    pub foreground: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            window_length: 800.0,
            window_width: 600.0,
            line_clipping: LineClipMethod::default(),
            projection: ProjectionMode::default(),
            curve_precision: DEFAULT_CURVE_PRECISION,
            surface_precision: DEFAULT_SURFACE_PRECISION,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            min_window_size: DEFAULT_MIN_SIZE,
            projection_distance: DEFAULT_DISTANCE,
            pan_step: 10.0,
            rotate_step: 15.0,
            axis_length: 10_000.0,
            background: colors::BACKGROUND,
            foreground: colors::FOREGROUND,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tessellation(&self) -> Tessellation {
        Tessellation {
            curve_precision: self.curve_precision,
            surface_precision: self.surface_precision,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(ViewError::Validation("viewport must be at least 1x1 pixels".into()));
        }
        if !(self.window_length > 0.0 && self.window_width > 0.0) {
            return Err(ViewError::Validation(format!(
                "window size must be positive, got {}x{}",
                self.window_length, self.window_width
            )));
        }
        for (name, value) in [
            ("curve_precision", self.curve_precision),
            ("surface_precision", self.surface_precision),
        ] {
            if !(MIN_PRECISION..=1.0).contains(&value) {
                return Err(ViewError::Validation(format!(
                    "{} must be in [{}, 1], got {}",
                    name, MIN_PRECISION, value
                )));
            }
        }
        Ok(())
    }
}
