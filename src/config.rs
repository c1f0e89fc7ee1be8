//! Tunables for the chart surface and its timers.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "POINTDASH_CONFIG";

/// Space reserved around the plot area for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 30.0,
            bottom: 60.0,
            left: 60.0,
        }
    }
}

/// Marker radius for each point style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointRadii {
    pub default: f32,
    pub hovered: f32,
    pub dragged: f32,
}

impl Default for PointRadii {
    fn default() -> Self {
        Self {
            default: 6.0,
            hovered: 8.0,
            dragged: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Smallest surface the chart will lay itself out in.
    pub min_surface: [f32; 2],
    pub margins: Margins,
    /// Allowed range of the view zoom factor.
    pub zoom_extent: [f64; 2],
    /// Factor applied by the zoom-in button (zoom-out uses the reciprocal).
    pub zoom_step: f64,
    /// Wheel sensitivity: zoom factor is `2^(scroll * wheel_zoom_rate)`.
    pub wheel_zoom_rate: f64,
    pub drag_throttle_ms: u64,
    pub add_debounce_ms: u64,
    pub highlight_ms: u64,
    pub radii: PointRadii,
    /// Extra pixels around a marker that still count as a hit.
    pub hit_slop: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_surface: [400.0, 300.0],
            margins: Margins::default(),
            zoom_extent: [0.1, 50.0],
            zoom_step: 1.5,
            wheel_zoom_rate: 0.002,
            drag_throttle_ms: 16,
            add_debounce_ms: 50,
            highlight_ms: 3000,
            radii: PointRadii::default(),
            hit_slop: 2.0,
        }
    }
}

impl DashboardConfig {
    pub fn drag_throttle(&self) -> Duration {
        Duration::from_millis(self.drag_throttle_ms)
    }

    pub fn add_debounce(&self) -> Duration {
        Duration::from_millis(self.add_debounce_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read the file named by [`CONFIG_ENV`], falling back to defaults when
    /// the variable is unset or the file cannot be used.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        let path = std::path::PathBuf::from(path);
        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Ignoring config {:?}: {e}", path);
                Self::default()
            }
        }
    }
}
