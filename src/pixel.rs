use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Geographic bounds of an image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            lon_min: -122.65,
            lon_max: -120.95,
            lat_min: 47.025,
            lat_max: 47.87,
        }
    }
}

/// Image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
        }
    }
}

impl Frame {
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("longitude", self.lon_min, self.lon_max),
            ("latitude", self.lat_min, self.lat_max),
        ];
        for (axis, lo, hi) in ranges {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(GeoError::InvalidInput(format!(
                    "{axis} range must be finite, but is [{lo}, {hi}]"
                )));
            }
            if lo >= hi {
                return Err(GeoError::InvalidInput(format!(
                    "{axis} range must be non-empty, but is [{lo}, {hi}]"
                )));
            }
        }
        Ok(())
    }

    /// Map a coordinate to `(x, y)` pixel coordinates of an image covering
    /// this frame. The y axis points down, so `lat_max` maps to row 0.
    pub fn to_pixel(&self, lon: f64, lat: f64, size: ImageSize) -> (f64, f64) {
        let px = (lon - self.lon_min) / (self.lon_max - self.lon_min);
        let py = 1.0 - (lat - self.lat_min) / (self.lat_max - self.lat_min);
        (px * size.width as f64, py * size.height as f64)
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.lon_min..=self.lon_max).contains(&lon) && (self.lat_min..=self.lat_max).contains(&lat)
    }
}
