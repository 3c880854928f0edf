//! Per-camera configuration.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Static configuration for one camera instance.
///
/// Calibration (`meters_per_pixel`) and the posted limit are supplied per
/// camera and treated as trusted input; [`CameraConfig::validate`] only
/// enforces basic numeric sanity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera identifier, e.g. "CAM-1".
    pub camera_id: String,
    /// Human-readable camera name.
    pub name: String,
    /// Deployment location description.
    pub location: String,
    /// Posted speed limit in mph.
    pub speed_limit_mph: f32,
    /// Real-world meters covered by one pixel at the enforcement distance.
    pub meters_per_pixel: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera_id: "CAM-0".to_string(),
            name: "Unnamed camera".to_string(),
            location: "Unknown".to_string(),
            speed_limit_mph: 30.0,
            meters_per_pixel: 0.05,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.meters_per_pixel.is_finite() && self.meters_per_pixel > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "meters_per_pixel must be positive and finite, got {}",
                self.meters_per_pixel
            )));
        }
        if !(self.speed_limit_mph.is_finite() && self.speed_limit_mph > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "speed_limit_mph must be positive and finite, got {}",
                self.speed_limit_mph
            )));
        }
        if self.camera_id.is_empty() {
            return Err(Error::InvalidConfig("camera_id must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_calibration() {
        let config = CameraConfig {
            meters_per_pixel: 0.0,
            ..CameraConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CameraConfig {
            meters_per_pixel: f32::NAN,
            ..CameraConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_limit() {
        let config = CameraConfig {
            speed_limit_mph: -5.0,
            ..CameraConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CameraConfig {
            camera_id: "CAM-2".into(),
            name: "Wall Street".into(),
            location: "Wall Street, Manhattan".into(),
            speed_limit_mph: 30.0,
            meters_per_pixel: 0.042,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CameraConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.camera_id, "CAM-2");
        assert!((back.meters_per_pixel - 0.042).abs() < 1e-6);
    }
}
