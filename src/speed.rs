//! Calibrated speed estimation from pixel displacement.

use nalgebra::Point2;

use crate::tracker::PositionSample;

/// Meters-per-second to miles-per-hour.
pub const MPS_TO_MPH: f32 = 2.23694;

/// Configuration for one camera's speed estimation.
#[derive(Debug, Clone)]
pub struct SpeedConfig {
    /// Real-world meters covered by one pixel.
    pub meters_per_pixel: f32,
    /// Stream frame rate; used when no explicit time delta is available.
    pub fps: f32,
    /// How many recent history samples feed one estimate.
    pub smoothing_window: usize,
    /// Displacements below this many pixels count as no motion at all.
    pub min_movement: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            meters_per_pixel: 0.05,
            fps: 30.0,
            smoothing_window: 5,
            min_movement: 3.0,
        }
    }
}

/// Converts pixel displacement into a real-world speed in mph.
///
/// Calibration is fixed per camera instance; fps follows the actual stream
/// and may be updated between frames. Updates take effect on the next call.
#[derive(Debug, Clone)]
pub struct SpeedEstimator {
    config: SpeedConfig,
}

impl SpeedEstimator {
    pub fn new(config: SpeedConfig) -> Self {
        Self { config }
    }

    /// Speed in mph for one displacement.
    ///
    /// Sub-threshold displacement is defined as no motion and returns
    /// exactly 0, independent of `dt`. A missing or non-positive `dt`
    /// falls back to one frame interval (1/fps).
    pub fn estimate_speed(
        &self,
        previous: Point2<f32>,
        current: Point2<f32>,
        dt: Option<f32>,
    ) -> f32 {
        let pixel_distance = nalgebra::distance(&previous, &current);
        if pixel_distance < self.config.min_movement {
            return 0.0;
        }

        let meters = pixel_distance * self.config.meters_per_pixel;
        let dt = match dt {
            Some(dt) if dt > 0.0 => dt,
            _ => 1.0 / self.config.fps,
        };

        (meters / dt) * MPS_TO_MPH
    }

    /// Speed in mph estimated over a position history.
    ///
    /// Takes the most recent `smoothing_window` samples, computes one speed
    /// per consecutive pair, and returns the median, which shrugs off a
    /// single jittery or dropped frame where a mean would not. Pairs with
    /// non-increasing timestamps are skipped; without at least one valid
    /// pair the estimate is 0.
    pub fn estimate_from_history(&self, history: &[PositionSample]) -> f32 {
        if history.len() < 2 {
            return 0.0;
        }

        let start = history.len().saturating_sub(self.config.smoothing_window);
        let recent = &history[start..];

        let mut speeds = Vec::with_capacity(recent.len() - 1);
        for pair in recent.windows(2) {
            let dt = (pair[1].timestamp - pair[0].timestamp) as f32;
            if dt <= 0.0 {
                continue;
            }
            speeds.push(self.estimate_speed(pair[0].point, pair[1].point, Some(dt)));
        }

        if speeds.is_empty() {
            return 0.0;
        }
        median(&mut speeds)
    }

    /// Replace the calibration constant; effective on the next call.
    pub fn update_calibration(&mut self, meters_per_pixel: f32) {
        self.config.meters_per_pixel = meters_per_pixel;
    }

    /// Replace the frame rate; effective on the next call.
    pub fn update_fps(&mut self, fps: f32) {
        self.config.fps = fps;
    }

    pub fn config(&self) -> &SpeedConfig {
        &self.config
    }

    pub fn mps_to_mph(mps: f32) -> f32 {
        mps * MPS_TO_MPH
    }

    pub fn mph_to_kmh(mph: f32) -> f32 {
        mph * 1.60934
    }
}

fn median(values: &mut [f32]) -> f32 {
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
