//! Real-time vehicle speed enforcement pipeline.
//!
//! Three tightly coupled components process a stream of per-frame vehicle
//! detections from an external model:
//!
//! - [`tracker`]: stable vehicle identities across frames (centroid
//!   matching with minimum-total-cost assignment)
//! - [`speed`]: calibrated, smoothed real-world speed from pixel motion
//! - [`violation`]: per-vehicle band state, bounded plate acquisition and
//!   one-shot violation emission with tiered severity
//!
//! [`integration`] connects the external collaborators (detector, OCR,
//! downstream consumer) and drives the per-frame control flow for one
//! camera. Each camera stream owns an independent pipeline instance;
//! nothing is shared between instances.

pub mod config;
pub mod error;
pub mod integration;
pub mod speed;
pub mod tracker;
pub mod violation;

pub use config::CameraConfig;
pub use error::Error;
pub use integration::{
    DetectionSource, Frame, FrameReport, FrameSource, PipelineConfig, PlateReader, SessionReport,
    VehiclePipeline, ViolationNotice, ViolationSink,
};
pub use speed::{SpeedConfig, SpeedEstimator};
pub use tracker::{CentroidTracker, Detection, Rect, TrackSnapshot, TrackerConfig, VehicleClass};
pub use violation::{
    pick_violation_code, Band, EngineConfig, Plate, PlateCandidate, ViolationCode, ViolationEngine,
    ViolationRecord,
};
