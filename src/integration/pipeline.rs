//! Per-frame orchestration of tracking, speed estimation and violation
//! decisions for one camera.

use std::collections::VecDeque;
use std::fmt;

use tracing::{info, warn};

use crate::config::CameraConfig;
use crate::error::Error;
use crate::speed::{SpeedConfig, SpeedEstimator};
use crate::tracker::{CentroidTracker, Detection, Rect, TrackSnapshot, TrackerConfig};
use crate::violation::{
    Band, EngineConfig, PlateObservation, VehicleObservation, ViolationEngine, ViolationRecord,
};

use super::detector::DetectionSource;
use super::ocr::PlateReader;
use super::sink::{ViolationNotice, ViolationSink};

/// How many per-frame summaries the live-view buffer retains.
const DEFAULT_RECENT_CAPACITY: usize = 50;

/// Full configuration for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub camera: CameraConfig,
    pub tracker: TrackerConfig,
    pub speed: SpeedConfig,
    pub engine: EngineConfig,
    /// Capacity of the recent-frames buffer.
    pub recent_capacity: usize,
}

impl PipelineConfig {
    /// Default tracker/speed/engine settings with the camera's calibration
    /// and posted limit applied where they belong.
    pub fn for_camera(camera: CameraConfig) -> Self {
        let speed = SpeedConfig {
            meters_per_pixel: camera.meters_per_pixel,
            ..SpeedConfig::default()
        };
        let engine = EngineConfig {
            speed_limit_mph: camera.speed_limit_mph,
            ..EngineConfig::default()
        };
        Self {
            camera,
            tracker: TrackerConfig::default(),
            speed,
            engine,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

/// One vehicle's evaluation in a frame summary.
#[derive(Debug, Clone)]
pub struct VehicleSummary {
    pub track_id: u32,
    pub bbox: Rect,
    pub smoothed_speed_mph: f32,
    pub band: Band,
}

/// Compact record of one processed frame, kept in the recent-frames buffer.
#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub frame_index: u64,
    pub timestamp: f64,
    pub vehicles: Vec<VehicleSummary>,
}

/// Everything the caller gets back from one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_index: u64,
    pub timestamp: f64,
    pub tracks: Vec<TrackSnapshot>,
    pub violations: Vec<ViolationRecord>,
}

/// One raw frame handed to [`VehiclePipeline::run`].
#[derive(Debug, Clone)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Source of frames for a session run.
///
/// `Ok(None)` is a clean end of stream. Errors returned here are the one
/// fatal failure mode of a session: a stream that cannot be read aborts
/// the run with a clear reason, while everything downstream of frame
/// acquisition degrades instead of failing.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, Error>;
}

/// End-of-session totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub frames_processed: u64,
    pub violations_captured: usize,
}

/// Single-camera enforcement pipeline.
///
/// Owns one instance of each core component; strictly frame-sequential.
/// Runs concurrently with other cameras only as wholly independent
/// instances; nothing here is shared.
pub struct VehiclePipeline<D, R, S> {
    config: PipelineConfig,
    detector: Option<D>,
    plate_reader: Option<R>,
    sink: S,
    tracker: CentroidTracker,
    speed: SpeedEstimator,
    engine: ViolationEngine,
    recent: VecDeque<FrameSummary>,
    frame_index: u64,
    fps: f32,
}

impl<D, R, S> VehiclePipeline<D, R, S>
where
    D: DetectionSource,
    R: PlateReader,
    S: ViolationSink,
    D::Error: fmt::Display,
    R::Error: fmt::Display,
    S::Error: fmt::Display,
{
    /// Build a pipeline. Passing `None` for the detector or plate reader
    /// runs the session with that capability disabled (empty detections /
    /// no plate reads) rather than failing.
    pub fn new(
        config: PipelineConfig,
        detector: Option<D>,
        plate_reader: Option<R>,
        sink: S,
    ) -> Result<Self, Error> {
        config.camera.validate()?;
        if detector.is_none() {
            let err = Error::PerceptionUnavailable("detector".into());
            warn!(camera = %config.camera.camera_id, error = %err, "session will see no vehicles");
        }
        if plate_reader.is_none() {
            let err = Error::PerceptionUnavailable("plate reader".into());
            warn!(camera = %config.camera.camera_id, error = %err, "plate acquisition disabled");
        }
        let fps = config.speed.fps;
        Ok(Self {
            tracker: CentroidTracker::new(config.tracker.clone()),
            speed: SpeedEstimator::new(config.speed.clone()),
            engine: ViolationEngine::new(config.engine.clone()),
            recent: VecDeque::with_capacity(config.recent_capacity),
            config,
            detector,
            plate_reader,
            sink,
            frame_index: 0,
            fps,
        })
    }

    /// Process one frame: detect, track, estimate, decide, publish.
    pub fn process_frame(&mut self, pixels: &[u8], width: u32, height: u32) -> FrameReport {
        self.frame_index += 1;
        let timestamp = self.frame_index as f64 / self.fps as f64;

        let detections = self.detect(pixels, width, height);
        let detections = self.drop_malformed(detections, width, height);

        let tracks = self.tracker.update(&detections, timestamp);
        let active_ids = self.tracker.active_ids();
        self.engine.prune_inactive(&active_ids);

        let mut violations = Vec::new();
        let mut summaries = Vec::with_capacity(tracks.len());

        for track in &tracks {
            let raw_speed = self.speed.estimate_from_history(&track.history);

            let plate = if self.engine.wants_plate_read(track.id) {
                PlateObservation::Attempted(self.try_read_plate(
                    pixels,
                    width,
                    height,
                    track.bbox,
                    track.id,
                ))
            } else {
                PlateObservation::NotAttempted
            };

            let emitted = self.engine.observe(VehicleObservation {
                track_id: track.id,
                bbox: track.bbox,
                raw_speed_mph: raw_speed,
                plate,
                timestamp,
            });

            let state = self
                .engine
                .vehicle(track.id)
                .expect("engine state exists after observe");
            summaries.push(VehicleSummary {
                track_id: track.id,
                bbox: track.bbox,
                smoothed_speed_mph: state.smoothed_speed(),
                band: state.band,
            });

            if let Some(record) = emitted {
                let notice = ViolationNotice {
                    camera_id: &self.config.camera.camera_id,
                    location: &self.config.camera.location,
                    record: &record,
                };
                if let Err(e) = self.sink.publish(&notice) {
                    let err = Error::CollaboratorIo {
                        stage: "notify",
                        message: e.to_string(),
                    };
                    warn!(
                        camera = %self.config.camera.camera_id,
                        plate = %record.plate.text(),
                        error = %err,
                        "violation not published; record kept locally"
                    );
                }
                violations.push(record);
            }
        }

        self.push_summary(FrameSummary {
            frame_index: self.frame_index,
            timestamp,
            vehicles: summaries,
        });

        FrameReport {
            frame_index: self.frame_index,
            timestamp,
            tracks,
            violations,
        }
    }

    /// Drive the pipeline over a whole stream until end-of-stream.
    pub fn run<F: FrameSource>(&mut self, source: &mut F) -> Result<SessionReport, Error> {
        let start_index = self.frame_index;
        while let Some(frame) = source.next_frame()? {
            self.process_frame(&frame.pixels, frame.width, frame.height);
        }
        let report = SessionReport {
            frames_processed: self.frame_index - start_index,
            violations_captured: self.engine.violations_captured(),
        };
        info!(
            camera = %self.config.camera.camera_id,
            frames = report.frames_processed,
            violations = report.violations_captured,
            "session complete"
        );
        Ok(report)
    }

    /// Recent frame summaries, oldest first.
    pub fn recent_frames(&self) -> impl Iterator<Item = &FrameSummary> {
        self.recent.iter()
    }

    /// Update the frame rate from the actual stream; effective next frame.
    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
        self.speed.update_fps(fps);
    }

    pub fn camera(&self) -> &CameraConfig {
        &self.config.camera
    }

    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    pub fn engine(&self) -> &ViolationEngine {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Vec<Detection> {
        match &mut self.detector {
            Some(detector) => match detector.detect(pixels, width, height) {
                Ok(detections) => detections,
                Err(e) => {
                    warn!(
                        camera = %self.config.camera.camera_id,
                        error = %e,
                        "detector failed; treating frame as empty"
                    );
                    vec![]
                }
            },
            None => vec![],
        }
    }

    fn drop_malformed(
        &self,
        detections: Vec<Detection>,
        width: u32,
        height: u32,
    ) -> Vec<Detection> {
        detections
            .into_iter()
            .filter(|det| match det.validate(width, height) {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        camera = %self.config.camera.camera_id,
                        error = %e,
                        "dropping detection"
                    );
                    false
                }
            })
            .collect()
    }

    fn try_read_plate(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        bbox: Rect,
        track_id: u32,
    ) -> Option<crate::violation::PlateCandidate> {
        match &mut self.plate_reader {
            Some(reader) => match reader.read_plate(pixels, width, height, bbox) {
                Ok(candidate) => candidate,
                Err(e) => {
                    let err = Error::CollaboratorIo {
                        stage: "ocr",
                        message: e.to_string(),
                    };
                    warn!(track_id, error = %err, "plate read failed");
                    None
                }
            },
            None => None,
        }
    }

    fn push_summary(&mut self, summary: FrameSummary) {
        self.recent.push_back(summary);
        while self.recent.len() > self.config.recent_capacity {
            self.recent.pop_front();
        }
    }
}
