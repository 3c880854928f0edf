//! Frame-by-frame violation decisions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::tracker::Rect;
use crate::violation::severity::{pick_violation_code, ViolationCode};
use crate::violation::state::{Band, Plate, VehicleState};

/// Configuration for the violation decision engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Posted speed limit in mph.
    pub speed_limit_mph: f32,
    /// Overage at or above which a vehicle is in the Violation band.
    pub min_over_mph: f32,
    /// OCR attempt budget per vehicle.
    pub max_ocr_attempts: u32,
    /// Acceptance floor applied to OCR reads, independent of whatever
    /// floor the OCR engine uses internally.
    pub min_plate_confidence: f32,
    /// Non-zero speed readings required before a violation can be emitted.
    pub min_speed_samples: usize,
    /// Violations emitted per session before the engine stops.
    pub max_violations: usize,
    /// Cap on the per-vehicle speed reading queue.
    pub speed_queue_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_limit_mph: 30.0,
            min_over_mph: 5.0,
            max_ocr_attempts: 5,
            min_plate_confidence: 0.3,
            min_speed_samples: 3,
            max_violations: 5,
            speed_queue_len: 10,
        }
    }
}

/// A candidate plate read from the OCR collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateCandidate {
    pub text: String,
    pub confidence: f32,
}

/// Outcome of this frame's plate acquisition step for one vehicle.
///
/// `Attempted(None)` still burns an attempt: the budget counts calls to
/// the collaborator, not successful reads.
#[derive(Debug, Clone, PartialEq)]
pub enum PlateObservation {
    NotAttempted,
    Attempted(Option<PlateCandidate>),
}

/// What the pipeline observed about one vehicle this frame.
#[derive(Debug, Clone)]
pub struct VehicleObservation {
    pub track_id: u32,
    pub bbox: Rect,
    /// Raw speed estimate for this frame in mph.
    pub raw_speed_mph: f32,
    pub plate: PlateObservation,
    /// Frame timestamp in seconds.
    pub timestamp: f64,
}

/// Emitted violation record. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub track_id: u32,
    pub plate: Plate,
    /// Smoothed speed at emission, rounded to 0.1 mph.
    pub speed_mph: f32,
    pub speed_limit_mph: f32,
    /// Speed minus limit, rounded to 0.1 mph.
    pub mph_over: f32,
    pub code: ViolationCode,
    pub points: u8,
    pub bbox: Rect,
    pub timestamp: f64,
}

/// Per-session violation decision engine.
///
/// Owns per-vehicle state keyed by track id plus the session capture set.
/// Never raises for collaborator unavailability: a frame without a plate
/// read simply retries next frame within the attempt budget.
pub struct ViolationEngine {
    config: EngineConfig,
    vehicles: HashMap<u32, VehicleState>,
    captured_plates: HashSet<String>,
    violations_captured: usize,
}

impl ViolationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            vehicles: HashMap::new(),
            captured_plates: HashSet::new(),
            violations_captured: 0,
        }
    }

    /// Whether the pipeline should spend an OCR call on this vehicle
    /// this frame.
    pub fn wants_plate_read(&self, track_id: u32) -> bool {
        match self.vehicles.get(&track_id) {
            Some(state) => {
                state.plate.is_none() && state.ocr_attempts < self.config.max_ocr_attempts
            }
            // First observation of this track: budget untouched.
            None => true,
        }
    }

    /// Feed one vehicle observation and return a violation record if this
    /// is the frame the vehicle's one-shot emission fires.
    pub fn observe(&mut self, obs: VehicleObservation) -> Option<ViolationRecord> {
        let config = self.config.clone();
        let state = self
            .vehicles
            .entry(obs.track_id)
            .or_insert_with(|| VehicleState::new(config.speed_queue_len));

        state.last_bbox = obs.bbox;
        state.push_speed(obs.raw_speed_mph);
        let smoothed = state.smoothed_speed();

        // Plate acquisition: every attempt counts against the budget,
        // whether or not it produced a read.
        if state.plate.is_none() && state.ocr_attempts < config.max_ocr_attempts {
            if let PlateObservation::Attempted(candidate) = &obs.plate {
                state.ocr_attempts += 1;
                match candidate {
                    Some(read) if read.confidence >= config.min_plate_confidence => {
                        info!(
                            track_id = obs.track_id,
                            plate = %read.text,
                            confidence = read.confidence,
                            "plate pinned"
                        );
                        state.plate = Some(Plate::Recognized {
                            text: read.text.clone(),
                            confidence: read.confidence,
                        });
                    }
                    Some(read) => {
                        debug!(
                            track_id = obs.track_id,
                            confidence = read.confidence,
                            "plate read below acceptance floor"
                        );
                    }
                    None => {
                        debug!(track_id = obs.track_id, "no plate read this frame");
                    }
                }
            }
        }

        let over = smoothed - config.speed_limit_mph;
        state.band = Band::from_overage(over, config.min_over_mph);

        // Fallback plate: budget exhausted, still unidentified, and the
        // vehicle is currently violating. Deterministic from the track id
        // so a violation always carries some identifier.
        if state.band == Band::Violation
            && state.plate.is_none()
            && state.ocr_attempts >= config.max_ocr_attempts
        {
            let text = format!("NY{:05}", obs.track_id);
            info!(track_id = obs.track_id, plate = %text, "OCR exhausted, using fallback plate");
            state.plate = Some(Plate::Synthesized { text });
        }

        // Session cap: emission is done for this session, though vehicle
        // state keeps updating above.
        if self.violations_captured >= config.max_violations {
            return None;
        }

        if state.band != Band::Violation || state.has_violated {
            return None;
        }
        if state.nonzero_readings() < config.min_speed_samples {
            return None;
        }
        let plate = state.plate.clone()?;
        if self.captured_plates.contains(plate.text()) {
            return None;
        }

        state.has_violated = true;
        self.captured_plates.insert(plate.text().to_string());
        self.violations_captured += 1;

        let code = pick_violation_code(over);
        let record = ViolationRecord {
            track_id: obs.track_id,
            speed_mph: round_tenth(smoothed),
            speed_limit_mph: config.speed_limit_mph,
            mph_over: round_tenth(over),
            code,
            points: code.points(),
            bbox: obs.bbox,
            timestamp: obs.timestamp,
            plate,
        };

        info!(
            track_id = record.track_id,
            plate = %record.plate.text(),
            speed_mph = record.speed_mph,
            limit = record.speed_limit_mph,
            code = %record.code,
            captured = self.violations_captured,
            "violation captured"
        );

        Some(record)
    }

    /// Drop per-vehicle state for tracks that no longer exist. The session
    /// capture set is untouched.
    pub fn prune_inactive(&mut self, active_ids: &[u32]) {
        self.vehicles
            .retain(|id, _| active_ids.binary_search(id).is_ok());
    }

    /// State for one vehicle, if it has been observed.
    pub fn vehicle(&self, track_id: u32) -> Option<&VehicleState> {
        self.vehicles.get(&track_id)
    }

    pub fn violations_captured(&self) -> usize {
        self.violations_captured
    }

    /// True once the session emission cap has been reached.
    pub fn session_exhausted(&self) -> bool {
        self.violations_captured >= self.config.max_violations
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn round_tenth(x: f32) -> f32 {
    (x * 10.0).round() / 10.0
}
