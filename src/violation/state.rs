//! Per-vehicle decision state.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::tracker::Rect;

/// Classification of a vehicle's smoothed speed against the posted limit.
///
/// Re-derived every frame; a vehicle moves freely between bands as its
/// speed changes. Only the fact of having violated and the plate stick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Band {
    #[default]
    Ok,
    Warning,
    Violation,
}

impl Band {
    /// Band for a given overage (smoothed speed minus limit).
    pub fn from_overage(mph_over: f32, min_over: f32) -> Self {
        if mph_over <= 0.0 {
            Band::Ok
        } else if mph_over < min_over {
            Band::Warning
        } else {
            Band::Violation
        }
    }
}

/// A plate identifier attached to a vehicle.
///
/// `Synthesized` marks the deterministic fallback generated from the track
/// id after the OCR budget ran out; its confidence is always 0 and
/// downstream consumers must branch on the variant, never on mere string
/// presence. Once pinned a plate is never reassigned, even if a later read
/// would be more confident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Plate {
    /// Genuine OCR read that cleared the acceptance floor.
    Recognized { text: String, confidence: f32 },
    /// Deterministic placeholder derived from the track id.
    Synthesized { text: String },
}

impl Plate {
    pub fn text(&self) -> &str {
        match self {
            Plate::Recognized { text, .. } => text,
            Plate::Synthesized { text } => text,
        }
    }

    pub fn confidence(&self) -> f32 {
        match self {
            Plate::Recognized { confidence, .. } => *confidence,
            Plate::Synthesized { .. } => 0.0,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, Plate::Synthesized { .. })
    }
}

/// Decision state for one tracked vehicle, keyed by track id.
///
/// Created lazily on first observation, destroyed with the track.
#[derive(Debug, Clone)]
pub struct VehicleState {
    speeds: VecDeque<f32>,
    queue_len: usize,
    /// Pinned plate, write-once.
    pub plate: Option<Plate>,
    /// OCR attempts spent so far, successful or not.
    pub ocr_attempts: u32,
    /// Band as of the most recent evaluation.
    pub band: Band,
    /// One-way latch, set when this vehicle's violation is emitted.
    pub has_violated: bool,
    /// Bounding box used for the most recent evaluation.
    pub last_bbox: Rect,
}

impl VehicleState {
    pub fn new(queue_len: usize) -> Self {
        Self {
            speeds: VecDeque::with_capacity(queue_len),
            queue_len,
            plate: None,
            ocr_attempts: 0,
            band: Band::Ok,
            has_violated: false,
            last_bbox: Rect::default(),
        }
    }

    /// Push a raw speed reading, evicting the oldest past the cap.
    ///
    /// Zero readings count: a vehicle that stops mid-window is pulled back
    /// toward 0 rather than excluded.
    pub fn push_speed(&mut self, mph: f32) {
        self.speeds.push_back(mph);
        while self.speeds.len() > self.queue_len {
            self.speeds.pop_front();
        }
    }

    /// Arithmetic mean of the reading queue, zeros included.
    pub fn smoothed_speed(&self) -> f32 {
        if self.speeds.is_empty() {
            return 0.0;
        }
        self.speeds.iter().sum::<f32>() / self.speeds.len() as f32
    }

    /// Non-zero readings currently in the queue.
    pub fn nonzero_readings(&self) -> usize {
        self.speeds.iter().filter(|&&s| s > 0.0).count()
    }

    pub fn readings(&self) -> usize {
        self.speeds.len()
    }
}
