//! Persistent vehicle identity across frames.

use std::collections::VecDeque;

use nalgebra::Point2;

use crate::tracker::rect::Rect;

/// One (centroid, timestamp) observation in a track's history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    /// Centroid position in pixels
    pub point: Point2<f32>,
    /// Frame timestamp in seconds
    pub timestamp: f64,
}

/// A tracked vehicle.
///
/// Identity is assigned once at registration and never reused. A track that
/// goes unmatched past the tracker's patience is deregistered for good; a
/// vehicle that reappears later gets a fresh id.
#[derive(Debug, Clone)]
pub struct Track {
    /// Unique track identifier
    pub id: u32,
    /// Current centroid in pixels
    pub centroid: Point2<f32>,
    /// Current bounding box
    pub bbox: Rect,
    /// Consecutive frames since the track was last matched
    pub disappeared: u32,
    history: VecDeque<PositionSample>,
    history_cap: usize,
}

impl Track {
    pub fn new(id: u32, bbox: Rect, timestamp: f64, history_cap: usize) -> Self {
        let centroid = bbox.centroid();
        let mut history = VecDeque::with_capacity(history_cap);
        history.push_back(PositionSample {
            point: centroid,
            timestamp,
        });
        Self {
            id,
            centroid,
            bbox,
            disappeared: 0,
            history,
            history_cap,
        }
    }

    /// Record a matched detection: update the current position, reset the
    /// disappearance counter, and append to the bounded history.
    pub fn observe(&mut self, bbox: Rect, timestamp: f64) {
        self.centroid = bbox.centroid();
        self.bbox = bbox;
        self.disappeared = 0;
        self.history.push_back(PositionSample {
            point: self.centroid,
            timestamp,
        });
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
    }

    /// Record an unmatched frame. Returns the new disappearance count.
    pub fn miss(&mut self) -> u32 {
        self.disappeared += 1;
        self.disappeared
    }

    pub fn history(&self) -> impl Iterator<Item = &PositionSample> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Read-only copy of this track's current state.
    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            id: self.id,
            centroid: self.centroid,
            bbox: self.bbox,
            history: self.history.iter().copied().collect(),
        }
    }
}

/// Read-only view of a track returned from [`CentroidTracker::update`].
///
/// [`CentroidTracker::update`]: crate::tracker::CentroidTracker::update
#[derive(Debug, Clone)]
pub struct TrackSnapshot {
    pub id: u32,
    pub centroid: Point2<f32>,
    pub bbox: Rect,
    pub history: Vec<PositionSample>,
}
