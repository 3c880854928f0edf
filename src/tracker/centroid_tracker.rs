//! Centroid tracker: stable vehicle identities across frames.

use std::collections::BTreeMap;

use tracing::debug;

use crate::tracker::detection::Detection;
use crate::tracker::matching::{centroid_distance, HungarianMatcher, Matcher};
use crate::tracker::track::{Track, TrackSnapshot};

/// Configuration for the centroid tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Frames a track may go unmatched before it is dropped for good.
    pub max_disappeared: u32,
    /// Gate on centroid distance: only strictly closer pairs can match.
    pub max_distance: f32,
    /// Bound on per-track position history.
    pub history_len: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_disappeared: 30,
            max_distance: 150.0,
            history_len: 30,
        }
    }
}

/// Tracks vehicles across frames by matching detection centroids to known
/// track centroids with a minimum-total-cost assignment.
///
/// Ids are assigned monotonically per tracker instance and never reused.
/// A deregistered identity is gone; a vehicle that reappears is a new track.
pub struct CentroidTracker {
    config: TrackerConfig,
    matcher: Box<dyn Matcher + Send>,
    tracks: BTreeMap<u32, Track>,
    next_id: u32,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_matcher(config, Box::new(HungarianMatcher))
    }

    /// Use an alternative assignment strategy (e.g. [`GreedyMatcher`]).
    ///
    /// [`GreedyMatcher`]: crate::tracker::GreedyMatcher
    pub fn with_matcher(config: TrackerConfig, matcher: Box<dyn Matcher + Send>) -> Self {
        Self {
            config,
            matcher,
            tracks: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Ingest one frame of detections and return the active tracks, in
    /// id order.
    pub fn update(&mut self, detections: &[Detection], timestamp: f64) -> Vec<TrackSnapshot> {
        if detections.is_empty() {
            self.age_all();
            return self.snapshots();
        }

        if self.tracks.is_empty() {
            for det in detections {
                self.register(det, timestamp);
            }
            return self.snapshots();
        }

        let ids: Vec<u32> = self.tracks.keys().copied().collect();
        let track_centroids: Vec<_> = ids.iter().map(|id| self.tracks[id].centroid).collect();
        let det_centroids: Vec<_> = detections.iter().map(|d| d.bbox.centroid()).collect();

        let costs = centroid_distance(&track_centroids, &det_centroids);
        let assignment = self.matcher.assign(&costs, self.config.max_distance);

        for (row, col) in &assignment.matches {
            let track = self
                .tracks
                .get_mut(&ids[*row])
                .expect("matched row refers to a live track");
            track.observe(detections[*col].bbox, timestamp);
        }

        for row in &assignment.unmatched_tracks {
            let id = ids[*row];
            let missed = self
                .tracks
                .get_mut(&id)
                .expect("unmatched row refers to a live track")
                .miss();
            if missed > self.config.max_disappeared {
                self.deregister(id);
            }
        }

        for col in &assignment.unmatched_detections {
            self.register(&detections[*col], timestamp);
        }

        self.snapshots()
    }

    /// Number of live tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Ids of all live tracks, ascending.
    pub fn active_ids(&self) -> Vec<u32> {
        self.tracks.keys().copied().collect()
    }

    fn register(&mut self, detection: &Detection, timestamp: f64) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.tracks.insert(
            id,
            Track::new(id, detection.bbox, timestamp, self.config.history_len),
        );
        debug!(track_id = id, class = detection.class.as_str(), "registered track");
        id
    }

    fn deregister(&mut self, id: u32) {
        self.tracks.remove(&id);
        debug!(track_id = id, "deregistered track");
    }

    fn age_all(&mut self) {
        let expired: Vec<u32> = self
            .tracks
            .values_mut()
            .filter_map(|t| (t.miss() > self.config.max_disappeared).then_some(t.id))
            .collect();
        for id in expired {
            self.deregister(id);
        }
    }

    fn snapshots(&self) -> Vec<TrackSnapshot> {
        self.tracks.values().map(Track::snapshot).collect()
    }
}
