mod centroid_tracker;
mod detection;
mod matching;
mod rect;
mod track;

pub use centroid_tracker::{CentroidTracker, TrackerConfig};
pub use detection::{Detection, VehicleClass};
pub use matching::{centroid_distance, AssignmentResult, GreedyMatcher, HungarianMatcher, Matcher};
pub use rect::Rect;
pub use track::{PositionSample, Track, TrackSnapshot};
