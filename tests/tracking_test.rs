use speedtrack_rs::tracker::{CentroidTracker, Detection, Rect, TrackerConfig, VehicleClass};

fn det(x: f32, y: f32, w: f32, h: f32) -> Detection {
    Detection::new(Rect::new(x, y, w, h), VehicleClass::Car, 0.9)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = CentroidTracker::new(TrackerConfig::default());

    // Frame 1: one detection registers track 0
    let tracks = tracker.update(&[det(100.0, 100.0, 100.0, 100.0)], 0.0);
    assert_eq!(tracks.len(), 1);
    let id = tracks[0].id;
    assert_eq!(id, 0);

    // Frame 2: same object moved slightly; id persists
    let tracks = tracker.update(&[det(105.0, 105.0, 100.0, 100.0)], 1.0 / 30.0);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, id);

    // Frame 3: object missing; track survives with a disappearance mark
    let tracks = tracker.update(&[], 2.0 / 30.0);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, id);

    // Frame 4: object back near its last position; same identity
    let tracks = tracker.update(&[det(110.0, 110.0, 100.0, 100.0)], 3.0 / 30.0);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, id);
}

#[test]
fn test_update_and_register_in_one_frame() {
    // Tracks at (125,115) and (325,115); next frame one detection close
    // to track 0 and one far beyond the gate from track 1.
    let mut tracker = CentroidTracker::new(TrackerConfig {
        max_distance: 150.0,
        ..TrackerConfig::default()
    });

    let tracks = tracker.update(
        &[det(100.0, 100.0, 50.0, 30.0), det(300.0, 100.0, 50.0, 30.0)],
        0.0,
    );
    assert_eq!(tracks.len(), 2);

    let tracks = tracker.update(
        &[det(105.0, 87.0, 50.0, 30.0), det(500.0, 500.0, 50.0, 30.0)],
        1.0 / 30.0,
    );
    assert_eq!(tracks.len(), 3);

    // Track 0 updated in place
    assert_eq!(tracks[0].id, 0);
    assert!((tracks[0].centroid.x - 130.0).abs() < 1e-5);
    assert!((tracks[0].centroid.y - 102.0).abs() < 1e-5);
    assert_eq!(tracks[0].history.len(), 2);

    // Track 1 unmatched: unchanged position, one frame of disappearance
    assert_eq!(tracks[1].id, 1);
    assert!((tracks[1].centroid.x - 325.0).abs() < 1e-5);
    assert_eq!(tracks[1].history.len(), 1);

    // The far detection registered as track 2
    assert_eq!(tracks[2].id, 2);
    assert!((tracks[2].centroid.x - 525.0).abs() < 1e-5);
    assert!((tracks[2].centroid.y - 515.0).abs() < 1e-5);
}

#[test]
fn test_lost_track_gets_new_id_on_return() {
    let mut tracker = CentroidTracker::new(TrackerConfig {
        max_disappeared: 2,
        ..TrackerConfig::default()
    });

    tracker.update(&[det(100.0, 100.0, 50.0, 50.0)], 0.0);
    for frame in 1..=3 {
        tracker.update(&[], frame as f64 / 30.0);
    }
    assert!(tracker.is_empty());

    // Identity is never recovered after deregistration.
    let tracks = tracker.update(&[det(100.0, 100.0, 50.0, 50.0)], 4.0 / 30.0);
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, 1);
}

#[test]
fn test_two_vehicles_keep_identities_while_converging() {
    let mut tracker = CentroidTracker::new(TrackerConfig::default());

    // Two vehicles approach on parallel paths, each moving 20px/frame.
    let mut left = 100.0_f32;
    let mut right = 700.0_f32;
    tracker.update(
        &[det(left, 100.0, 50.0, 50.0), det(right, 200.0, 50.0, 50.0)],
        0.0,
    );
    for frame in 1..=10 {
        left += 20.0;
        right -= 20.0;
        let tracks = tracker.update(
            &[det(left, 100.0, 50.0, 50.0), det(right, 200.0, 50.0, 50.0)],
            frame as f64 / 30.0,
        );
        assert_eq!(tracks.len(), 2);
        // Motion is well under the gate, so ids must never swap.
        assert!((tracks[0].centroid.y - 125.0).abs() < 1e-5);
        assert!((tracks[1].centroid.y - 225.0).abs() < 1e-5);
    }
}
