//! Assignment of detections to existing tracks.

use nalgebra::Point2;
use ndarray::Array2;

/// Cost assigned to padding cells when squaring the matrix for the solver.
const PADDING_COST: f64 = 1e6;

/// Result of one assignment round. Indices are row (track) and column
/// (detection) positions in the cost matrix.
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    fn empty(num_tracks: usize, num_detections: usize) -> Self {
        Self {
            matches: vec![],
            unmatched_tracks: (0..num_tracks).collect(),
            unmatched_detections: (0..num_detections).collect(),
        }
    }
}

/// Build the (tracks x detections) matrix of Euclidean centroid distances.
pub fn centroid_distance(tracks: &[Point2<f32>], detections: &[Point2<f32>]) -> Array2<f32> {
    let mut dists = Array2::zeros((tracks.len(), detections.len()));
    for (i, t) in tracks.iter().enumerate() {
        for (j, d) in detections.iter().enumerate() {
            dists[[i, j]] = nalgebra::distance(t, d);
        }
    }
    dists
}

/// One-to-one assignment strategy over a cost matrix.
///
/// Pairs whose cost is not strictly below `gate` are rejected as
/// non-matches even when the underlying solver proposed them.
pub trait Matcher {
    fn assign(&self, cost_matrix: &Array2<f32>, gate: f32) -> AssignmentResult;
}

/// Minimum-total-cost assignment via the Jonker-Volgenant solver.
///
/// This is the canonical strategy; [`GreedyMatcher`] exists as an explicit
/// fallback with the same interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianMatcher;

impl Matcher for HungarianMatcher {
    fn assign(&self, cost_matrix: &Array2<f32>, gate: f32) -> AssignmentResult {
        let (num_rows, num_cols) = cost_matrix.dim();
        if num_rows == 0 || num_cols == 0 {
            return AssignmentResult::empty(num_rows, num_cols);
        }

        // lapjv wants a square matrix; pad with a cost no real pair can reach.
        let size = num_rows.max(num_cols);
        let mut padded = Array2::<f64>::from_elem((size, size), PADDING_COST);
        for i in 0..num_rows {
            for j in 0..num_cols {
                padded[[i, j]] = cost_matrix[[i, j]] as f64;
            }
        }

        let mut matches = vec![];
        let mut unmatched_tracks = vec![];
        let mut unmatched_detections_mask = vec![true; num_cols];

        match lapjv::lapjv(&padded) {
            Ok((row_to_col, _)) => {
                for (row_idx, &col_idx) in row_to_col.iter().enumerate() {
                    if row_idx >= num_rows {
                        continue;
                    }
                    if col_idx >= num_cols {
                        unmatched_tracks.push(row_idx);
                    } else if cost_matrix[[row_idx, col_idx]] < gate {
                        matches.push((row_idx, col_idx));
                        unmatched_detections_mask[col_idx] = false;
                    } else {
                        unmatched_tracks.push(row_idx);
                    }
                }
            }
            Err(_) => {
                unmatched_tracks = (0..num_rows).collect();
            }
        }

        let unmatched_detections = unmatched_detections_mask
            .iter()
            .enumerate()
            .filter_map(|(j, &open)| open.then_some(j))
            .collect();

        AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        }
    }
}

/// Greedy nearest-pair assignment.
///
/// Repeatedly takes the globally cheapest remaining pair below the gate.
/// Not optimal in total cost, but deterministic and solver-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatcher;

impl Matcher for GreedyMatcher {
    fn assign(&self, cost_matrix: &Array2<f32>, gate: f32) -> AssignmentResult {
        let (num_rows, num_cols) = cost_matrix.dim();
        if num_rows == 0 || num_cols == 0 {
            return AssignmentResult::empty(num_rows, num_cols);
        }

        let mut working = cost_matrix.clone();
        let mut matches = vec![];
        let mut row_open = vec![true; num_rows];
        let mut col_open = vec![true; num_cols];

        for _ in 0..num_rows.min(num_cols) {
            let mut best = f32::INFINITY;
            let mut best_idx = None;
            for i in 0..num_rows {
                for j in 0..num_cols {
                    if working[[i, j]] < best {
                        best = working[[i, j]];
                        best_idx = Some((i, j));
                    }
                }
            }
            let Some((i, j)) = best_idx else { break };
            if best >= gate {
                break;
            }
            matches.push((i, j));
            row_open[i] = false;
            col_open[j] = false;
            for jj in 0..num_cols {
                working[[i, jj]] = f32::INFINITY;
            }
            for ii in 0..num_rows {
                working[[ii, j]] = f32::INFINITY;
            }
        }

        matches.sort_unstable();
        AssignmentResult {
            matches,
            unmatched_tracks: (0..num_rows).filter(|&i| row_open[i]).collect(),
            unmatched_detections: (0..num_cols).filter(|&j| col_open[j]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f32, f32)]) -> Vec<Point2<f32>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_centroid_distance() {
        let tracks = points(&[(0.0, 0.0)]);
        let dets = points(&[(3.0, 4.0)]);
        let d = centroid_distance(&tracks, &dets);
        assert!((d[[0, 0]] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_hungarian_prefers_total_cost() {
        // Greedy would pair track 0 with det 0 (cost 1) forcing track 1 to
        // det 1 at cost 10 (total 11); optimal pairs crosswise for total 4.
        let mut costs = Array2::zeros((2, 2));
        costs[[0, 0]] = 1.0;
        costs[[0, 1]] = 2.0;
        costs[[1, 0]] = 2.0;
        costs[[1, 1]] = 10.0;
        let result = HungarianMatcher.assign(&costs, 100.0);
        let mut matches = result.matches.clone();
        matches.sort_unstable();
        assert_eq!(matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_gate_is_strict() {
        let mut costs = Array2::zeros((1, 1));
        costs[[0, 0]] = 50.0;
        for matcher in [&HungarianMatcher as &dyn Matcher, &GreedyMatcher] {
            let result = matcher.assign(&costs, 50.0);
            assert!(result.matches.is_empty());
            assert_eq!(result.unmatched_tracks, vec![0]);
            assert_eq!(result.unmatched_detections, vec![0]);

            let result = matcher.assign(&costs, 50.1);
            assert_eq!(result.matches, vec![(0, 0)]);
        }
    }

    #[test]
    fn test_empty_dimensions() {
        let costs = Array2::<f32>::zeros((0, 3));
        let result = HungarianMatcher.assign(&costs, 100.0);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1, 2]);

        let costs = Array2::<f32>::zeros((2, 0));
        let result = GreedyMatcher.assign(&costs, 100.0);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
    }

    #[test]
    fn test_matchers_agree_on_unambiguous_geometry() {
        let tracks = points(&[(100.0, 100.0), (400.0, 100.0)]);
        let dets = points(&[(402.0, 101.0), (101.0, 99.0)]);
        let costs = centroid_distance(&tracks, &dets);
        let optimal = HungarianMatcher.assign(&costs, 150.0);
        let greedy = GreedyMatcher.assign(&costs, 150.0);
        let mut a = optimal.matches.clone();
        let mut b = greedy.matches.clone();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        assert_eq!(a, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_extra_detections_register_as_unmatched() {
        let tracks = points(&[(100.0, 100.0)]);
        let dets = points(&[(101.0, 100.0), (500.0, 500.0)]);
        let costs = centroid_distance(&tracks, &dets);
        let result = HungarianMatcher.assign(&costs, 150.0);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }
}
