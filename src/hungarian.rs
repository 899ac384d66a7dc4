//! Hungarian algorithm for optimal detection-to-track assignment

use ndarray::ArrayView2;
use pathfinding::prelude::{kuhn_munkres_min, Matrix};

/// Scale factor for converting float costs to the integer weights
/// the assignment solver works on
const COST_SCALE: f32 = 1_000_000.0;

/// Result of the assignment solve
#[derive(Debug, Clone)]
pub struct AssignmentResult {
    /// Accepted assignments as (track_idx, detection_idx) pairs
    pub assignments: Vec<(usize, usize)>,
    /// Indices of tracks left without a detection
    pub unassigned_tracks: Vec<usize>,
    /// Indices of detections left without a track
    pub unassigned_detections: Vec<usize>,
    /// Summed cost of the accepted assignments
    pub total_cost: f32,
}

/// Minimum-cost assignment solver
pub struct HungarianSolver;

impl HungarianSolver {
    /// Solve the assignment problem over a cost matrix
    ///
    /// # Arguments
    /// * `cost_matrix` - cost_matrix\[\[i, j\]\] is the cost of assigning track i to detection j
    /// * `threshold` - pairings with cost >= threshold are rejected after the solve
    ///
    /// # Returns
    /// AssignmentResult with the globally cost-minimal accepted pairs and the
    /// unassigned indices on both sides
    pub fn solve(cost_matrix: ArrayView2<f32>, threshold: f32) -> AssignmentResult {
        let num_tracks = cost_matrix.nrows();
        let num_detections = cost_matrix.ncols();

        if num_tracks == 0 || num_detections == 0 {
            return AssignmentResult {
                assignments: Vec::new(),
                unassigned_tracks: (0..num_tracks).collect(),
                unassigned_detections: (0..num_detections).collect(),
                total_cost: 0.0,
            };
        }

        // kuhn_munkres requires rows <= columns; pad to a square matrix with
        // expensive dummy entries so either side can stay unmatched
        let size = num_tracks.max(num_detections);
        let dummy_cost = COST_SCALE as i64 * 100;
        let mut int_cost_matrix = Matrix::new(size, size, dummy_cost);

        for i in 0..num_tracks {
            for j in 0..num_detections {
                int_cost_matrix[(i, j)] = (cost_matrix[[i, j]] * COST_SCALE) as i64;
            }
        }

        let (_, raw_assignments) = kuhn_munkres_min(&int_cost_matrix);

        // Keep real pairs below the threshold; everything matched to a dummy
        // row/column or gated out stays unassigned
        let mut assignments = Vec::new();
        let mut assigned_tracks = vec![false; num_tracks];
        let mut assigned_detections = vec![false; num_detections];
        let mut total_cost = 0.0;

        for (track_idx, &det_idx) in raw_assignments.iter().enumerate() {
            if track_idx < num_tracks && det_idx < num_detections {
                let cost = cost_matrix[[track_idx, det_idx]];
                if cost < threshold {
                    assignments.push((track_idx, det_idx));
                    assigned_tracks[track_idx] = true;
                    assigned_detections[det_idx] = true;
                    total_cost += cost;
                }
            }
        }

        let unassigned_tracks = (0..num_tracks).filter(|&i| !assigned_tracks[i]).collect();
        let unassigned_detections = (0..num_detections)
            .filter(|&j| !assigned_detections[j])
            .collect();

        AssignmentResult {
            assignments,
            unassigned_tracks,
            unassigned_detections,
            total_cost,
        }
    }

    /// Solve the assignment problem with an IoU matrix
    ///
    /// # Arguments
    /// * `iou_matrix` - iou_matrix\[\[i, j\]\] is the IoU between track i and detection j
    /// * `iou_threshold` - a pairing is accepted only when its IoU exceeds this
    ///
    /// # Returns
    /// AssignmentResult with assignments maximizing total overlap
    pub fn solve_iou(iou_matrix: ArrayView2<f32>, iou_threshold: f32) -> AssignmentResult {
        // Convert IoU to cost (higher IoU = lower cost)
        let cost_matrix = iou_matrix.mapv(|iou| 1.0 - iou);
        let cost_threshold = 1.0 - iou_threshold;

        Self::solve(cost_matrix.view(), cost_threshold)
    }
}
