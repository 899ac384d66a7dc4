//! Bounding box operations and IoU calculations

use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple bounding box representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox<T = f32> {
    pub xmin: T,
    pub ymin: T,
    pub xmax: T,
    pub ymax: T,
}

impl Bbox<f32> {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f32 {
        (self.xmin + self.xmax) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.ymin + self.ymax) / 2.0
    }
}

impl Bbox<f32> {
    /// Convert to bounds array [xmin, ymin, xmax, ymax]
    pub fn to_bounds(&self) -> [f32; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    /// Convert to measurement format [center_x, center_y, width, height]
    /// Used for Kalman filter state representation
    pub fn to_z(&self) -> [f32; 4] {
        [self.center_x(), self.center_y(), self.width(), self.height()]
    }

    /// Create from measurement format [center_x, center_y, width, height]
    pub fn from_z(z: &[f32; 4]) -> Self {
        let center_x = z[0];
        let center_y = z[1];
        let w = z[2];
        let h = z[3];

        Self {
            xmin: center_x - w / 2.0,
            ymin: center_y - h / 2.0,
            xmax: center_x + w / 2.0,
            ymax: center_y + h / 2.0,
        }
    }

    /// Check that all coordinates are finite and the corners are strictly ordered
    pub fn is_valid(&self) -> bool {
        self.to_bounds().iter().all(|x| x.is_finite())
            && self.xmin < self.xmax
            && self.ymin < self.ymax
    }
}

impl<T: fmt::Display> fmt::Display for Bbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bbox({}, {}, {}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Calculate IoU between two bounding boxes
pub fn calculate_iou(bbox1: &Bbox<f32>, bbox2: &Bbox<f32>) -> f32 {
    let x1 = bbox1.xmin.max(bbox2.xmin);
    let y1 = bbox1.ymin.max(bbox2.ymin);
    let x2 = bbox1.xmax.min(bbox2.xmax);
    let y2 = bbox1.ymax.min(bbox2.ymax);

    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    let union = bbox1.area() + bbox2.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Compute IoU matrix between tracks and detections with parallel processing
/// Returns: (n_tracks, n_detections) IoU matrix
pub fn ious(tracks: &[Bbox<f32>], detections: &[Bbox<f32>]) -> Array2<f32> {
    let n_tracks = tracks.len();
    let n_dets = detections.len();

    if n_tracks == 0 || n_dets == 0 {
        return Array2::zeros((n_tracks, n_dets));
    }

    // Parallel computation of IoU matrix
    let iou_data: Vec<f32> = (0..n_tracks)
        .into_par_iter()
        .flat_map(|i| {
            let track_bbox = &tracks[i];
            (0..n_dets)
                .map(|j| calculate_iou(track_bbox, &detections[j]))
                .collect::<Vec<_>>()
        })
        .collect();

    Array2::from_shape_vec((n_tracks, n_dets), iou_data).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bbox_creation() {
        let bbox = Bbox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(bbox.xmin, 0.0);
        assert_eq!(bbox.ymin, 0.0);
        assert_eq!(bbox.xmax, 10.0);
        assert_eq!(bbox.ymax, 10.0);
    }

    #[test]
    fn test_bbox_properties() {
        let bbox = Bbox::new(0.0, 0.0, 10.0, 5.0);
        assert_eq!(bbox.width(), 10.0);
        assert_eq!(bbox.height(), 5.0);
        assert_eq!(bbox.area(), 50.0);
        assert_eq!(bbox.center_x(), 5.0);
        assert_eq!(bbox.center_y(), 2.5);
    }

    #[test]
    fn test_iou_calculation() {
        let bbox1 = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = Bbox::new(5.0, 5.0, 15.0, 15.0);
        let iou = calculate_iou(&bbox1, &bbox2);
        assert_abs_diff_eq!(iou, 25.0 / 175.0, epsilon = 0.001);
    }

    #[test]
    fn test_iou_symmetric() {
        let bbox1 = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = Bbox::new(3.0, 2.0, 12.0, 9.0);
        assert_abs_diff_eq!(
            calculate_iou(&bbox1, &bbox2),
            calculate_iou(&bbox2, &bbox1),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_iou_identical_boxes() {
        let bbox = Bbox::new(2.0, 3.0, 8.0, 9.0);
        assert_abs_diff_eq!(calculate_iou(&bbox, &bbox), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_iou_disjoint_boxes() {
        let bbox1 = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let bbox2 = Bbox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(calculate_iou(&bbox1, &bbox2), 0.0);
    }

    #[test]
    fn test_iou_zero_union() {
        // Degenerate boxes with zero area must not divide by zero
        let bbox1 = Bbox::new(5.0, 5.0, 5.0, 5.0);
        let bbox2 = Bbox::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(calculate_iou(&bbox1, &bbox2), 0.0);
    }

    #[test]
    fn test_bbox_conversion() {
        let bbox = Bbox::new(0.0, 0.0, 10.0, 10.0);
        let z = bbox.to_z();
        assert_abs_diff_eq!(z[0], 5.0, epsilon = 0.001);
        assert_abs_diff_eq!(z[1], 5.0, epsilon = 0.001);
        assert_abs_diff_eq!(z[2], 10.0, epsilon = 0.001);
        assert_abs_diff_eq!(z[3], 10.0, epsilon = 0.001);

        let bbox2 = Bbox::from_z(&z);
        assert_abs_diff_eq!(bbox.xmin, bbox2.xmin, epsilon = 0.001);
        assert_abs_diff_eq!(bbox.ymin, bbox2.ymin, epsilon = 0.001);
        assert_abs_diff_eq!(bbox.xmax, bbox2.xmax, epsilon = 0.001);
        assert_abs_diff_eq!(bbox.ymax, bbox2.ymax, epsilon = 0.001);
    }

    #[test]
    fn test_bbox_validity() {
        assert!(Bbox::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!Bbox::new(10.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!Bbox::new(5.0, 5.0, 5.0, 10.0).is_valid());
        assert!(!Bbox::new(f32::NAN, 0.0, 10.0, 10.0).is_valid());
        assert!(!Bbox::new(0.0, 0.0, f32::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn test_ious_matrix() {
        let tracks = vec![Bbox::new(0.0, 0.0, 10.0, 10.0), Bbox::new(20.0, 20.0, 30.0, 30.0)];
        let detections = vec![
            Bbox::new(0.0, 0.0, 10.0, 10.0),
            Bbox::new(21.0, 21.0, 31.0, 31.0),
            Bbox::new(100.0, 100.0, 110.0, 110.0),
        ];

        let matrix = ious(&tracks, &detections);
        assert_eq!(matrix.shape(), &[2, 3]);
        assert_abs_diff_eq!(matrix[[0, 0]], 1.0, epsilon = 1e-6);
        assert_eq!(matrix[[0, 1]], 0.0);
        assert!(matrix[[1, 1]] > 0.5);
        assert_eq!(matrix[[1, 2]], 0.0);
    }

    #[test]
    fn test_ious_empty() {
        let boxes = vec![Bbox::new(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(ious(&[], &boxes).shape(), &[0, 1]);
        assert_eq!(ious(&boxes, &[]).shape(), &[1, 0]);
    }
}
