//! IoU-based multi-object tracking with Kalman filtered motion
//!
//! Associates per-frame object detections into persistent track identities.
//! Each track carries a constant velocity Kalman filter; detections are
//! matched to predicted track boxes by IoU using an optimal assignment
//! solve, and a lifecycle manager spawns tracks for unmatched detections,
//! coasts briefly occluded ones and prunes those gone for too long.
//!
//! ```rust
//! use boxtrack::{Bbox, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(TrackerConfig::default());
//!
//! let detections = vec![Bbox::new(10.0, 10.0, 50.0, 50.0)];
//! let tracks = tracker.update(&detections)?;
//!
//! assert_eq!(tracks.len(), 1);
//! assert_eq!(tracks[0].id, 0);
//! # Ok::<(), boxtrack::TrackError>(())
//! ```

pub mod bbox;
pub mod error;
pub mod hungarian;
pub mod kalman;
pub mod track;
pub mod tracker;

pub use bbox::{calculate_iou, ious, Bbox};
pub use error::{Result, TrackError};
pub use hungarian::{AssignmentResult, HungarianSolver};
pub use kalman::{KalmanFilter, KalmanFilterParams};
pub use track::Track;
pub use tracker::{TrackedBox, Tracker, TrackerConfig};
