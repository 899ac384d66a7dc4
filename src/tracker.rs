//! Multi-object tracker: data association plus track lifecycle

use serde::{Deserialize, Serialize};

use crate::bbox::{ious, Bbox};
use crate::error::{Result, TrackError};
use crate::hungarian::HungarianSolver;
use crate::track::Track;

/// Configuration for the tracker and its per-track Kalman filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Process noise for position and size - how much the box can change unexpectedly
    pub process_noise_pos: f32,
    /// Process noise for velocity - acceleration uncertainty
    pub process_noise_vel: f32,
    /// Measurement noise - detector bbox accuracy
    pub measurement_noise: f32,
    /// Initial state covariance
    pub initial_covariance: f32,
    /// Minimum IoU for associating a detection to a track
    pub iou_threshold: f32,
    /// Maximum frames without a matched detection before a track is dropped
    pub max_age: u32,
    /// Minimum matched detections before a track is reported
    pub min_hits: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            process_noise_pos: 0.1,    // Position and size drift slowly
            process_noise_vel: 1.0,    // Velocity is the most uncertain component
            measurement_noise: 5.0,    // A few pixels of detector jitter
            initial_covariance: 1000.0,
            iou_threshold: 0.3,
            max_age: 5,
            min_hits: 1,
        }
    }
}

/// One reported track: persistent id plus the current box estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedBox {
    pub id: u32,
    pub bbox: Bbox<f32>,
}

/// Multi-object tracker with IoU data association
///
/// Owns one Kalman-filtered track per object and reconciles them against
/// each frame's detections. One instance tracks one stream; independent
/// streams get independent instances.
#[derive(Debug, Clone)]
pub struct Tracker {
    tracks: Vec<Track>,
    next_track_id: u32,
    frame_count: u32,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_track_id: 0,
            frame_count: 0,
            config,
        }
    }

    /// Process one frame of detections
    ///
    /// Detections must be finite boxes with positive extent, in any order.
    /// Returns the tracks matched in this frame (new tracks included), in
    /// creation order. Coasting tracks stay alive internally but are not
    /// reported until they are matched again.
    pub fn update(&mut self, detections: &[Bbox<f32>]) -> Result<Vec<TrackedBox>> {
        // Reject malformed input before touching any track state
        for (index, det) in detections.iter().enumerate() {
            if !det.is_valid() {
                return Err(TrackError::InvalidDetection { index, bbox: *det });
            }
        }

        // Step 1: predict all tracks forward, dropping any whose state has
        // degenerated (a non-finite box would poison the cost matrix)
        self.predict_tracks();

        // Step 2: associate detections with tracks
        let matches = self.associate(detections);

        // Step 3: update matched tracks with their detections
        let mut matched_detections = vec![false; detections.len()];
        for (track_idx, det_idx) in matches {
            matched_detections[det_idx] = true;
            let track = &mut self.tracks[track_idx];
            if let Err(err) = track.update(&detections[det_idx]) {
                // Keep the track; it simply stays unmatched this frame
                log::warn!("skipping update for track {}: {}", track.id, err);
            }
        }

        // Step 4: create new tracks for unmatched detections
        for (det_idx, det) in detections.iter().enumerate() {
            if !matched_detections[det_idx] {
                log::debug!(
                    "new track {} for detection {} at {}",
                    self.next_track_id,
                    det_idx,
                    det
                );
                self.tracks
                    .push(Track::new(self.next_track_id, *det, &self.config));
                self.next_track_id += 1;
            }
        }

        // Step 5: remove tracks unmatched for too long
        let before = self.tracks.len();
        let max_age = self.config.max_age;
        self.tracks
            .retain(|track| track.time_since_update <= max_age);
        if self.tracks.len() < before {
            log::debug!(
                "removed {} stale tracks ({} remaining)",
                before - self.tracks.len(),
                self.tracks.len()
            );
        }

        self.frame_count += 1;

        // Step 6: report the tracks matched in this frame
        Ok(self.current_tracks())
    }

    /// Advance every track one frame and drop the numerically broken ones
    fn predict_tracks(&mut self) {
        for track in &mut self.tracks {
            track.predict();
        }
        self.tracks.retain(|track| {
            if track.bbox.is_valid() {
                true
            } else {
                log::warn!("dropping track {}: predicted box degenerated", track.id);
                false
            }
        });
    }

    /// Match detections to tracks, globally minimizing total (1 - IoU) cost
    fn associate(&self, detections: &[Bbox<f32>]) -> Vec<(usize, usize)> {
        if self.tracks.is_empty() || detections.is_empty() {
            return Vec::new();
        }

        let track_boxes: Vec<Bbox<f32>> = self.tracks.iter().map(|t| t.bbox).collect();
        let track_det_ious = ious(&track_boxes, detections);
        let result = HungarianSolver::solve_iou(track_det_ious.view(), self.config.iou_threshold);

        log::debug!(
            "associated {} of {} detections to {} tracks",
            result.assignments.len(),
            detections.len(),
            self.tracks.len()
        );

        result.assignments
    }

    /// Tracks matched in the current frame that have cleared the hit gate
    fn current_tracks(&self) -> Vec<TrackedBox> {
        self.tracks
            .iter()
            .filter(|track| {
                track.time_since_update == 0
                    && (track.hits >= self.config.min_hits
                        || self.frame_count <= self.config.min_hits)
            })
            .map(|track| TrackedBox {
                id: track.id,
                bbox: track.bbox,
            })
            .collect()
    }

    /// Number of live tracks, coasting ones included
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// All live tracks in creation order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Drop all tracks and restart the frame counter
    ///
    /// The id counter is kept: ids are never reused for the lifetime of the
    /// tracker, even across a clear.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.frame_count = 0;
    }
}
