//! Single tracked object state

use nalgebra::Vector4;

use crate::bbox::Bbox;
use crate::error::Result;
use crate::kalman::{KalmanFilter, KalmanFilterParams};
use crate::tracker::TrackerConfig;

/// One tracked object: a Kalman filter plus match bookkeeping
#[derive(Debug, Clone)]
pub struct Track {
    /// Persistent identifier, unique for the lifetime of a tracker
    pub id: u32,
    /// Filter estimate of the box after the latest predict/update
    pub bbox: Bbox<f32>,
    /// Frames elapsed since the last matched detection
    pub time_since_update: u32,
    /// Matched detections over the track lifetime, counting the initial one
    pub hits: u32,
    kf: KalmanFilter,
}

impl Track {
    /// Create a track from an initial detection
    pub fn new(id: u32, bbox: Bbox<f32>, config: &TrackerConfig) -> Self {
        let kf = KalmanFilter::new(KalmanFilterParams {
            z: bbox.to_z(),
            q_pos: config.process_noise_pos,
            q_vel: config.process_noise_vel,
            r: config.measurement_noise,
            p0: config.initial_covariance,
        });

        Self {
            id,
            bbox,
            time_since_update: 0,
            hits: 1,
            kf,
        }
    }

    /// Advance the filter one frame and return the predicted box
    pub fn predict(&mut self) -> Bbox<f32> {
        self.kf.predict();
        self.bbox = self.state_bbox();
        self.time_since_update += 1;
        self.bbox
    }

    /// Apply a matched detection, keeping the filter-corrected box.
    ///
    /// On failure the filter and all bookkeeping are left untouched.
    pub fn update(&mut self, detection: &Bbox<f32>) -> Result<()> {
        let z = detection.to_z();
        self.kf.update(Vector4::new(z[0], z[1], z[2], z[3]))?;
        self.bbox = self.state_bbox();
        self.time_since_update = 0;
        self.hits += 1;
        Ok(())
    }

    /// Estimated velocity [vx, vy] in pixels per frame
    pub fn velocity(&self) -> [f32; 2] {
        [self.kf.x[4], self.kf.x[5]]
    }

    fn state_bbox(&self) -> Bbox<f32> {
        let x = &self.kf.x;
        Bbox::from_z(&[x[0], x[1], x[2], x[3]])
    }
}
