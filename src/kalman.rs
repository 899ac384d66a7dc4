//! Constant velocity Kalman filter for bounding box states

use nalgebra::{Matrix4, Matrix4x6, Matrix6, Vector4, Vector6};

use crate::error::{Result, TrackError};

/// Parameters for constructing a box filter
#[derive(Debug, Clone)]
pub struct KalmanFilterParams {
    /// Initial measurement [center_x, center_y, width, height]
    pub z: [f32; 4],
    /// Process noise for position and size components
    pub q_pos: f32,
    /// Process noise for velocity components
    pub q_vel: f32,
    /// Measurement noise
    pub r: f32,
    /// Initial state covariance magnitude
    pub p0: f32,
}

/// Kalman filter for a single tracked box with constant velocity model
/// State: [cx, cy, w, h, vx, vy] - center position, size, velocity
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    /// State vector: [cx, cy, w, h, vx, vy]
    pub x: Vector6<f32>,
    /// State covariance matrix
    pub p: Matrix6<f32>,
    /// State transition matrix
    pub f: Matrix6<f32>,
    /// Observation matrix
    pub h: Matrix4x6<f32>,
    /// Observation noise covariance
    pub r: Matrix4<f32>,
    /// Process noise covariance
    pub q: Matrix6<f32>,
}

impl KalmanFilter {
    /// Create a filter initialized at the given measurement with zero velocity
    pub fn new(params: KalmanFilterParams) -> Self {
        let x = Vector6::new(params.z[0], params.z[1], params.z[2], params.z[3], 0.0, 0.0);

        // Initial covariance (higher uncertainty for the unobserved velocity)
        let mut p = Matrix6::identity() * params.p0;
        p[(4, 4)] = params.p0 * 10.0;
        p[(5, 5)] = params.p0 * 10.0;

        // Constant velocity transition with dt = 1 frame:
        // cx' = cx + vx, cy' = cy + vy, size and velocity carry over
        let mut f = Matrix6::identity();
        f[(0, 4)] = 1.0;
        f[(1, 5)] = 1.0;

        // We observe position and size, not velocity
        let h = Matrix4x6::new(
            1.0, 0.0, 0.0, 0.0, 0.0, 0.0, // cx
            0.0, 1.0, 0.0, 0.0, 0.0, 0.0, // cy
            0.0, 0.0, 1.0, 0.0, 0.0, 0.0, // w
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, // h
        );

        let r = Matrix4::identity() * params.r;

        let mut q = Matrix6::zeros();
        q[(0, 0)] = params.q_pos;
        q[(1, 1)] = params.q_pos;
        q[(2, 2)] = params.q_pos;
        q[(3, 3)] = params.q_pos;
        q[(4, 4)] = params.q_vel;
        q[(5, 5)] = params.q_vel;

        Self { x, p, f, h, r, q }
    }

    /// Predict the next state
    pub fn predict(&mut self) {
        // x = F * x
        self.x = self.f * self.x;

        // P = F * P * F^T + Q
        self.p = self.f * self.p * self.f.transpose() + self.q;
    }

    /// Update with an observation [center_x, center_y, width, height]
    pub fn update(&mut self, z: Vector4<f32>) -> Result<()> {
        // Residual: y = z - H * x
        let y = z - self.h * self.x;

        // Innovation covariance: S = H * P * H^T + R
        let s = self.h * self.p * self.h.transpose() + self.r;

        // Kalman gain: K = P * H^T * S^-1
        let s_inv = s.try_inverse().ok_or(TrackError::SingularInnovation)?;
        let k = self.p * self.h.transpose() * s_inv;

        // Update state: x = x + K * y
        self.x += k * y;

        // Update covariance: P = (I - K * H) * P
        self.p = (Matrix6::identity() - k * self.h) * self.p;

        Ok(())
    }

    /// Get current state
    pub fn get_state(&self) -> &Vector6<f32> {
        &self.x
    }

    /// Get current covariance
    pub fn get_covariance(&self) -> &Matrix6<f32> {
        &self.p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn default_params(z: [f32; 4]) -> KalmanFilterParams {
        KalmanFilterParams {
            z,
            q_pos: 0.1,
            q_vel: 1.0,
            r: 5.0,
            p0: 1000.0,
        }
    }

    #[test]
    fn test_predict_stationary() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 20.0]));

        // Zero initial velocity: position and size must not move
        kf.predict();
        assert_abs_diff_eq!(kf.x[0], 50.0, epsilon = 0.001);
        assert_abs_diff_eq!(kf.x[1], 50.0, epsilon = 0.001);
        assert_abs_diff_eq!(kf.x[2], 10.0, epsilon = 0.001);
        assert_abs_diff_eq!(kf.x[3], 20.0, epsilon = 0.001);
    }

    #[test]
    fn test_predict_applies_velocity() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 10.0]));
        kf.x[4] = 2.0;
        kf.x[5] = -1.0;

        kf.predict();
        assert_abs_diff_eq!(kf.x[0], 52.0, epsilon = 0.001);
        assert_abs_diff_eq!(kf.x[1], 49.0, epsilon = 0.001);
        // Size is not affected by velocity
        assert_abs_diff_eq!(kf.x[2], 10.0, epsilon = 0.001);
        assert_abs_diff_eq!(kf.x[3], 10.0, epsilon = 0.001);
    }

    #[test]
    fn test_predict_grows_covariance() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 10.0]));
        let p_before = kf.p[(0, 0)];
        kf.predict();
        assert!(kf.p[(0, 0)] > p_before);
    }

    #[test]
    fn test_update_pulls_state_towards_measurement() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 10.0]));

        kf.predict();
        kf.update(Vector4::new(55.0, 50.0, 10.0, 10.0)).unwrap();

        // High initial covariance means the measurement dominates
        assert!(kf.x[0] > 54.0 && kf.x[0] <= 55.0);
        assert_abs_diff_eq!(kf.x[1], 50.0, epsilon = 0.1);
    }

    #[test]
    fn test_update_learns_velocity() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 10.0]));

        // One frame later the box has moved +5 in x
        kf.predict();
        kf.update(Vector4::new(55.0, 50.0, 10.0, 10.0)).unwrap();
        assert!(kf.x[4] > 2.0);

        // The next prediction should carry the motion forward
        kf.predict();
        assert!(kf.x[0] > 55.0);
    }

    #[test]
    fn test_update_shrinks_covariance() {
        let mut kf = KalmanFilter::new(default_params([50.0, 50.0, 10.0, 10.0]));
        kf.predict();
        let p_before = kf.p[(0, 0)];
        kf.update(Vector4::new(50.0, 50.0, 10.0, 10.0)).unwrap();
        assert!(kf.p[(0, 0)] < p_before);
    }

    #[test]
    fn test_singular_innovation_is_an_error() {
        // Zero covariance and zero noise make S exactly singular
        let mut kf = KalmanFilter::new(KalmanFilterParams {
            z: [50.0, 50.0, 10.0, 10.0],
            q_pos: 0.0,
            q_vel: 0.0,
            r: 0.0,
            p0: 0.0,
        });

        kf.predict();
        let result = kf.update(Vector4::new(50.0, 50.0, 10.0, 10.0));
        assert_eq!(result, Err(TrackError::SingularInnovation));
    }
}
