//! Error types for the tracking library

use crate::bbox::Bbox;
use thiserror::Error;

/// Result type alias for the tracking library
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors that can occur during tracking operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Invalid detection at index {index}: {bbox}")]
    InvalidDetection { index: usize, bbox: Bbox<f32> },

    #[error("Innovation covariance is singular, Kalman gain is undefined")]
    SingularInnovation,
}
