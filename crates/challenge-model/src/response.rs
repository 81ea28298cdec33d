//! Solve response body.

use serde::{Deserialize, Serialize};
use slidetrack_common::SlidetrackError;

use crate::track::Trajectory;

/// Width and height of a decoded image (px).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether `other` fits entirely inside `self`.
    pub fn contains(&self, other: &ImageDimensions) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

/// Successful reply: image sizes, the drag window, and the trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResponse {
    pub background_image_width: u32,
    pub background_image_height: u32,
    pub slider_image_width: u32,
    pub slider_image_height: u32,
    pub start_time: String,
    pub end_time: String,
    pub tracks: Trajectory,
}

impl SolveResponse {
    pub fn background(&self) -> ImageDimensions {
        ImageDimensions::new(self.background_image_width, self.background_image_height)
    }

    pub fn slider(&self) -> ImageDimensions {
        ImageDimensions::new(self.slider_image_width, self.slider_image_height)
    }
}

/// Failure reply with a client-visible message and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl From<&SlidetrackError> for ErrorResponse {
    fn from(err: &SlidetrackError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}
