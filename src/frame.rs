use serde_derive::{Deserialize, Serialize};

use crate::detection::Detection;

/// One motion-mask measurement for a frame, produced upstream by pixel
/// analysis of a frame difference.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MotionObservation {
    /// Sign of the cross product of the crossing-line vector and the vector
    /// from the line origin to the motion centroid: -1, 0 or +1.
    pub side: i8,
    /// Motion pixel count over region pixel count.
    pub ratio: f64,
    /// Largest contour area, in pixels.
    pub area: f64,
    /// Motion direction is more perpendicular-to-line than along-line.
    pub direction_ok: bool,
}

/// Per-frame input handed to the engine by the capture loop.
#[derive(Debug, Clone)]
pub struct FrameInput {
    pub frame_index: u64,
    /// Resolved via [`crate::clock::FrameClock`], in seconds.
    pub timestamp_s: f64,
    pub detections: Vec<Detection>,
    /// Absent when motion analysis is disabled or no previous frame exists
    /// for differencing.
    pub motion: Option<MotionObservation>,
}

impl FrameInput {
    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
