use std::time::Instant;

/// Resolves one time value per frame from progressively less precise
/// sources: container position, frame-rate arithmetic, wall clock.
#[derive(Debug)]
pub struct FrameClock {
    started: Instant,
}

/// Reported frame rates outside this open interval are garbage metadata.
#[inline]
pub fn fps_valid(fps: f64) -> bool {
    fps > 1.0 && fps < 300.0
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Container timestamps are authoritative when present. Frame-rate
    /// derived time is the common fallback for files and streams without
    /// embedded timestamps. The wall clock is the last resort for live
    /// sources with no fps metadata; its values are only self-consistent,
    /// not frame-accurate.
    pub fn resolve(&self, position_ms: f64, frame_index: u64, fps: f64) -> f64 {
        if position_ms > 0.0 {
            return position_ms / 1000.0;
        }

        if fps_valid(fps) {
            return frame_index as f64 / fps;
        }

        self.started.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
