use tracing::{debug, info};

use crate::config::CrossingConfig;
use crate::event::CrossingEvent;
use crate::frame::MotionObservation;

/// Two-stage debounce over noisy per-frame motion-side observations.
///
/// The arm gate ignores isolated one-frame motion blips before any side
/// computation is trusted; the side-streak debounce then only accepts a
/// change of side sustained for `debounce` consecutive qualifying frames.
/// One instance exists per monitored source, not per track.
#[derive(Debug)]
pub struct CrossingDetector {
    config: CrossingConfig,
    /// -1, 0 or +1; 0 means no stable side established yet.
    last_stable_side: i8,
    side_streak_side: i8,
    side_streak_count: u32,
    arm_count: u32,
    /// Frame index of the first accepted crossing; -1 until then, sticky for
    /// the life of the stream (first crossing only).
    crossing_frame: i64,
}

impl CrossingDetector {
    pub fn new(config: CrossingConfig) -> Self {
        Self {
            config,
            last_stable_side: 0,
            side_streak_side: 0,
            side_streak_count: 0,
            arm_count: 0,
            crossing_frame: -1,
        }
    }

    #[inline]
    pub fn last_stable_side(&self) -> i8 {
        self.last_stable_side
    }

    #[inline]
    pub fn crossing_frame(&self) -> Option<u64> {
        (self.crossing_frame >= 0).then(|| self.crossing_frame as u64)
    }

    /// True from the first accepted crossing onward.
    #[inline]
    pub fn post_crossing(&self) -> bool {
        self.crossing_frame >= 0
    }

    pub fn reset(&mut self) {
        self.last_stable_side = 0;
        self.side_streak_side = 0;
        self.side_streak_count = 0;
        self.arm_count = 0;
        self.crossing_frame = -1;
    }

    pub fn observe(
        &mut self,
        obs: Option<&MotionObservation>,
        frame_index: u64,
    ) -> Option<CrossingEvent> {
        let obs = match obs {
            Some(o)
                if o.ratio >= self.config.motion_min_ratio
                    && o.area >= self.config.motion_min_area =>
            {
                o
            }
            _ => {
                // Arm support is consecutive; a quiet frame restarts it.
                self.arm_count = 0;
                return None;
            }
        };

        self.arm_count += 1;
        if self.arm_count < self.config.arm_min_frames || obs.ratio < self.config.arm_min_ratio {
            return None;
        }

        // Along-line jitter advances the arm counter but never the streak.
        if self.config.direction_filter && !obs.direction_ok {
            return None;
        }

        // Ambiguous side, skip the frame.
        if obs.side == 0 {
            return None;
        }

        if obs.side == self.side_streak_side {
            self.side_streak_count += 1;
        } else {
            self.side_streak_side = obs.side;
            self.side_streak_count = 1;
        }

        if self.side_streak_count < self.config.debounce {
            return None;
        }

        if self.last_stable_side == 0 {
            // Initial calibration, not a crossing.
            self.last_stable_side = self.side_streak_side;
            debug!(side = self.last_stable_side, "stable side established");
            return None;
        }

        if self.side_streak_side != self.last_stable_side {
            self.last_stable_side = self.side_streak_side;

            if self.crossing_frame < 0 {
                self.crossing_frame = frame_index as i64;
            }

            info!(
                frame_index,
                side = self.last_stable_side,
                ratio = obs.ratio,
                "crossing"
            );

            return Some(CrossingEvent {
                frame_index,
                ratio: obs.ratio,
                area: obs.area,
                direction_ok: obs.direction_ok,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CrossingConfig {
        CrossingConfig {
            motion_thresh: 25.0,
            motion_min_area: 100.0,
            motion_min_ratio: 0.001,
            debounce: 3,
            arm_min_frames: 1,
            arm_min_ratio: 0.001,
            direction_filter: false,
        }
    }

    fn obs(side: i8) -> MotionObservation {
        MotionObservation {
            side,
            ratio: 0.01,
            area: 5000.0,
            direction_ok: true,
        }
    }

    fn stabilize(det: &mut CrossingDetector, side: i8, frames: u64) {
        for i in 0..frames {
            assert!(det.observe(Some(&obs(side)), i).is_none());
        }
    }

    #[test]
    fn debounce_law() {
        let mut det = CrossingDetector::new(config());
        stabilize(&mut det, -1, 3);
        assert_eq!(det.last_stable_side(), -1);

        // Streak of +1: lengths 1 and 2 never fire, 3 fires exactly once.
        assert!(det.observe(Some(&obs(1)), 10).is_none());
        assert!(det.observe(Some(&obs(1)), 11).is_none());
        let event = det.observe(Some(&obs(1)), 12).unwrap();
        assert_eq!(event.frame_index, 12);

        // The sustained streak never re-fires.
        assert!(det.observe(Some(&obs(1)), 13).is_none());
        assert!(det.observe(Some(&obs(1)), 14).is_none());
    }

    #[test]
    fn short_streak_is_rejected() {
        let mut det = CrossingDetector::new(config());
        stabilize(&mut det, -1, 3);

        // Two +1 frames interrupted by the old side restart the streak.
        assert!(det.observe(Some(&obs(1)), 10).is_none());
        assert!(det.observe(Some(&obs(1)), 11).is_none());
        assert!(det.observe(Some(&obs(-1)), 12).is_none());
        assert!(det.observe(Some(&obs(1)), 13).is_none());
        assert!(det.observe(Some(&obs(1)), 14).is_none());
        assert!(det.observe(Some(&obs(1)), 15).is_some());
    }

    #[test]
    fn zero_side_frames_do_not_disturb_the_streak() {
        let mut det = CrossingDetector::new(config());
        stabilize(&mut det, -1, 3);

        assert!(det.observe(Some(&obs(1)), 10).is_none());
        assert!(det.observe(Some(&obs(0)), 11).is_none());
        assert!(det.observe(Some(&obs(1)), 12).is_none());
        assert!(det.observe(Some(&obs(1)), 13).is_some());
    }

    #[test]
    fn arm_gate_suppresses_single_frame_spikes() {
        let mut config = config();
        config.arm_min_frames = 2;
        let mut det = CrossingDetector::new(config);

        // A qualifying frame after a quiet frame never reaches side logic.
        assert!(det.observe(Some(&obs(-1)), 0).is_none());
        assert!(det.observe(None, 1).is_none());
        assert!(det.observe(Some(&obs(-1)), 2).is_none());
        assert_eq!(det.last_stable_side(), 0);

        // Sustained motion arms the gate and side logic proceeds.
        for i in 3..8 {
            det.observe(Some(&obs(-1)), i);
        }
        assert_eq!(det.last_stable_side(), -1);
    }

    #[test]
    fn weak_motion_resets_arm_support() {
        let mut config = config();
        config.arm_min_frames = 3;
        let mut det = CrossingDetector::new(config);

        det.observe(Some(&obs(-1)), 0);
        det.observe(Some(&obs(-1)), 1);

        let weak = MotionObservation {
            ratio: 0.0001,
            ..obs(-1)
        };
        det.observe(Some(&weak), 2);

        // Two more frames are not enough after the reset.
        det.observe(Some(&obs(-1)), 3);
        det.observe(Some(&obs(-1)), 4);
        assert_eq!(det.last_stable_side(), 0);
    }

    #[test]
    fn direction_filter_skips_streak_accounting() {
        let mut config = config();
        config.direction_filter = true;
        let mut det = CrossingDetector::new(config);
        stabilize(&mut det, -1, 3);

        let along = MotionObservation {
            direction_ok: false,
            ..obs(1)
        };

        // Along-line frames never build a streak.
        for i in 10..20 {
            assert!(det.observe(Some(&along), i).is_none());
        }

        assert!(det.observe(Some(&obs(1)), 20).is_none());
        assert!(det.observe(Some(&obs(1)), 21).is_none());
        assert!(det.observe(Some(&obs(1)), 22).is_some());
    }

    #[test]
    fn crossing_frame_is_sticky() {
        let mut det = CrossingDetector::new(config());
        stabilize(&mut det, -1, 3);

        for i in 10..13 {
            det.observe(Some(&obs(1)), i);
        }
        assert_eq!(det.crossing_frame(), Some(12));
        assert!(det.post_crossing());

        // A second real crossing still fires an event but never moves the
        // recorded first-crossing frame.
        for i in 20..23 {
            det.observe(Some(&obs(-1)), i);
        }
        assert_eq!(det.crossing_frame(), Some(12));
    }

    #[test]
    fn second_crossing_fires_an_event() {
        let mut det = CrossingDetector::new(config());
        stabilize(&mut det, -1, 3);

        for i in 10..13 {
            det.observe(Some(&obs(1)), i);
        }

        let mut events = 0;
        for i in 20..23 {
            if det.observe(Some(&obs(-1)), i).is_some() {
                events += 1;
            }
        }
        assert_eq!(events, 1);
    }
}
