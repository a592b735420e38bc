use tracing::{debug, info};

use crate::config::SpeedConfig;
use crate::event::SpeedEvent;
use crate::region::Region;
use crate::store::Track;

const MS_TO_KMH: f64 = 3.6;

/// Times a track's smoothed vertical center across reference lines A and B
/// and validates the resulting speed before reporting it.
#[derive(Debug)]
pub struct SpeedEstimator {
    config: SpeedConfig,
    line_a_px: f32,
    line_b_px: f32,
}

impl SpeedEstimator {
    pub fn new(config: SpeedConfig, region: &Region) -> Self {
        let line_a_px = region.line_y(config.line_a_pct);
        let line_b_px = region.line_y(config.line_b_pct);

        Self {
            config,
            line_a_px,
            line_b_px,
        }
    }

    #[inline]
    pub fn line_a_px(&self) -> f32 {
        self.line_a_px
    }

    #[inline]
    pub fn line_b_px(&self) -> f32 {
        self.line_b_px
    }

    /// Upward-crossing test on the smoothed center before and after this
    /// frame's update.
    #[inline]
    fn crossed(prev: f32, new: f32, line: f32) -> bool {
        prev < line && line <= new
    }

    /// Advances one track through the A→B timing state. The caller has
    /// already checked region membership for this frame.
    ///
    /// A track that fails any guard simply reports nothing; only an accepted
    /// speed consumes the fire-once guarantee.
    pub fn observe(
        &self,
        track: &mut Track,
        prev_ema: f32,
        new_ema: f32,
        plate_in_frame: bool,
        now: f64,
        frame_index: u64,
    ) -> Option<SpeedEvent> {
        if !now.is_finite() {
            return None;
        }

        if !track.crossed_a && Self::crossed(prev_ema, new_ema, self.line_a_px) {
            track.crossed_a = true;
            track.t_a = now;
            debug!(track = track.id, t_a = now, "line A crossed");
        }

        if track.crossed_a && !track.fired && Self::crossed(prev_ema, new_ema, self.line_b_px) {
            let dt = now - track.t_a;
            if dt <= 0.0 || self.config.distance_m <= 0.0 {
                return None;
            }

            let kmh = self.config.distance_m / dt * MS_TO_KMH;
            if kmh < self.config.min_kmh || kmh > self.config.max_kmh {
                debug!(track = track.id, kmh, "implausible speed discarded");
                return None;
            }

            if self.config.require_plate && track.best_plate_text.is_empty() && !plate_in_frame {
                return None;
            }

            track.fired = true;
            track.speed_kmh = kmh;
            info!(track = track.id, kmh, dt, "speed fired");

            return Some(SpeedEvent {
                frame_index,
                track_id: track.id,
                plate_text: track.best_plate_text.clone(),
                plate_confidence: track.best_plate_conf,
                speed_kmh: kmh,
                dt_s: dt,
            });
        }

        None
    }
}
