use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// How the vertical center of a track is smoothed between frames.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    None,
    Ema,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TrackConfig {
    /// Minimal IoU for a detection to be associated to a live track.
    pub iou_threshold: f32,
    /// Hard cap on live tracks; unmatched detections are dropped at the cap.
    pub max_tracks: usize,
    /// Seconds without a matching detection before a track is evicted.
    pub ttl_s: f64,
    pub smoothing: Smoothing,
    pub ema_alpha: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.3,
            max_tracks: 32,
            ttl_s: 1.0,
            smoothing: Smoothing::Ema,
            ema_alpha: 0.25,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CrossingConfig {
    /// Pixel delta threshold for the upstream frame-difference mask; carried
    /// in the config surface but consumed by the motion provider, not here.
    pub motion_thresh: f64,
    /// Largest contour area below which an observation is ignored.
    pub motion_min_area: f64,
    /// Motion/region pixel ratio below which an observation is ignored.
    pub motion_min_ratio: f64,
    /// Consecutive same-side frames required to accept a side change.
    pub debounce: u32,
    /// Consecutive qualifying frames before any side logic is trusted.
    pub arm_min_frames: u32,
    /// Ratio the arm gate additionally requires.
    pub arm_min_ratio: f64,
    /// Drop frames whose motion runs along the line rather than across it.
    pub direction_filter: bool,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            motion_thresh: 25.0,
            motion_min_area: 1500.0,
            motion_min_ratio: 0.01,
            debounce: 3,
            arm_min_frames: 10,
            arm_min_ratio: 0.01,
            direction_filter: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpeedConfig {
    /// Reference line A, as a fraction of the analysis region height.
    pub line_a_pct: f32,
    /// Reference line B, below A in travel order.
    pub line_b_pct: f32,
    /// Ground distance between the two lines, in meters.
    pub distance_m: f64,
    pub min_kmh: f64,
    pub max_kmh: f64,
    /// Withhold the speed event unless some plate text is known for the track.
    pub require_plate: bool,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            line_a_pct: 0.40,
            line_b_pct: 0.70,
            distance_m: 10.0,
            min_kmh: 5.0,
            max_kmh: 250.0,
            require_plate: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub track: TrackConfig,
    pub crossing: CrossingConfig,
    pub speed: SpeedConfig,
}

impl Config {
    /// The runtime core assumes a validated configuration; this runs once at
    /// engine construction.
    pub fn validate(&self) -> Result<(), Error> {
        if self.crossing.debounce < 1 {
            return Err(Error::BelowMinimum("crossing.debounce"));
        }

        if self.crossing.arm_min_frames < 1 {
            return Err(Error::BelowMinimum("crossing.arm_min_frames"));
        }

        if self.track.max_tracks < 1 {
            return Err(Error::BelowMinimum("track.max_tracks"));
        }

        if !(self.track.iou_threshold > 0.0 && self.track.iou_threshold <= 1.0) {
            return Err(Error::OutOfRange("track.iou_threshold"));
        }

        if !(self.track.ema_alpha > 0.0 && self.track.ema_alpha <= 1.0) {
            return Err(Error::OutOfRange("track.ema_alpha"));
        }

        if !(self.track.ttl_s > 0.0) {
            return Err(Error::OutOfRange("track.ttl_s"));
        }

        if !(0.0..=1.0).contains(&self.speed.line_a_pct)
            || !(0.0..=1.0).contains(&self.speed.line_b_pct)
        {
            return Err(Error::OutOfRange("speed.line_a_pct/line_b_pct"));
        }

        if self.speed.line_a_pct >= self.speed.line_b_pct {
            return Err(Error::LineOrder);
        }

        if !(self.speed.distance_m >= 0.0 && self.speed.distance_m.is_finite()) {
            return Err(Error::OutOfRange("speed.distance_m"));
        }

        if self.speed.min_kmh > self.speed.max_kmh {
            return Err(Error::OutOfRange("speed.min_kmh/max_kmh"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_thresholds() {
        let config = Config::default();

        assert_eq!(config.track.iou_threshold, 0.3);
        assert_eq!(config.track.max_tracks, 32);
        assert_eq!(config.track.ttl_s, 1.0);
        assert_eq!(config.crossing.motion_thresh, 25.0);
        assert_eq!(config.crossing.motion_min_area, 1500.0);
        assert_eq!(config.crossing.motion_min_ratio, 0.01);
        assert_eq!(config.crossing.debounce, 3);
        assert_eq!(config.crossing.arm_min_frames, 10);
        assert_eq!(config.crossing.arm_min_ratio, 0.01);
        assert_eq!(config.speed.line_a_pct, 0.40);
        assert_eq!(config.speed.line_b_pct, 0.70);
        assert_eq!(config.speed.min_kmh, 5.0);
        assert_eq!(config.speed.max_kmh, 250.0);
        assert!(config.speed.require_plate);
    }

    #[test]
    fn rejects_zero_debounce() {
        let mut config = Config::default();
        config.crossing.debounce = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_lines() {
        let mut config = Config::default();
        config.speed.line_a_pct = 0.8;
        config.speed.line_b_pct = 0.4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"speed":{"distance_m":8.0},"track":{"smoothing":"none"}}"#)
                .unwrap();

        assert_eq!(config.speed.distance_m, 8.0);
        assert_eq!(config.track.smoothing, Smoothing::None);
        assert_eq!(config.crossing.debounce, 3);
    }
}
