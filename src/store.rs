use tracing::debug;

use crate::bbox::BBox;
use crate::config::{Smoothing, TrackConfig};
use crate::detection::Detection;

/// `center_y_ema` below zero means no smoothed center exists yet.
pub const EMA_UNSET: f32 = -1.0;

/// A hypothesized physical object followed across frames.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: u64,
    pub bbox: BBox,
    pub center_y_ema: f32,
    pub last_seen_t: f64,
    pub crossed_a: bool,
    /// Permanently true once a speed has been reported; a track never fires
    /// twice.
    pub fired: bool,
    pub t_a: f64,
    pub speed_kmh: f64,
    pub best_plate_text: String,
    pub best_plate_conf: f32,
}

impl Track {
    pub fn new(id: u64, bbox: BBox, now: f64) -> Self {
        Self {
            id,
            bbox,
            center_y_ema: EMA_UNSET,
            last_seen_t: now,
            crossed_a: false,
            fired: false,
            t_a: 0.0,
            speed_kmh: 0.0,
            best_plate_text: String::new(),
            best_plate_conf: -1.0,
        }
    }

    /// Keeps the highest-confidence reading seen so far; confidence is
    /// monotonic non-decreasing while the track lives. The OCR stage emits
    /// empty-text readings with real confidences; those never replace a
    /// stored plate.
    fn absorb_plate(&mut self, det: &Detection) {
        if let Some(p) = &det.plate {
            if !p.text.is_empty() && p.confidence >= 0.0 && p.confidence >= self.best_plate_conf {
                self.best_plate_text = p.text.clone();
                self.best_plate_conf = p.confidence;
            }
        }
    }
}

/// Outcome of associating one detection, consumed by the speed estimator.
#[derive(Debug, Clone, Copy)]
pub struct TrackUpdate {
    pub track_idx: usize,
    /// Smoothed center before this frame's update.
    pub prev_ema: f32,
    /// Smoothed center after this frame's update.
    pub new_ema: f32,
    /// This frame's detection carried non-empty plate text.
    pub plate_in_frame: bool,
}

pub struct TrackStore {
    config: TrackConfig,
    tracks: Vec<Track>,
    next_id: u64,
}

impl TrackStore {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            tracks: Vec::with_capacity(32),
            next_id: 1,
        }
    }

    /// Greedy association: each detection goes to the highest-IoU live track
    /// above the threshold, ties broken by track age (first seen wins).
    /// Unmatched detections spawn a track only while under the cap.
    pub fn update(&mut self, detections: &[Detection], now: f64) -> Vec<TrackUpdate> {
        let mut updates = Vec::with_capacity(detections.len());

        for det in detections {
            if det.bbox.area() <= 0.0 {
                continue;
            }

            let mut best: Option<(usize, f32)> = None;
            for (idx, track) in self.tracks.iter().enumerate() {
                let iou = det.bbox.iou(&track.bbox);
                if iou >= self.config.iou_threshold && best.map_or(true, |(_, b)| iou > b) {
                    best = Some((idx, iou));
                }
            }

            let idx = match best {
                Some((idx, _)) => idx,
                None => {
                    if self.tracks.len() >= self.config.max_tracks {
                        continue;
                    }

                    let id = self.next_id;
                    self.next_id += 1;

                    debug!(id, cy = det.bbox.cy(), "track created");
                    self.tracks.push(Track::new(id, det.bbox, now));
                    self.tracks.len() - 1
                }
            };

            updates.push(self.apply(idx, det, now));
        }

        updates
    }

    fn apply(&mut self, idx: usize, det: &Detection, now: f64) -> TrackUpdate {
        let track = &mut self.tracks[idx];
        let observed = det.bbox.cy();

        let prev = if track.center_y_ema < 0.0 {
            observed
        } else {
            track.center_y_ema
        };

        let new = match self.config.smoothing {
            Smoothing::Ema => {
                self.config.ema_alpha * observed + (1.0 - self.config.ema_alpha) * prev
            }
            Smoothing::None => observed,
        };

        track.bbox = det.bbox;
        track.center_y_ema = new;
        track.last_seen_t = now;
        track.absorb_plate(det);

        TrackUpdate {
            track_idx: idx,
            prev_ema: prev,
            new_ema: new,
            plate_in_frame: det.plate_text().is_some(),
        }
    }

    /// Drops every track unseen for longer than the TTL. Idempotent for a
    /// fixed `now`.
    pub fn evict(&mut self, now: f64) {
        let ttl = self.config.ttl_s;
        let before = self.tracks.len();

        self.tracks.retain(|t| now - t.last_seen_t <= ttl);

        if self.tracks.len() != before {
            debug!(evicted = before - self.tracks.len(), "tracks expired");
        }
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn get_mut(&mut self, idx: usize) -> &mut Track {
        &mut self.tracks[idx]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
