use serde_derive::{Deserialize, Serialize};

use crate::bbox::BBox;
use crate::store::Track;

/// An accepted, debounced change of the stable motion side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CrossingEvent {
    pub frame_index: u64,
    pub ratio: f64,
    pub area: f64,
    pub direction_ok: bool,
}

/// A validated A→B traversal with its computed speed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpeedEvent {
    pub frame_index: u64,
    pub track_id: u64,
    pub plate_text: String,
    pub plate_confidence: f32,
    pub speed_kmh: f64,
    pub dt_s: f64,
}

/// Point-in-time view of one live track.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub id: u64,
    pub bbox: BBox,
    /// Valid only when `fired` is set.
    pub speed_kmh: f64,
    pub fired: bool,
    pub best_plate_text: String,
}

impl From<&Track> for TrackSnapshot {
    fn from(t: &Track) -> Self {
        Self {
            id: t.id,
            bbox: t.bbox,
            speed_kmh: t.speed_kmh,
            fired: t.fired,
            best_plate_text: t.best_plate_text.clone(),
        }
    }
}

/// Everything the engine derived from one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub tracks: Vec<TrackSnapshot>,
    pub crossing: Option<CrossingEvent>,
    pub speeds: Vec<SpeedEvent>,
    /// True from the first accepted crossing onward; used upstream to gate
    /// OCR and track updates, never consumed inside the engine.
    pub post_crossing: bool,
}
