pub mod bbox;
pub mod clock;
pub mod config;
pub mod crossing;
pub mod detection;
pub mod error;
pub mod event;
pub mod frame;
pub mod region;
pub mod speed;
pub mod store;

pub use bbox::BBox;
pub use clock::FrameClock;
pub use config::{Config, Smoothing};
pub use detection::{Detection, PlateReading};
pub use error::Error;
pub use event::{CrossingEvent, FrameReport, SpeedEvent, TrackSnapshot};
pub use frame::{FrameInput, MotionObservation};
pub use region::Region;

use nalgebra as na;

use crossing::CrossingDetector;
use speed::SpeedEstimator;
use store::TrackStore;

/// Per-frame analysis seam, so drivers can hold the engine behind a trait
/// next to the detector and motion providers.
pub trait Analyze {
    fn process(&mut self, input: &FrameInput) -> FrameReport;
    fn reset(&mut self);
}

/// One camera stream's tracking, crossing and speed state.
///
/// Streams are independent: to process N cameras in parallel, instantiate N
/// engines. All state lives in the instance; there are no process-wide
/// singletons, and nothing here blocks or suspends.
pub struct SpeedGate {
    store: TrackStore,
    crossing: CrossingDetector,
    speed: SpeedEstimator,
    region: Region,
}

impl SpeedGate {
    pub fn new(config: Config, region: Region) -> Result<Self, Error> {
        config.validate()?;

        let Config {
            track,
            crossing,
            speed,
        } = config;

        Ok(Self {
            speed: SpeedEstimator::new(speed, &region),
            store: TrackStore::new(track),
            crossing: CrossingDetector::new(crossing),
            region,
        })
    }

    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[inline]
    pub fn tracks(&self) -> Vec<TrackSnapshot> {
        self.store.tracks().iter().map(Into::into).collect()
    }
}

impl Analyze for SpeedGate {
    /// One synchronous tick. Detections feed the track store first, the
    /// speed estimator consumes the updated track state, the crossing
    /// machine runs independently on the motion observation.
    fn process(&mut self, input: &FrameInput) -> FrameReport {
        let now = input.timestamp_s;
        let updates = self.store.update(&input.detections, now);

        let mut speeds = Vec::new();
        for u in &updates {
            let track = self.store.get_mut(u.track_idx);
            let center = na::Point2::new(track.bbox.cx(), track.bbox.cy());

            if !self.region.contains(center) {
                continue;
            }

            if let Some(event) = self.speed.observe(
                track,
                u.prev_ema,
                u.new_ema,
                u.plate_in_frame,
                now,
                input.frame_index,
            ) {
                speeds.push(event);
            }
        }

        self.store.evict(now);

        let crossing = self.crossing.observe(input.motion.as_ref(), input.frame_index);

        FrameReport {
            tracks: self.store.tracks().iter().map(Into::into).collect(),
            crossing,
            speeds,
            post_crossing: self.crossing.post_crossing(),
        }
    }

    fn reset(&mut self) {
        self.store.clear();
        self.crossing.reset();
    }
}
