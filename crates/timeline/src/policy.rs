use parking_lot::RwLock;
use pathscope_core_types::Lane;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::{TlError, TlResult};

/// Additive horizontal shift per lane, so lanes sharing one time axis do not
/// sit exactly on top of each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneOffsets {
    pub path_a: f64,
    pub path_b: f64,
    pub ack: f64,
}

impl Default for LaneOffsets {
    fn default() -> Self {
        Self {
            path_a: 25.0,
            path_b: 0.0,
            ack: 0.0,
        }
    }
}

impl LaneOffsets {
    pub fn get(&self, lane: Lane) -> f64 {
        match lane {
            Lane::PathA => self.path_a,
            Lane::PathB => self.path_b,
            Lane::Ack => self.ack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineLayout {
    pub px_per_second: f64,
    pub lane_offsets: LaneOffsets,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            px_per_second: 50.0,
            lane_offsets: LaneOffsets::default(),
        }
    }
}

impl TimelineLayout {
    /// Horizontal position of a record `delta_ms` after the earliest record
    /// of the current snapshot.
    pub fn offset(&self, lane: Lane, delta_ms: f64) -> f64 {
        delta_ms / 1000.0 * self.px_per_second + self.lane_offsets.get(lane)
    }

    pub fn validate(&self) -> TlResult<()> {
        if !self.px_per_second.is_finite() || self.px_per_second <= 0.0 {
            return Err(TlError::InvalidLayout(format!(
                "px_per_second must be a positive number, got {}",
                self.px_per_second
            )));
        }
        for lane in Lane::ALL {
            let offset = self.lane_offsets.get(lane);
            if !offset.is_finite() {
                return Err(TlError::InvalidLayout(format!(
                    "offset for lane {lane} is not finite"
                )));
            }
        }
        Ok(())
    }
}

/// Shared, swappable layout for services built with [`TimelineService::new`].
///
/// [`TimelineService::new`]: crate::TimelineService::new
#[derive(Clone)]
pub struct TimelineLayoutHandle {
    inner: Arc<RwLock<TimelineLayout>>,
}

impl TimelineLayoutHandle {
    pub fn new_with(layout: TimelineLayout) -> Self {
        Self {
            inner: Arc::new(RwLock::new(layout)),
        }
    }

    pub fn snapshot(&self) -> TimelineLayout {
        self.inner.read().clone()
    }

    pub fn update(&self, layout: TimelineLayout) {
        *self.inner.write() = layout;
    }
}

impl crate::ports::LayoutPort for TimelineLayoutHandle {
    fn layout(&self) -> TimelineLayout {
        self.snapshot()
    }
}
