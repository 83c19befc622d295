use pathscope_core_types::{IdentityKey, Lane};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a constructed chart instance, assigned by [`crate::ChartSlot`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartInstanceId(pub u64);

impl fmt::Display for ChartInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

/// Constant y-value each lane is drawn at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaneScale {
    pub path_a: f64,
    pub path_b: f64,
    pub ack: f64,
}

impl Default for LaneScale {
    fn default() -> Self {
        Self {
            path_a: 3.0,
            path_b: 2.0,
            ack: 1.0,
        }
    }
}

impl LaneScale {
    pub fn y(&self, lane: Lane) -> f64 {
        match lane {
            Lane::PathA => self.path_a,
            Lane::PathB => self.path_b,
            Lane::Ack => self.ack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanePoint {
    /// Seconds since the earliest record of the snapshot.
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub key: IdentityKey,
}

/// Full per-lane datasets for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaneProjection {
    pub path_a: Vec<LanePoint>,
    pub path_b: Vec<LanePoint>,
    pub ack: Vec<LanePoint>,
}

impl LaneProjection {
    pub fn lane(&self, lane: Lane) -> &[LanePoint] {
        match lane {
            Lane::PathA => &self.path_a,
            Lane::PathB => &self.path_b,
            Lane::Ack => &self.ack,
        }
    }

    pub(crate) fn lane_mut(&mut self, lane: Lane) -> &mut Vec<LanePoint> {
        match lane {
            Lane::PathA => &mut self.path_a,
            Lane::PathB => &mut self.path_b,
            Lane::Ack => &mut self.ack,
        }
    }

    pub fn len(&self) -> usize {
        self.path_a.len() + self.path_b.len() + self.ack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = &LanePoint> {
        self.path_a.iter().chain(&self.path_b).chain(&self.ack)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChartOp {
    Construct {
        id: ChartInstanceId,
        data: LaneProjection,
    },
    /// Replace the instance's per-lane arrays in place.
    Patch {
        id: ChartInstanceId,
        data: LaneProjection,
    },
    Redraw {
        id: ChartInstanceId,
    },
    Destroy {
        id: ChartInstanceId,
    },
}

impl ChartOp {
    pub fn id(&self) -> ChartInstanceId {
        match self {
            ChartOp::Construct { id, .. }
            | ChartOp::Patch { id, .. }
            | ChartOp::Redraw { id }
            | ChartOp::Destroy { id } => *id,
        }
    }
}
