use crate::model::{LaneProjection, LaneScale};
use crate::project::project_with;
use pathscope_core_types::SnapshotModel;

pub trait ChartProjector: Send + Sync {
    fn project(&self, snapshot: &SnapshotModel) -> LaneProjection;
}

#[derive(Debug, Clone, Default)]
pub struct LaneProjector {
    scale: LaneScale,
}

impl LaneProjector {
    pub fn new(scale: LaneScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> LaneScale {
        self.scale
    }
}

impl ChartProjector for LaneProjector {
    fn project(&self, snapshot: &SnapshotModel) -> LaneProjection {
        project_with(snapshot, &self.scale)
    }
}
