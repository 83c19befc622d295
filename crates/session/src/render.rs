use std::sync::Arc;

use parking_lot::Mutex;
use pathscope_chart::ChartOp;
use pathscope_timeline::TimelineOp;
use serde::Serialize;

use crate::error::SinkError;
use crate::labels::AggregateLabels;

/// One idempotent mutation of the visual surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", content = "op", rename_all = "snake_case")]
pub enum RenderOp {
    Timeline(TimelineOp),
    Chart(ChartOp),
    Labels(AggregateLabels),
}

impl From<TimelineOp> for RenderOp {
    fn from(op: TimelineOp) -> Self {
        RenderOp::Timeline(op)
    }
}

impl From<ChartOp> for RenderOp {
    fn from(op: ChartOp) -> Self {
        RenderOp::Chart(op)
    }
}

/// Applies render operations to whatever surface is in use.
pub trait RenderSink: Send {
    fn apply(&mut self, ops: &[RenderOp]) -> Result<(), SinkError>;
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn apply(&mut self, ops: &[RenderOp]) -> Result<(), SinkError> {
        (**self).apply(ops)
    }
}

/// Keeps every applied operation; clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    ops: Arc<Mutex<Vec<RenderOp>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<RenderOp> {
        self.ops.lock().clone()
    }

    pub fn take(&self) -> Vec<RenderOp> {
        std::mem::take(&mut *self.ops.lock())
    }

    pub fn len(&self) -> usize {
        self.ops.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().is_empty()
    }
}

impl RenderSink for RecordingSink {
    fn apply(&mut self, ops: &[RenderOp]) -> Result<(), SinkError> {
        self.ops.lock().extend_from_slice(ops);
        Ok(())
    }
}
