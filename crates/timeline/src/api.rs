use crate::adapters::NoopEventsPort;
use crate::errors::TlResult;
use crate::model::{RenderedEntrySet, TimelineDiff, TimelineOp};
use crate::policy::{TimelineLayout, TimelineLayoutHandle};
use crate::ports::{EventsPort, LayoutPort};
use crate::reconcile::reconcile;
use pathscope_core_types::SnapshotModel;
use std::sync::Arc;

pub trait TimelineReconciler: Send + Sync {
    /// Pure diff of `snapshot` against `previous`; nothing is mutated.
    fn reconcile(&self, previous: &RenderedEntrySet, snapshot: &SnapshotModel) -> TimelineDiff;

    fn layout(&self) -> TimelineLayout;
}

pub struct TimelineService {
    layout: Arc<dyn LayoutPort>,
    events: Arc<dyn EventsPort>,
}

impl TimelineService {
    pub fn new(layout: Arc<dyn LayoutPort>, events: Arc<dyn EventsPort>) -> Self {
        Self { layout, events }
    }

    /// Service pinned to a private layout, validated up front.
    pub fn with_layout(layout: TimelineLayout) -> TlResult<Self> {
        layout.validate()?;
        Ok(Self::new(
            Arc::new(TimelineLayoutHandle::new_with(layout)),
            Arc::new(NoopEventsPort),
        ))
    }

    pub fn with_events(mut self, events: Arc<dyn EventsPort>) -> Self {
        self.events = events;
        self
    }

    /// Diffs, folds the diff into `rendered` and returns the sink operations.
    pub fn reconcile_and_absorb(
        &self,
        rendered: &mut RenderedEntrySet,
        snapshot: &SnapshotModel,
    ) -> Vec<TimelineOp> {
        let diff = self.reconcile(rendered, snapshot);
        self.events.timeline_records_skipped(diff.skipped);
        let ops = rendered.apply(&diff);
        self.events
            .timeline_reconciled(diff.to_add.len(), diff.to_remove.len(), rendered.len());
        ops
    }

    pub fn reset(&self, rendered: &mut RenderedEntrySet) -> Vec<TimelineOp> {
        let removed = rendered.len();
        let ops = rendered.clear();
        self.events.timeline_cleared(removed);
        ops
    }
}

impl Default for TimelineService {
    fn default() -> Self {
        Self::new(
            Arc::new(TimelineLayoutHandle::new_with(TimelineLayout::default())),
            Arc::new(NoopEventsPort),
        )
    }
}

impl TimelineReconciler for TimelineService {
    fn reconcile(&self, previous: &RenderedEntrySet, snapshot: &SnapshotModel) -> TimelineDiff {
        reconcile(previous, snapshot, &self.layout.layout())
    }

    fn layout(&self) -> TimelineLayout {
        self.layout.layout()
    }
}
