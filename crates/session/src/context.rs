use pathscope_chart::{ChartOp, ChartProjector, ChartSlot, LaneProjector};
use pathscope_core_types::{SessionId, SnapshotModel, ToggleResponse};
use pathscope_timeline::{RenderedEntrySet, TimelineService};
use tracing::{debug, info};

use crate::labels::AggregateLabels;
use crate::lifecycle::{LifecycleAction, LifecycleState, SessionLifecycleController, Transition};
use crate::metrics;
use crate::render::RenderOp;

/// Everything the reconciliation core remembers between polls.
///
/// Owned by one driver task and mutated only from its loop, so nothing in
/// here is locked.
pub struct SessionContext {
    lifecycle: SessionLifecycleController,
    rendered: RenderedEntrySet,
    chart: ChartSlot,
    labels: Option<AggregateLabels>,
    epoch: u64,
    session_id: Option<SessionId>,
    timeline: TimelineService,
    projector: LaneProjector,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(TimelineService::default(), LaneProjector::default())
    }
}

impl SessionContext {
    pub fn new(timeline: TimelineService, projector: LaneProjector) -> Self {
        Self {
            lifecycle: SessionLifecycleController::new(),
            rendered: RenderedEntrySet::new(),
            chart: ChartSlot::new(),
            labels: None,
            epoch: 0,
            session_id: None,
            timeline,
            projector,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_polling(&self) -> bool {
        self.lifecycle.is_polling()
    }

    pub fn rendered(&self) -> &RenderedEntrySet {
        &self.rendered
    }

    pub fn chart(&self) -> &ChartSlot {
        &self.chart
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Polling generation. Fetches issued under an older epoch are stale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Reconciles one snapshot: lifecycle first, then labels, timeline and
    /// chart.
    pub fn apply_snapshot(&mut self, snapshot: &SnapshotModel) -> Vec<RenderOp> {
        let transition = self.lifecycle.observe(snapshot.status());
        let mut ops = Vec::new();

        let labels = AggregateLabels::from_snapshot(snapshot);
        if self.labels.as_ref() != Some(&labels) {
            self.labels = Some(labels.clone());
            ops.push(RenderOp::Labels(labels));
        }

        if !snapshot.skipped.is_empty() {
            metrics::record_skipped(snapshot.skipped.len());
            for skipped in &snapshot.skipped {
                debug!(index = skipped.index, reason = %skipped.reason, "skipping packet record");
            }
        }
        ops.extend(
            self.timeline
                .reconcile_and_absorb(&mut self.rendered, snapshot)
                .into_iter()
                .map(RenderOp::from),
        );

        ops.extend(self.sync_chart(snapshot, &transition));
        ops
    }

    /// Applies a confirmed toggle. A new session id wipes what the previous
    /// session left on screen.
    pub fn apply_toggle(&mut self, response: &ToggleResponse) -> (Vec<RenderOp>, Transition) {
        let mut ops = Vec::new();
        if let Some(incoming) = &response.session_id {
            let switched = matches!(&self.session_id, Some(current) if current != incoming);
            if switched {
                info!(session = %incoming, "new session reported; clearing view");
                ops.extend(self.reset());
            }
            self.session_id = Some(incoming.clone());
        }

        let transition = self.lifecycle.observe(&response.status);
        if transition.requires(LifecycleAction::DestroyChart) {
            ops.extend(self.destroy_chart());
        }
        (ops, transition)
    }

    /// Removes every timeline entry and tears down the chart.
    pub fn reset(&mut self) -> Vec<RenderOp> {
        let mut ops: Vec<RenderOp> = self
            .timeline
            .reset(&mut self.rendered)
            .into_iter()
            .map(RenderOp::from)
            .collect();
        ops.extend(self.destroy_chart());
        ops
    }

    fn sync_chart(&mut self, snapshot: &SnapshotModel, transition: &Transition) -> Vec<RenderOp> {
        if transition.requires(LifecycleAction::DestroyChart) {
            return self.destroy_chart();
        }
        if !self.lifecycle.is_polling() {
            return Vec::new();
        }
        let ops = self.chart.sync(self.projector.project(snapshot));
        if ops.iter().any(|op| matches!(op, ChartOp::Construct { .. })) {
            metrics::record_chart_construct();
        }
        ops.into_iter().map(RenderOp::from).collect()
    }

    fn destroy_chart(&mut self) -> Vec<RenderOp> {
        let ops = self.chart.destroy();
        if !ops.is_empty() {
            metrics::record_chart_destroy();
        }
        ops.into_iter().map(RenderOp::from).collect()
    }
}
