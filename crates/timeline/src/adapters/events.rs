use crate::ports::EventsPort;
use tracing::{debug, info};

#[derive(Default)]
pub struct NoopEventsPort;

impl EventsPort for NoopEventsPort {
    fn timeline_reconciled(&self, _added: usize, _removed: usize, _rendered: usize) {}

    fn timeline_records_skipped(&self, _count: usize) {}

    fn timeline_cleared(&self, _removed: usize) {}
}

/// Reports reconciliation activity through `tracing`.
#[derive(Default)]
pub struct TracingEventsPort;

impl EventsPort for TracingEventsPort {
    fn timeline_reconciled(&self, added: usize, removed: usize, rendered: usize) {
        if added == 0 && removed == 0 {
            return;
        }
        debug!(added, removed, rendered, "timeline reconciled");
    }

    fn timeline_records_skipped(&self, count: usize) {
        if count > 0 {
            debug!(count, "malformed packet records skipped");
        }
    }

    fn timeline_cleared(&self, removed: usize) {
        info!(removed, "timeline cleared");
    }
}
