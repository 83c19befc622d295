use crate::policy::TimelineLayout;

pub trait LayoutPort: Send + Sync {
    fn layout(&self) -> TimelineLayout;
}

pub trait EventsPort: Send + Sync {
    fn timeline_reconciled(&self, added: usize, removed: usize, rendered: usize);
    fn timeline_records_skipped(&self, count: usize);
    fn timeline_cleared(&self, removed: usize);
}
