pub mod adapters;
pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;
pub mod reconcile;

pub use api::{TimelineReconciler, TimelineService};
pub use errors::{TlError, TlResult};
pub use model::{RenderedEntrySet, TimelineDiff, TimelineEntry, TimelineOp};
pub use policy::{LaneOffsets, TimelineLayout, TimelineLayoutHandle};
