//! Chart projection for the packet log.
//!
//! [`project`] is a pure function of one snapshot; [`ChartSlot`] tracks the
//! single chart instance across polls and session boundaries.

pub mod api;
pub mod model;
pub mod project;
pub mod slot;
pub mod tooltip;

pub use api::{ChartProjector, LaneProjector};
pub use model::{ChartInstanceId, ChartOp, LanePoint, LaneProjection, LaneScale};
pub use project::{point_labels, project, project_with};
pub use slot::{ChartSlot, SlotState};
pub use tooltip::{tooltip_for, Tooltip};
