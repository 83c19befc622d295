pub mod api;
pub mod context;
pub mod driver;
pub mod error;
pub mod labels;
pub mod lifecycle;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod render;

pub use api::SessionHandle;
pub use context::SessionContext;
pub use driver::SessionDriver;
pub use error::{SessionError, SessionResult, SinkError, SourceError};
pub use labels::{AggregateLabels, PathLabel};
pub use lifecycle::{LifecycleAction, LifecycleState, SessionLifecycleController, Transition};
pub use model::{PollConfig, SessionCommand};
pub use ports::SnapshotSource;
pub use render::{RecordingSink, RenderOp, RenderSink};
