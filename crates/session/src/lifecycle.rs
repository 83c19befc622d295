use pathscope_core_types::TransmissionStatus;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::metrics;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Idle,
    Running,
    Completed,
}

impl LifecycleState {
    fn from_status(status: &TransmissionStatus) -> Option<Self> {
        match status {
            TransmissionStatus::Idle => Some(LifecycleState::Idle),
            TransmissionStatus::Running => Some(LifecycleState::Running),
            TransmissionStatus::Completed => Some(LifecycleState::Completed),
            TransmissionStatus::Unknown(_) => None,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Running => "running",
            LifecycleState::Completed => "completed",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    StartPolling,
    StopPolling,
    DestroyChart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
    pub actions: Vec<LifecycleAction>,
}

impl Transition {
    fn stay(state: LifecycleState) -> Self {
        Self {
            from: state,
            to: state,
            actions: Vec::new(),
        }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn requires(&self, action: LifecycleAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Session state machine driven only by the reported transmission status.
#[derive(Debug, Default)]
pub struct SessionLifecycleController {
    state: LifecycleState,
}

impl SessionLifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_polling(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Feeds one observed status. Unrecognised statuses never change state.
    pub fn observe(&mut self, status: &TransmissionStatus) -> Transition {
        let Some(next) = LifecycleState::from_status(status) else {
            if let TransmissionStatus::Unknown(raw) = status {
                if raw.is_empty() {
                    debug!(state = %self.state, "snapshot carried no transmission status");
                } else {
                    metrics::record_unknown_status();
                    warn!(status = %raw, state = %self.state, "ignoring unknown transmission status");
                }
            }
            return Transition::stay(self.state);
        };

        use LifecycleAction::*;
        use LifecycleState::*;

        let actions = match (self.state, next) {
            (from, to) if from == to => return Transition::stay(from),
            (Idle, Running) | (Completed, Running) => vec![StartPolling],
            (Running, Idle) => vec![StopPolling],
            (Running, Completed) => vec![StopPolling, DestroyChart],
            (Completed, Idle) => {
                debug!("session left completed state; nothing to tear down");
                Vec::new()
            }
            (Idle, Completed) => Vec::new(),
            _ => Vec::new(),
        };

        let transition = Transition {
            from: self.state,
            to: next,
            actions,
        };
        info!(from = %transition.from, to = %transition.to, "session transition");
        self.state = next;
        transition
    }
}
