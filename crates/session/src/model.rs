use std::time::Duration;

use pathscope_core_types::TransmissionStatus;
use tokio::sync::oneshot;

use crate::error::{SessionError, SessionResult};

#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Delay between the end of one applied poll and the next fetch.
    pub interval: Duration,
    /// Fetch once on start-up to discover whether a session is already running.
    pub fetch_on_start: bool,
    pub command_buffer: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            fetch_on_start: true,
            command_buffer: 16,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.interval.is_zero() {
            return Err(SessionError::InvalidConfig(
                "poll interval must be greater than zero".into(),
            ));
        }
        if self.command_buffer == 0 {
            return Err(SessionError::InvalidConfig(
                "command buffer must hold at least one command".into(),
            ));
        }
        Ok(())
    }
}

pub type ToggleReply = oneshot::Sender<SessionResult<TransmissionStatus>>;

#[derive(Debug)]
pub enum SessionCommand {
    /// Ask the backend to start or stop; polling follows its confirmation.
    Toggle { reply: Option<ToggleReply> },
    /// Fetch once now, unless a fetch is already in flight.
    Refresh,
    /// Clear everything rendered so far.
    Reset,
    Shutdown,
}
