use std::time::Duration;

use crate::{JobStatus, SessionId};

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one status request. `attempt` is 1-based.
    FetchStatus { session_id: SessionId, attempt: u32 },
    /// Hand the payload to the render callback.
    Render(JobStatus),
    /// Deliver `Msg::PollDue` after `delay`.
    Schedule { delay: Duration },
    /// Polling is over for good.
    Stop(PollOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No session identifier; no request was issued.
    NotStarted,
    Succeeded,
    Failed,
    /// The attempt budget ran out before a terminal status arrived.
    Exhausted,
}
