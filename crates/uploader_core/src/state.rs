use std::fmt;

use crate::{JobStatus, PollOutcome};

/// Upper bound on status requests issued for one session.
pub const MAX_ATTEMPTS: u32 = 60;

/// Opaque token correlating the page with a server-side processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Returns `None` for blank input; a missing id disables polling.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    pub session_id: SessionId,
    pub attempt_count: u32,
    pub max_attempts: u32,
}

impl PollSession {
    pub fn new(session_id: SessionId) -> Self {
        Self::with_max_attempts(session_id, MAX_ATTEMPTS)
    }

    pub fn with_max_attempts(session_id: SessionId, max_attempts: u32) -> Self {
        Self {
            session_id,
            attempt_count: 0,
            max_attempts,
        }
    }

    pub fn has_budget(&self) -> bool {
        self.attempt_count < self.max_attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
    Succeeded,
    Failed,
    Exhausted,
}

impl PollPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PollPhase::Succeeded | PollPhase::Failed | PollPhase::Exhausted
        )
    }

    pub(crate) fn outcome(self) -> Option<PollOutcome> {
        match self {
            PollPhase::Succeeded => Some(PollOutcome::Succeeded),
            PollPhase::Failed => Some(PollOutcome::Failed),
            PollPhase::Exhausted => Some(PollOutcome::Exhausted),
            PollPhase::Idle | PollPhase::Polling => None,
        }
    }
}

/// Everything one poller knows. Independent pollers own independent values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollerState {
    session: Option<PollSession>,
    phase: PollPhase,
    in_flight: bool,
    last_status: Option<JobStatus>,
}

impl PollerState {
    pub fn new(session_id: Option<SessionId>) -> Self {
        Self {
            session: session_id.map(PollSession::new),
            ..Self::default()
        }
    }

    pub fn with_session(session: PollSession) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&PollSession> {
        self.session.as_ref()
    }

    pub fn attempt_count(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.attempt_count)
    }

    pub fn last_status(&self) -> Option<&JobStatus> {
        self.last_status.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut PollSession> {
        self.session.as_mut()
    }

    pub(crate) fn set_phase(&mut self, phase: PollPhase) {
        self.phase = phase;
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    pub(crate) fn record_status(&mut self, status: JobStatus) {
        self.last_status = Some(status);
    }
}
