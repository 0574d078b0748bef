use std::collections::VecDeque;
use std::sync::Arc;

use uploader_core::{update, Effect, JobStatus, Msg, PollOutcome, PollSession, PollerState, SessionId};
use uploader_logging::{uploader_debug, uploader_info, uploader_warn, Subsystem};

use crate::StatusSource;

/// Receives every status payload the poller accepts, in order.
pub trait RenderSink: Send + Sync {
    fn render(&self, status: &JobStatus);
}

impl<F> RenderSink for F
where
    F: Fn(&JobStatus) + Send + Sync,
{
    fn render(&self, status: &JobStatus) {
        self(status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    /// Status requests actually issued.
    pub attempts: u32,
    /// What is left on screen.
    pub last_status: Option<JobStatus>,
}

/// Drives one poll session to completion.
///
/// There is no way to stop a running poller early: it ends on a terminal
/// status or when the attempt budget is spent. Dropping the future is the
/// only teardown.
pub struct Poller {
    source: Arc<dyn StatusSource>,
    sink: Arc<dyn RenderSink>,
    state: PollerState,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn RenderSink>,
        session_id: Option<SessionId>,
    ) -> Self {
        Self {
            source,
            sink,
            state: PollerState::new(session_id),
        }
    }

    pub fn with_session(
        source: Arc<dyn StatusSource>,
        sink: Arc<dyn RenderSink>,
        session: PollSession,
    ) -> Self {
        Self {
            source,
            sink,
            state: PollerState::with_session(session),
        }
    }

    pub async fn run(self) -> PollReport {
        let Poller {
            source,
            sink,
            mut state,
        } = self;

        let mut outcome = PollOutcome::NotStarted;
        let mut pending = VecDeque::new();
        let (next, effects) = update(state, Msg::Start);
        state = next;
        pending.extend(effects);

        while let Some(effect) = pending.pop_front() {
            let msg = match effect {
                Effect::FetchStatus {
                    session_id,
                    attempt,
                } => {
                    uploader_debug!(
                        Subsystem::Poller,
                        "poll session={} attempt={}",
                        session_id,
                        attempt
                    );
                    match source.fetch_status(&session_id).await {
                        Ok(status) => Msg::StatusReceived(status),
                        Err(err) => {
                            // Never surfaced to the user; the retry path handles it.
                            uploader_warn!(
                                Subsystem::Poller,
                                "status check failed session={} attempt={}: {}",
                                session_id,
                                attempt,
                                err
                            );
                            Msg::PollFailed
                        }
                    }
                }
                Effect::Render(status) => {
                    sink.render(&status);
                    continue;
                }
                Effect::Schedule { delay } => {
                    tokio::time::sleep(delay).await;
                    Msg::PollDue
                }
                Effect::Stop(stopped) => {
                    outcome = stopped;
                    continue;
                }
            };

            let (next, effects) = update(state, msg);
            state = next;
            pending.extend(effects);
        }

        match outcome {
            PollOutcome::NotStarted => {
                uploader_debug!(Subsystem::Poller, "no session id, polling disabled")
            }
            PollOutcome::Exhausted => uploader_info!(
                Subsystem::Poller,
                "max polling attempts reached ({})",
                state.attempt_count()
            ),
            PollOutcome::Succeeded | PollOutcome::Failed => uploader_info!(
                Subsystem::Poller,
                "polling finished: {:?} after {} attempts",
                outcome,
                state.attempt_count()
            ),
        }

        PollReport {
            outcome,
            attempts: state.attempt_count(),
            last_status: state.last_status().cloned(),
        }
    }
}
