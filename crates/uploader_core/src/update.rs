use std::time::Duration;

use crate::{Effect, JobState, Msg, PollOutcome, PollPhase, PollSession, PollerState};

/// Delay before the next poll while the job reports `processing`.
pub const PROCESSING_POLL_DELAY: Duration = Duration::from_secs(2);
/// Delay before retrying after a failed poll.
pub const FAILURE_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pure update function: applies a message to state and returns any effects.
///
/// Terminal phases are absorbing: every message is ignored once polling has
/// succeeded, failed or run out of attempts.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    if state.phase().is_terminal() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Start => {
            // Without a session id the poller never leaves Idle.
            if state.phase() != PollPhase::Idle || state.session().is_none() {
                return (state, Vec::new());
            }
            state.set_phase(PollPhase::Polling);
            vec![issue_fetch(&mut state)]
        }
        Msg::PollDue => {
            // At most one request in flight.
            if state.phase() != PollPhase::Polling || state.is_in_flight() {
                return (state, Vec::new());
            }
            vec![issue_fetch(&mut state)]
        }
        Msg::StatusReceived(status) => {
            if !state.is_in_flight() {
                return (state, Vec::new());
            }
            state.set_in_flight(false);
            let job_state = status.status;
            state.record_status(status.clone());

            let mut effects = Vec::with_capacity(2);
            effects.push(Effect::Render(status));
            effects.push(match job_state {
                JobState::Success => stop(&mut state, PollPhase::Succeeded),
                JobState::Error => stop(&mut state, PollPhase::Failed),
                JobState::Processing => schedule_or_exhaust(&mut state, PROCESSING_POLL_DELAY),
            });
            effects
        }
        Msg::PollFailed => {
            if !state.is_in_flight() {
                return (state, Vec::new());
            }
            state.set_in_flight(false);
            vec![schedule_or_exhaust(&mut state, FAILURE_RETRY_DELAY)]
        }
    };

    (state, effects)
}

fn issue_fetch(state: &mut PollerState) -> Effect {
    let next = state.session_mut().and_then(|session| {
        if !session.has_budget() {
            return None;
        }
        session.attempt_count += 1;
        Some(Effect::FetchStatus {
            session_id: session.session_id.clone(),
            attempt: session.attempt_count,
        })
    });

    match next {
        Some(effect) => {
            state.set_in_flight(true);
            effect
        }
        None => stop(state, PollPhase::Exhausted),
    }
}

fn schedule_or_exhaust(state: &mut PollerState, delay: Duration) -> Effect {
    if state.session().is_some_and(PollSession::has_budget) {
        Effect::Schedule { delay }
    } else {
        stop(state, PollPhase::Exhausted)
    }
}

fn stop(state: &mut PollerState, phase: PollPhase) -> Effect {
    state.set_phase(phase);
    let outcome = phase.outcome().unwrap_or(PollOutcome::Exhausted);
    Effect::Stop(outcome)
}
