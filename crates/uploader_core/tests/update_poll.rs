use std::sync::Once;

use pretty_assertions::assert_eq;
use uploader_core::{
    update, Effect, JobState, JobStatus, Msg, PollOutcome, PollPhase, PollSession, PollerState,
    SessionId, FAILURE_RETRY_DELAY, MAX_ATTEMPTS, PROCESSING_POLL_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(uploader_logging::initialize_for_tests);
}

fn session(id: &str) -> SessionId {
    SessionId::parse(id).expect("non-empty id")
}

fn started(id: &str) -> PollerState {
    let (state, effects) = update(PollerState::new(Some(session(id))), Msg::Start);
    assert_eq!(
        effects,
        vec![Effect::FetchStatus {
            session_id: session(id),
            attempt: 1,
        }]
    );
    state
}

fn status(state: JobState, progress: u32, result: Option<&str>) -> JobStatus {
    JobStatus {
        status: state,
        progress,
        message: String::new(),
        result: result.map(str::to_string),
    }
}

#[test]
fn start_without_session_is_a_noop() {
    init_logging();
    let state = PollerState::new(None);
    let (next, effects) = update(state.clone(), Msg::Start);

    assert_eq!(next, state);
    assert_eq!(next.phase(), PollPhase::Idle);
    assert!(effects.is_empty());

    let (next, effects) = update(next, Msg::PollDue);
    assert_eq!(next.phase(), PollPhase::Idle);
    assert!(effects.is_empty());
}

#[test]
fn blank_session_id_is_absent() {
    assert_eq!(SessionId::parse("   "), None);
    assert_eq!(SessionId::parse(" abc ").unwrap().as_str(), "abc");
}

#[test]
fn processing_renders_then_schedules_two_seconds() {
    init_logging();
    let state = started("abc");
    let payload = status(JobState::Processing, 40, None);

    let (state, effects) = update(state, Msg::StatusReceived(payload.clone()));
    assert_eq!(
        effects,
        vec![
            Effect::Render(payload.clone()),
            Effect::Schedule {
                delay: PROCESSING_POLL_DELAY
            },
        ]
    );
    assert_eq!(state.phase(), PollPhase::Polling);
    assert_eq!(state.last_status(), Some(&payload));

    let (state, effects) = update(state, Msg::PollDue);
    assert_eq!(
        effects,
        vec![Effect::FetchStatus {
            session_id: session("abc"),
            attempt: 2,
        }]
    );
    assert_eq!(state.attempt_count(), 2);
}

#[test]
fn success_is_rendered_once_and_stops() {
    init_logging();
    let state = started("abc");
    let payload = status(JobState::Success, 100, Some("R"));

    let (state, effects) = update(state, Msg::StatusReceived(payload.clone()));
    assert_eq!(
        effects,
        vec![
            Effect::Render(payload.clone()),
            Effect::Stop(PollOutcome::Succeeded),
        ]
    );
    assert_eq!(state.phase(), PollPhase::Succeeded);

    // Absorbing: nothing brings the poller back.
    let (state, effects) = update(state, Msg::PollDue);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::StatusReceived(payload));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::Start);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PollPhase::Succeeded);
    assert_eq!(state.attempt_count(), 1);
}

#[test]
fn error_status_is_terminal() {
    init_logging();
    let state = started("abc");
    let payload = status(JobState::Error, 10, None);

    let (state, effects) = update(state, Msg::StatusReceived(payload.clone()));
    assert_eq!(
        effects,
        vec![Effect::Render(payload), Effect::Stop(PollOutcome::Failed)]
    );
    assert_eq!(state.phase(), PollPhase::Failed);

    let (state, effects) = update(state, Msg::PollFailed);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PollPhase::Failed);
}

#[test]
fn failure_retries_after_five_seconds_without_render() {
    init_logging();
    let state = started("abc");
    let (state, effects) = update(state, Msg::PollFailed);

    assert_eq!(
        effects,
        vec![Effect::Schedule {
            delay: FAILURE_RETRY_DELAY
        }]
    );
    assert_eq!(state.last_status(), None);
    assert_eq!(state.phase(), PollPhase::Polling);
}

#[test]
fn consecutive_failures_stop_after_max_attempts() {
    init_logging();
    let mut state = started("abc");
    let mut fetches = 1;

    loop {
        let (next, effects) = update(state, Msg::PollFailed);
        state = next;
        match effects.as_slice() {
            [Effect::Schedule { delay }] => {
                assert_eq!(*delay, FAILURE_RETRY_DELAY);
                let (next, effects) = update(state, Msg::PollDue);
                state = next;
                assert!(matches!(effects.as_slice(), [Effect::FetchStatus { .. }]));
                fetches += 1;
            }
            [Effect::Stop(outcome)] => {
                assert_eq!(*outcome, PollOutcome::Exhausted);
                break;
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    assert_eq!(fetches, MAX_ATTEMPTS);
    assert_eq!(state.attempt_count(), MAX_ATTEMPTS);
    assert_eq!(state.phase(), PollPhase::Exhausted);
}

#[test]
fn processing_at_last_attempt_exhausts_and_keeps_last_status() {
    init_logging();
    let session = PollSession::with_max_attempts(session("abc"), 2);
    let (state, _) = update(PollerState::with_session(session), Msg::Start);
    let first = status(JobState::Processing, 10, None);
    let (state, _) = update(state, Msg::StatusReceived(first));
    let (state, _) = update(state, Msg::PollDue);

    let second = status(JobState::Processing, 20, None);
    let (state, effects) = update(state, Msg::StatusReceived(second.clone()));
    assert_eq!(
        effects,
        vec![
            Effect::Render(second.clone()),
            Effect::Stop(PollOutcome::Exhausted),
        ]
    );
    assert_eq!(state.phase(), PollPhase::Exhausted);
    assert_eq!(state.last_status(), Some(&second));
    assert!(state.attempt_count() <= 2);
}

#[test]
fn poll_due_while_request_in_flight_is_ignored() {
    init_logging();
    let state = started("abc");
    assert!(state.is_in_flight());

    let (state, effects) = update(state, Msg::PollDue);
    assert!(effects.is_empty());
    assert_eq!(state.attempt_count(), 1);
}

#[test]
fn response_without_request_is_ignored() {
    init_logging();
    let state = started("abc");
    let (state, _) = update(
        state,
        Msg::StatusReceived(status(JobState::Processing, 5, None)),
    );
    assert!(!state.is_in_flight());

    let (state, effects) = update(
        state,
        Msg::StatusReceived(status(JobState::Success, 100, None)),
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), PollPhase::Polling);
}

#[test]
fn second_start_does_not_issue_another_request() {
    init_logging();
    let state = started("abc");
    let (state, effects) = update(state, Msg::Start);
    assert!(effects.is_empty());
    assert_eq!(state.attempt_count(), 1);
}

#[test]
fn independent_pollers_do_not_share_counters() {
    init_logging();
    let a = started("a");
    let b = started("b");
    let (a, _) = update(a, Msg::PollFailed);
    let (a, _) = update(a, Msg::PollDue);

    assert_eq!(a.attempt_count(), 2);
    assert_eq!(b.attempt_count(), 1);
}
