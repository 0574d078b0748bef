//! Uploader core: pure status-poll state machine, status view-model and
//! form field model.
mod effect;
mod form;
mod msg;
mod page;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::{Effect, PollOutcome};
pub use form::{FormFields, FormSnapshot};
pub use msg::Msg;
pub use page::{is_result_page, status_endpoint};
pub use state::{PollPhase, PollSession, PollerState, SessionId, MAX_ATTEMPTS};
pub use status::{JobState, JobStatus};
pub use update::{update, FAILURE_RETRY_DELAY, PROCESSING_POLL_DELAY};
pub use view_model::{StatusIcon, StatusView, DEFAULT_STATUS_MESSAGE};

