use crate::{JobState, JobStatus};

/// Shown while the server has not supplied a message yet.
pub const DEFAULT_STATUS_MESSAGE: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Spinner,
    Success,
    Error,
}

/// What the result page displays for one status payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub progress_percent: u8,
    pub progress_text: String,
    pub message: String,
    pub icon: StatusIcon,
    pub result: Option<String>,
    /// Follow-up actions are offered once the job reached a terminal state.
    pub actions_visible: bool,
}

impl StatusView {
    pub fn from_status(status: &JobStatus) -> Self {
        let progress_percent = status.progress.min(100) as u8;
        let message = if status.message.trim().is_empty() {
            DEFAULT_STATUS_MESSAGE.to_string()
        } else {
            status.message.clone()
        };
        let icon = match status.status {
            JobState::Processing => StatusIcon::Spinner,
            JobState::Success => StatusIcon::Success,
            JobState::Error => StatusIcon::Error,
        };

        Self {
            progress_percent,
            progress_text: format!("{progress_percent}%"),
            message,
            icon,
            result: status.result.clone().filter(|r| !r.is_empty()),
            actions_visible: status.status.is_terminal(),
        }
    }
}
