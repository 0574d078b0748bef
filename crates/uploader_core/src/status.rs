use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Processing state reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Success,
    Error,
}

impl JobState {
    /// `success` and `error` end polling for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Success | JobState::Error)
    }
}

/// One status payload as returned by `GET /status/{session_id}`.
///
/// Missing or `null` `progress` and `message` fields decode to their
/// defaults, as does a `progress` that is not a number. Fractional
/// progress is rounded. An unknown `status` value is a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    #[serde(default, deserialize_with = "lenient_progress")]
    pub progress: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl JobStatus {
    pub fn processing(progress: u32, message: impl Into<String>) -> Self {
        Self {
            status: JobState::Processing,
            progress,
            message: message.into(),
            result: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProgress {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_progress<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<RawProgress>::deserialize(deserializer)? {
        Some(RawProgress::Number(n)) => n,
        Some(RawProgress::Text(text)) => text.trim().parse().unwrap_or(0.0),
        Some(RawProgress::Other(_)) | None => 0.0,
    };
    // Saturating cast: negatives become 0.
    Ok(if value.is_finite() { value.round() as u32 } else { 0 })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
