use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use uploader_core::{status_endpoint, JobStatus, SessionId};
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// `None` keeps the transport default (no limit).
    pub connect_timeout: Option<Duration>,
    /// `None` keeps the transport default (no limit).
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            max_bytes: 1024 * 1024,
        }
    }
}

/// Raw response body plus what the caller needs to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBody {
    pub final_url: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Thin wrapper over one shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    /// GET `url`; any non-success status is an error.
    pub async fn get(&self, url: &Url, accept: &str) -> Result<FetchedBody, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedBody {
            final_url,
            content_type,
            bytes,
        })
    }
}

/// Where the poller gets job status from.
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, session_id: &SessionId) -> Result<JobStatus, FetchError>;
}

/// `GET {base}/status/{session_id}` over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestStatusSource {
    fetcher: HttpFetcher,
    base: Url,
}

impl ReqwestStatusSource {
    pub fn new(fetcher: HttpFetcher, base: Url) -> Self {
        Self { fetcher, base }
    }

    pub fn endpoint(&self, session_id: &SessionId) -> Result<Url, FetchError> {
        status_endpoint(&self.base, session_id).ok_or_else(|| {
            FetchError::new(FailureKind::InvalidUrl, format!("cannot-be-a-base url {}", self.base))
        })
    }
}

#[async_trait::async_trait]
impl StatusSource for ReqwestStatusSource {
    async fn fetch_status(&self, session_id: &SessionId) -> Result<JobStatus, FetchError> {
        let url = self.endpoint(session_id)?;
        let body = self.fetcher.get(&url, "application/json").await?;
        serde_json::from_slice(&body.bytes)
            .map_err(|err| FetchError::new(FailureKind::Malformed, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
