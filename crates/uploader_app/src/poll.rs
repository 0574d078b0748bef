use std::sync::Arc;

use anyhow::Context;
use uploader_core::{PollOutcome, SessionId};
use uploader_engine::{discover_session, HttpFetcher, Poller, ReqwestStatusSource};
use uploader_logging::{uploader_info, Subsystem};
use url::Url;

use crate::config::AppConfig;
use crate::render::{outcome_line, TerminalRenderer};

/// Result-page behaviour: find the session, then poll until done.
pub async fn run(
    config: &AppConfig,
    page_url: &Url,
    session_override: Option<&str>,
) -> anyhow::Result<PollOutcome> {
    let fetcher = HttpFetcher::new(config.fetch_settings()).context("building HTTP client")?;

    let session_id = match session_override {
        Some(raw) => SessionId::parse(raw),
        None => discover_session(&fetcher, page_url)
            .await
            .with_context(|| format!("loading result page {page_url}"))?,
    };

    let base = match config.status_base()? {
        Some(base) => base,
        None => page_url.join("/").context("deriving status endpoint base")?,
    };
    uploader_info!(Subsystem::App, "status base {}", base);

    let source = Arc::new(ReqwestStatusSource::new(fetcher, base));
    let report = Poller::new(source, Arc::new(TerminalRenderer), session_id)
        .run()
        .await;

    println!("{}", outcome_line(report.outcome));
    Ok(report.outcome)
}
