use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use scraper::{Html, Selector};
use thiserror::Error;
use uploader_core::{is_result_page, SessionId};
use uploader_logging::{uploader_debug, uploader_info, Subsystem};
use url::Url;

use crate::{FetchError, HttpFetcher};

/// `<meta name="session-id" content="...">` on the result page.
const SESSION_META_SELECTOR: &str = r#"meta[name="session-id"]"#;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode page with {encoding}")]
    DecodeFailure { encoding: String },
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("result page fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Turns page bytes into text: BOM first, then the Content-Type charset,
/// then statistical detection.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<String, DecodeError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

/// Reads the session identifier from page metadata. Blank content counts
/// as absent.
pub fn session_id_from_html(html: &str) -> Option<SessionId> {
    let selector = Selector::parse(SESSION_META_SELECTOR).ok()?;
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(SessionId::parse)
}

/// Loads the session identifier the way the result page script does.
///
/// Pages outside `/result` never poll, so they are not even fetched and
/// `Ok(None)` is returned.
pub async fn discover_session(
    fetcher: &HttpFetcher,
    page_url: &Url,
) -> Result<Option<SessionId>, PageError> {
    if !is_result_page(page_url) {
        uploader_debug!(Subsystem::Page, "{} is not a result page", page_url);
        return Ok(None);
    }

    let body = fetcher.get(page_url, "text/html").await?;
    let html = decode_page(&body.bytes, body.content_type.as_deref())?;
    let session_id = session_id_from_html(&html);
    match &session_id {
        Some(id) => uploader_info!(Subsystem::Page, "session={} page={}", id, body.final_url),
        None => uploader_info!(Subsystem::Page, "no session id on {}", body.final_url),
    }
    Ok(session_id)
}
