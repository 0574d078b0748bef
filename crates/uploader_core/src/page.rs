use url::Url;

use crate::SessionId;

/// Only result pages poll for status.
pub fn is_result_page(page_url: &Url) -> bool {
    page_url.path().contains("/result")
}

/// `{base}/status/{session_id}`, with the id encoded as a single path segment.
///
/// Returns `None` when `base` cannot carry a path (e.g. `mailto:`).
pub fn status_endpoint(base: &Url, session_id: &SessionId) -> Option<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        segments.push("status");
        segments.push(session_id.as_str());
    }
    Some(url)
}
