use std::sync::Arc;

use pretty_assertions::assert_eq;
use uploader_core::{JobState, PollOutcome, SessionId};
use uploader_engine::{
    FailureKind, FetchError, FetchSettings, HttpFetcher, Poller, ReqwestStatusSource, StatusSource,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> ReqwestStatusSource {
    source_with(server, FetchSettings::default())
}

fn source_with(server: &MockServer, settings: FetchSettings) -> ReqwestStatusSource {
    let fetcher = HttpFetcher::new(settings).expect("client");
    let base = Url::parse(&server.uri()).expect("server uri");
    ReqwestStatusSource::new(fetcher, base)
}

fn session(id: &str) -> SessionId {
    SessionId::parse(id).unwrap()
}

#[tokio::test]
async fn decodes_status_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"processing","progress":42,"message":"Uploading 3/7"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let status = source_for(&server)
        .fetch_status(&session("abc"))
        .await
        .expect("status ok");

    assert_eq!(status.status, JobState::Processing);
    assert_eq!(status.progress, 42);
    assert_eq!(status.message, "Uploading 3/7");
    assert_eq!(status.result, None);
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/abc"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw(r#"{"status":"success"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = source_for(&server)
        .fetch_status(&session("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status/unknown"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"status":"queued"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let source = source_for(&server);
    let err = source.fetch_status(&session("bad")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
    let err = source.fetch_status(&session("unknown")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let err = source_with(&server, settings)
        .fetch_status(&session("big"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

#[test]
fn fetch_error_reads_as_kind_and_message() {
    let err = FetchError::new(FailureKind::HttpStatus(503), "503 Service Unavailable");
    assert_eq!(err.to_string(), "http status 503: 503 Service Unavailable");

    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err.clone());
    assert_eq!(boxed.to_string(), err.to_string());
}

#[tokio::test]
async fn session_id_is_escaped_into_one_segment() {
    let server = MockServer::start().await;
    let source = source_for(&server);
    let url = source.endpoint(&session("a/b")).unwrap();
    assert!(url.as_str().ends_with("/status/a%2Fb"));
}

#[tokio::test]
async fn poller_against_http_stops_on_first_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/done"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"success","progress":100,"message":"ok","result":"R"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let source = Arc::new(source_for(&server));
    let sink = Arc::new(|_: &uploader_core::JobStatus| {});
    let report = Poller::new(source, sink, Some(session("done"))).run().await;

    assert_eq!(report.outcome, PollOutcome::Succeeded);
    assert_eq!(report.last_status.unwrap().result.as_deref(), Some("R"));
}
