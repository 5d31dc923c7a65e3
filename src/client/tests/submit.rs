//! Download submitter tests.

use super::*;
use crate::error::Error;
use crate::notifications::NotificationKind;
use crate::types::{Event, JobId, Status};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_submit_ok(server: &MockServer, id: &str) {
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"download_id": id})),
        )
        .mount(server)
        .await;
    // keep the freshly started poller fed with a quiet pending report
    Mock::given(method("GET"))
        .and(path(format!("/status/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "pending",
            "progress": 0
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_inputs_are_noops() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    assert!(client.submit("", "a").await.unwrap().is_none());
    assert!(client.submit("https://x/video", "  ").await.unwrap().is_none());

    assert!(client.store().is_empty());
    assert_eq!(client.active_poller_count().await, 0);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_successful_submit_prepends_pending_job() {
    let server = MockServer::start().await;
    mount_submit_ok(&server, "J1").await;

    let client = test_client(&server);
    let id = client.submit("https://x/video", "a").await.unwrap().unwrap();
    assert_eq!(id, JobId::from("J1"));

    let jobs = client.store().snapshot();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, JobId::from("J1"));
    assert_eq!(jobs[0].status, Status::Pending);
    assert_eq!(jobs[0].progress, 0.0);
    assert_eq!(jobs[0].format_id.as_deref(), Some("a"));

    assert!(client.is_polling(&id).await);
    client.shutdown().await;
}

#[tokio::test]
async fn test_submit_carries_probed_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/formats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "T",
            "formats": [{"format_id": "a", "ext": "mp4"}]
        })))
        .mount(&server)
        .await;
    mount_submit_ok(&server, "J1").await;

    let client = test_client(&server);
    client.resolve_formats("https://x/video").await.unwrap();
    client.submit("https://x/video", "a").await.unwrap();

    assert_eq!(
        client.store().snapshot()[0].title.as_deref(),
        Some("T")
    );
    client.shutdown().await;
}

#[tokio::test]
async fn test_submit_selected_submits_and_clears_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/formats/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "T",
            "formats": [
                {"format_id": "a", "ext": "mp4"},
                {"format_id": "b", "ext": "webm"}
            ]
        })))
        .mount(&server)
        .await;
    mount_submit_ok(&server, "J7").await;

    let client = test_client(&server);
    assert!(client.submit_selected().await.unwrap().is_none(), "nothing selected yet");

    client.resolve_formats("https://x/video").await.unwrap();
    client.select_format("b");
    let id = client.submit_selected().await.unwrap().unwrap();

    assert_eq!(id, JobId::from("J7"));
    assert!(client.selection().is_none(), "selection cleared after submission");
    assert_eq!(
        client.store().snapshot()[0].format_id.as_deref(),
        Some("b")
    );
    client.shutdown().await;
}

#[tokio::test]
async fn test_failed_submit_adds_no_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.submit("https://x/video", "a").await.unwrap_err();
    assert!(matches!(err, Error::Submit(_)));

    assert!(client.store().is_empty());
    assert_eq!(client.active_poller_count().await, 0);

    let notifications = client.notifications().active();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_submit_emits_job_queued_event() {
    let server = MockServer::start().await;
    mount_submit_ok(&server, "J1").await;

    let client = test_client(&server);
    let mut events = client.subscribe();
    client.submit("https://x/video", "a").await.unwrap();

    match events.recv().await.unwrap() {
        Event::JobQueued { id, .. } => assert_eq!(id, JobId::from("J1")),
        other => panic!("unexpected event: {other:?}"),
    }
    client.shutdown().await;
}

#[tokio::test]
async fn test_submit_after_shutdown_is_refused() {
    let server = MockServer::start().await;
    let client = test_client(&server);
    client.shutdown().await;

    let err = client.submit("https://x/video", "a").await.unwrap_err();
    assert!(matches!(err, Error::ShuttingDown));
    assert!(client.store().is_empty());
}
