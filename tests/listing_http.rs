//! Listing endpoint client against a local HTTP server

mod common;

use common::mock_server::{dir, file, MockListingServer, MockReply};
use dirview::model::EntryKind;
use dirview::services::listing::{HttpListingSource, ListingError, ListingSource};
use serde_json::json;
use std::time::Duration;

fn source_for(server: &MockListingServer) -> HttpListingSource {
    HttpListingSource::new(server.base_url(), Duration::from_secs(2))
}

#[test]
fn test_posts_path_as_json() {
    common::tracing::init_tracing_from_env();
    let server = MockListingServer::start(|_| MockReply::listing(json!([])));

    source_for(&server).fetch_blocking("./home/docs").unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, "/api/directorycontents");
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(requests[0].body, r#"{"path":"./home/docs"}"#);
}

#[test]
fn test_decodes_listing() {
    let server = MockListingServer::start(|_| {
        MockReply::listing(json!([file("a.txt", "home/a.txt"), dir("docs", "home/docs")]))
    });

    let snapshots = source_for(&server)
        .fetch_blocking("/home")
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].file_name, "a.txt");
    assert_eq!(snapshots[0].kind, EntryKind::File);
    assert_eq!(snapshots[1].full_path, "home/docs");
    assert_eq!(snapshots[1].kind, EntryKind::Directory);
}

#[test]
fn test_application_error_is_a_response() {
    let server = MockListingServer::start(|_| MockReply::app_error("permission denied"));

    let response = source_for(&server).fetch_blocking("./root").unwrap();
    assert_eq!(
        response.into_result(),
        Err("permission denied".to_string())
    );
}

#[test]
fn test_error_status_with_listing_body_is_application_error() {
    let server = MockListingServer::start(|_| {
        MockReply::Body(403, json!({ "error": "forbidden" }).to_string())
    });

    let response = source_for(&server).fetch_blocking("./secret").unwrap();
    assert_eq!(response.error.as_deref(), Some("forbidden"));
}

#[test]
fn test_error_status_without_listing_body() {
    let server =
        MockListingServer::start(|_| MockReply::Body(500, "<html>boom</html>".to_string()));

    let result = source_for(&server).fetch_blocking("./home");
    assert_eq!(result.unwrap_err(), ListingError::Status { status: 500 });
}

#[test]
fn test_malformed_body_is_decode_error() {
    let server = MockListingServer::start(|_| MockReply::Body(200, "not json".to_string()));

    let result = source_for(&server).fetch_blocking("./home");
    assert!(matches!(result, Err(ListingError::Decode(_))));
}

#[test]
fn test_timeout_is_transport_error() {
    let server = MockListingServer::start(|_| {
        MockReply::listing(json!([])).after(Duration::from_millis(600))
    });
    let source = HttpListingSource::new(server.base_url(), Duration::from_millis(150));

    let result = source.fetch_blocking("./slow");
    assert!(matches!(result, Err(ListingError::Transport(_))));
}

#[tokio::test]
async fn test_async_list_runs_off_the_runtime_thread() {
    let server = MockListingServer::start(|path| {
        MockReply::listing(json!([file("x.rs", &format!("{}/x.rs", path.trim_start_matches("./")))]))
    });
    let source = source_for(&server);

    let response = source.list("./proj").await.unwrap();
    let snapshots = response.into_result().unwrap();
    assert_eq!(snapshots[0].full_path, "proj/x.rs");
    assert_eq!(server.requested_paths(), vec!["./proj".to_string()]);
}
