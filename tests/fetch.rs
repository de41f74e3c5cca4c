//! Drives `fetch_alerts_from` against a one-shot local HTTP server.

use tfnsw_gtfs_alerts::{AlertsError, TransportMode, fetch_alerts_from};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Binds an ephemeral port, serves exactly one canned response, and hands
/// back the base URL plus the raw request bytes the client sent.
async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = socket.read(&mut buf).await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
    });

    (base, rx)
}

#[tokio::test]
async fn success_decodes_feed_and_sends_apikey_header() {
    let feed_json = r#"{
        "header": {"gtfsRealtimeVersion": "1.0", "incrementality": "FULL_DATASET", "timestamp": "1700000123"},
        "entity": [
            {"id": "1", "alert": {
                "activePeriod": [{"start": "1700000000"}],
                "headerText": {"translation": [{"language": "en", "text": "Delay"}]}
            }}
        ]
    }"#;
    let (base, request) = serve_once("200 OK", feed_json).await;

    let feed = fetch_alerts_from(&base, "secret", TransportMode::SydneyTrains)
        .await
        .unwrap();
    assert_eq!(feed.entity.len(), 1);
    assert_eq!(feed.entity[0].id, "1");

    let request = request.await.unwrap();
    assert!(
        request.starts_with("GET /sydneytrains?format=json HTTP/1.1"),
        "unexpected request line: {request}"
    );
    assert!(request.contains("authorization: apikey secret"));
}

#[tokio::test]
async fn upstream_failure_carries_status_and_raw_body() {
    let (base, _request) = serve_once("500 Internal Server Error", "upstream down").await;

    let err = fetch_alerts_from(&base, "secret", TransportMode::Buses)
        .await
        .unwrap_err();
    match err {
        AlertsError::Upstream { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected Upstream, got {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let (base, _request) = serve_once("200 OK", "this is not json").await;

    let err = fetch_alerts_from(&base, "secret", TransportMode::Ferries)
        .await
        .unwrap_err();
    assert!(matches!(err, AlertsError::Decode(_)), "got {err}");
}
