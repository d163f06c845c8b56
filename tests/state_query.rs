// tests/state_query.rs
// Wire-level tests against a local fixture server.

use agent_state_client::client::{HttpStateClient, StateQuery};
use agent_state_client::config::ServiceConfig;
use agent_state_client::domain::errors::ClientError;
use agent_state_client::domain::models::StateResponse;

use futures_util::future::join;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

/// Serve a fixed HTTP response on a fresh local port, optionally delaying
/// each response. Returns the base URL to point the client at.
async fn spawn_fixture_server(
    status_line: &'static str,
    body: &'static str,
    delay: Duration,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> HttpStateClient {
    HttpStateClient::new(&ServiceConfig {
        base_url: base_url.to_string(),
        auth_token: None,
        headers: Vec::new(),
    })
    .unwrap()
}

#[tokio::test]
async fn snapshot_decodes_with_absent_fields_left_absent() {
    let base_url = spawn_fixture_server(
        "200 OK",
        r#"{"portfolio": {}, "prices": {}, "open_orders": [], "is_healthy": true}"#,
        Duration::ZERO,
    )
    .await;

    let state = client_for(&base_url).get_state().await.unwrap();

    assert_eq!(state.is_healthy, Some(true));
    assert_eq!(state.open_orders.as_deref(), Some(&[][..]));
    assert_eq!(state.current_period, None);
    assert_eq!(state.current_state, None);
    assert_eq!(state.total_open_orders, None);
}

#[tokio::test]
async fn non_2xx_exposes_status_and_raw_body() {
    let base_url = spawn_fixture_server(
        "500 Internal Server Error",
        "internal error",
        Duration::ZERO,
    )
    .await;

    let err = client_for(&base_url).get_state().await.err().unwrap();

    match err {
        ClientError::Api {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
            assert_eq!(body, "internal error");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let base_url = spawn_fixture_server("200 OK", "not json at all", Duration::ZERO).await;

    let err = client_for(&base_url).get_state().await.err().unwrap();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn transport_failure_surfaces_distinctly() {
    // Bind then drop to get a port with nothing listening on it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{}", addr))
        .get_state()
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn cancel_before_completion_yields_canceled() {
    let base_url =
        spawn_fixture_server("200 OK", "{}", Duration::from_secs(30)).await;
    let client = client_for(&base_url);

    let handle = client.query_state();
    sleep(Duration::from_millis(50)).await;
    assert!(!handle.is_finished());

    handle.cancel();
    let outcome = handle.await;
    assert!(matches!(outcome, Err(ClientError::Canceled)));
}

#[tokio::test]
async fn concurrent_handles_are_independent() {
    let slow_url = spawn_fixture_server("200 OK", "{}", Duration::from_secs(30)).await;
    let fast_url = spawn_fixture_server(
        "200 OK",
        r#"{"is_healthy": false, "current_state": "rebalancing"}"#,
        Duration::ZERO,
    )
    .await;

    let slow_client = client_for(&slow_url);
    let fast_client = client_for(&fast_url);

    let slow_handle = slow_client.query_state();
    let fast_handle = fast_client.query_state();

    slow_handle.cancel();
    let (slow_outcome, fast_outcome) = join(slow_handle, fast_handle).await;

    assert!(matches!(slow_outcome, Err(ClientError::Canceled)));
    let state = fast_outcome.unwrap();
    assert_eq!(state.is_healthy, Some(false));
    assert_eq!(state.current_state.as_deref(), Some("rebalancing"));
}

#[tokio::test]
async fn injects_configured_headers_on_the_wire() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 2048];
        let n = socket.read(&mut buf).await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
        let response = "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}";
        socket.write_all(response.as_bytes()).await.unwrap();
    });

    let client = HttpStateClient::new(&ServiceConfig {
        base_url: format!("http://{}", addr),
        auth_token: Some("secret".to_string()),
        headers: vec![("x-api-key".to_string(), "abc".to_string())],
    })
    .unwrap();

    let state = client.get_state().await.unwrap();
    assert_eq!(state, StateResponse::default());

    let request_text = rx.await.unwrap().to_lowercase();
    assert!(request_text.starts_with("get / http/1.1"));
    assert!(request_text.contains("authorization: bearer secret"));
    assert!(request_text.contains("x-api-key: abc"));
}
