//! REST client tests against a minimal in-process HTTP responder.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::*;
use crate::{DialogBackend, DialogError};

/// Read one HTTP/1.1 request and return its body.
async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return String::from_utf8_lossy(&buf[header_end + 4..header_end + 4 + content_length])
                    .into_owned();
            }
        }
    }
    String::new()
}

/// Serve exactly one response and hand back the request body.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhooks/rest/webhook", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request_body = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.ok();
        request_body
    });

    (url, handle)
}

fn client_for(url: &str) -> RestClient {
    RestClient::new(RestConfig::new(url).with_timeout(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn posts_message_and_sender_id() {
    let (url, server) = serve_once("200 OK", r#"[{"recipient_id":"user2","text":"hi there"}]"#).await;
    let client = client_for(&url);

    let fragments = client.send("hallo", "user2").await.unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].text.as_deref(), Some("hi there"));

    let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(request["message"], "hallo");
    assert_eq!(request["sender_id"], "user2");
}

#[tokio::test]
async fn empty_message_is_still_posted() {
    let (url, server) = serve_once("200 OK", "[]").await;
    let client = client_for(&url);

    let fragments = client.send("", "user1").await.unwrap();
    assert!(fragments.is_empty());

    let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(request["message"], "");
}

#[tokio::test]
async fn decodes_text_and_command_fragments() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"[{"text":"bye for now"},{"custom":{"commands":"stop"}}]"#,
    )
    .await;
    let client = client_for(&url);

    let fragments = client.send("goodbye", "user3").await.unwrap();
    assert_eq!(fragments.len(), 2);
    assert!(!fragments[0].is_stop_command());
    assert!(fragments[1].is_stop_command());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let (url, _server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    let client = client_for(&url);

    let err = client.send("hallo", "user2").await.unwrap_err();
    match err {
        DialogError::BackendStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected BackendStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (url, _server) = serve_once("200 OK", "<html>rasa is starting</html>").await;
    let client = client_for(&url);

    let err = client.send("hallo", "user2").await.unwrap_err();
    assert!(matches!(err, DialogError::BackendMalformedResponse(_)));
}

#[tokio::test]
async fn object_instead_of_array_is_malformed() {
    let (url, _server) = serve_once("200 OK", r#"{"text":"hi"}"#).await;
    let client = client_for(&url);

    let err = client.send("hallo", "user2").await.unwrap_err();
    assert!(matches!(err, DialogError::BackendMalformedResponse(_)));
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhooks/rest/webhook", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(&url);
    let err = client.send("hallo", "user2").await.unwrap_err();
    assert!(matches!(err, DialogError::BackendUnreachable(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhooks/rest/webhook", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let client =
        RestClient::new(RestConfig::new(&url).with_timeout(Duration::from_millis(200))).unwrap();
    let err = client.send("hallo", "user2").await.unwrap_err();
    assert!(matches!(err, DialogError::Timeout));
}

#[test]
fn parse_response_reports_body_preview() {
    let err = RestClient::parse_response("not json").unwrap_err();
    assert!(err.to_string().contains("not json"));
}

#[test]
fn config_defaults_are_bounded() {
    let config = RestConfig::new("http://localhost:5005/webhooks/rest/webhook");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
}
