//! End-to-end API tests.
//!
//! Each test spawns its own server on an ephemeral port and talks plain
//! HTTP/1.1 over a TcpStream, asserting on status codes and JSON envelopes.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::RwLock;

use lib_stack::BoundedStack;
use stackd::config::ServerConfig;
use stackd::server::HttpServer;

/// Spawns a service instance and returns its address.
async fn spawn_server(capacity: usize) -> SocketAddr {
    let stack = Arc::new(RwLock::new(BoundedStack::<i32>::new(capacity)));
    let server = HttpServer::new(stack);

    let config = ServerConfig {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        default_capacity: capacity,
    };
    let listener = HttpServer::bind(&config).await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    addr
}

/// Sends one request and returns (status code, raw head, parsed JSON body).
async fn request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, String, Value) {
    let mut stream = TcpStream::connect(addr).await.expect("connect");

    let body = body.unwrap_or("");
    let raw = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(raw.as_bytes()).await.expect("write request");

    // Server closes the connection after each response
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.expect("read response");
    let response = String::from_utf8(response).expect("utf8 response");

    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("header terminator present");
    let status: u16 = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("status code");

    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).expect("JSON body")
    };
    (status, head.to_string(), json)
}

#[tokio::test]
async fn initial_state_is_empty_with_configured_capacity() {
    let addr = spawn_server(10).await;
    let (status, _, body) = request(addr, "GET", "/api/stack", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["elements"], serde_json::json!([]));
    assert_eq!(body["data"]["size"], 0);
    assert_eq!(body["data"]["maxSize"], 10);
    assert_eq!(body["data"]["isEmpty"], true);
    assert_eq!(body["data"]["isFull"], false);
    assert_eq!(body["data"]["topElement"], Value::Null);
}

#[tokio::test]
async fn push_then_pop_follows_lifo_order() {
    let addr = spawn_server(10).await;

    let (status, _, body) =
        request(addr, "POST", "/api/stack/push", Some(r#"{"element": 10}"#)).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Element 10 pushed successfully");

    request(addr, "POST", "/api/stack/push", Some(r#"{"element": 20}"#)).await;

    let (status, _, body) = request(addr, "POST", "/api/stack/pop", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["poppedElement"], 20);
    assert_eq!(body["stack"]["topElement"], 10);
    assert_eq!(body["stack"]["size"], 1);
}

#[tokio::test]
async fn push_validation_failures_return_400() {
    let addr = spawn_server(10).await;

    for (payload, code) in [
        (r#"{"element": "seven"}"#, "InvalidInput"),
        (r#"{"element": 3.5}"#, "InvalidInput"),
        (r#"{}"#, "InvalidInput"),
        (r#"{"element": 1001}"#, "OutOfRange"),
        (r#"{"element": -1001}"#, "OutOfRange"),
    ] {
        let (status, _, body) = request(addr, "POST", "/api/stack/push", Some(payload)).await;
        assert_eq!(status, 400, "payload: {payload}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], code, "payload: {payload}");
    }

    // nothing got through
    let (_, _, body) = request(addr, "GET", "/api/stack", None).await;
    assert_eq!(body["data"]["size"], 0);
}

#[tokio::test]
async fn push_on_full_stack_reports_stack_full() {
    let addr = spawn_server(2).await;
    request(addr, "POST", "/api/stack/push", Some(r#"{"element": 1}"#)).await;
    request(addr, "POST", "/api/stack/push", Some(r#"{"element": 2}"#)).await;

    let (status, _, body) =
        request(addr, "POST", "/api/stack/push", Some(r#"{"element": 3}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "StackFull");
    assert_eq!(body["message"], "Stack is full. Cannot push more elements.");

    let (_, _, body) = request(addr, "GET", "/api/stack", None).await;
    assert_eq!(body["data"]["size"], 2);
    assert_eq!(body["data"]["topElement"], 2);
}

#[tokio::test]
async fn pop_on_empty_stack_reports_stack_empty() {
    let addr = spawn_server(10).await;
    let (status, _, body) = request(addr, "POST", "/api/stack/pop", None).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "StackEmpty");
    assert_eq!(body["message"], "Stack is empty. Cannot pop elements.");
}

#[tokio::test]
async fn clear_always_succeeds() {
    let addr = spawn_server(10).await;
    request(addr, "POST", "/api/stack/push", Some(r#"{"element": 5}"#)).await;

    let (status, _, body) = request(addr, "POST", "/api/stack/clear", None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Stack cleared successfully");
    assert_eq!(body["stack"]["isEmpty"], true);
    assert_eq!(body["stack"]["maxSize"], 10);
}

#[tokio::test]
async fn resize_endpoint_enforces_the_full_taxonomy() {
    let addr = spawn_server(5).await;
    for element in 1..=3 {
        let payload = format!(r#"{{"element": {element}}}"#);
        request(addr, "POST", "/api/stack/push", Some(&payload)).await;
    }

    let (status, _, body) =
        request(addr, "PUT", "/api/stack/size", Some(r#"{"maxSize": 0}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "InvalidInput");

    let (status, _, body) =
        request(addr, "PUT", "/api/stack/size", Some(r#"{"maxSize": 101}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "LimitExceeded");

    let (status, _, body) =
        request(addr, "PUT", "/api/stack/size", Some(r#"{"maxSize": 2}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "CapacityTooSmall");
    assert_eq!(
        body["message"],
        "Cannot set size to 2. Current stack has 3 elements."
    );

    // capacity untouched by the failures above
    let (_, _, body) = request(addr, "GET", "/api/stack", None).await;
    assert_eq!(body["data"]["maxSize"], 5);

    let (status, _, body) =
        request(addr, "PUT", "/api/stack/size", Some(r#"{"maxSize": 50}"#)).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Stack size updated to 50");
    assert_eq!(body["stack"]["maxSize"], 50);
}

#[tokio::test]
async fn unmatched_routes_return_404_envelope() {
    let addr = spawn_server(10).await;

    let (status, _, body) = request(addr, "GET", "/api/unknown", None).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");

    // wrong method on a known path is unmatched too
    let (status, _, _) = request(addr, "DELETE", "/api/stack", None).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn malformed_json_body_is_a_500_boundary_fault() {
    let addr = spawn_server(10).await;

    let (status, _, body) =
        request(addr, "POST", "/api/stack/push", Some(r#"{"element": "#)).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("JSON"));

    // no partial mutation
    let (_, _, body) = request(addr, "GET", "/api/stack", None).await;
    assert_eq!(body["data"]["size"], 0);
}

#[tokio::test]
async fn oversized_request_is_rejected_with_413() {
    let addr = spawn_server(10).await;

    // Announce a body far over the server's request cap; the server must
    // answer before the body arrives.
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let raw = "POST /api/stack/push HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 100000\r\n\r\n";
    stream.write_all(raw.as_bytes()).await.expect("write request");

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.expect("read response");
    let response = String::from_utf8(response).expect("utf8 response");

    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("header terminator present");
    assert!(head.starts_with("HTTP/1.1 413"));

    let json: Value = serde_json::from_str(body).expect("JSON body");
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Request payload too large");
}

#[tokio::test]
async fn preflight_and_cors_headers_are_present() {
    let addr = spawn_server(10).await;

    let (status, head, _) = request(addr, "OPTIONS", "/api/stack/push", None).await;
    assert_eq!(status, 204);
    assert!(head.contains("Access-Control-Allow-Origin: *"));
    assert!(head.contains("Access-Control-Allow-Methods: GET, POST, PUT, DELETE, OPTIONS"));

    let (_, head, _) = request(addr, "GET", "/api/stack", None).await;
    assert!(head.contains("Access-Control-Allow-Origin: *"));
}
