//! HTTP request router.
//!
//! Reads raw HTTP/1.1 requests off a TCP stream, routes them to registered
//! handlers, and serializes responses. Every response carries CORS headers
//! and closes the connection.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::types::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpStatus, RequestHandler};

/// Largest request (headers + body) the router will read.
const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Routes requests to handlers by path prefix.
#[derive(Clone)]
pub struct HttpRouter {
    routes: HashMap<String, Arc<dyn RequestHandler>>,
}

impl HttpRouter {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn register_handler(&mut self, path: String, handler: Arc<dyn RequestHandler>) {
        info!("Registering HTTP handler: {}", path);
        self.routes.insert(path, handler);
    }

    /// Serves a single connection: read, dispatch, write, close.
    pub async fn handle_connection(&self, mut stream: TcpStream, addr: SocketAddr) -> Result<()> {
        debug!("Processing HTTP request from: {}", addr);

        let raw = match self.read_request(&mut stream).await? {
            Some(raw) => raw,
            None => return Ok(()), // client closed, or request over the size cap
        };

        let request = match parse_request(&raw) {
            Some(request) => request,
            None => {
                let response = self.failure_response(
                    HttpStatus::BadRequest,
                    "Malformed HTTP request",
                    None,
                );
                let _ = stream.write_all(&serialize_response(&response)).await;
                return Ok(());
            }
        };

        info!("HTTP {} {}", request.method, request.uri);

        let response = self.dispatch(request).await;
        stream
            .write_all(&serialize_response(&response))
            .await
            .context("Failed to write HTTP response")?;
        Ok(())
    }

    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let path = request.uri.clone();
        match self.find_handler(&path) {
            Some(handler) => match handler.handle_request(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Handler error for {}: {}", path, e);
                    self.failure_response(
                        HttpStatus::InternalServerError,
                        "Something went wrong!",
                        Some(&e.to_string()),
                    )
                }
            },
            None => {
                warn!("No handler found for path: '{}'", path);
                self.failure_response(HttpStatus::NotFound, "Route not found", None)
            }
        }
    }

    fn find_handler(&self, path: &str) -> Option<&Arc<dyn RequestHandler>> {
        if let Some(handler) = self.routes.get(path) {
            return Some(handler);
        }

        // Prefix matching lets one handler own a whole API subtree
        for (route_path, handler) in &self.routes {
            if path.starts_with(route_path) {
                return Some(handler);
            }
        }

        None
    }

    /// Reads one full request: headers first, then the body up to
    /// Content-Length. Returns `None` after answering 413 for oversized
    /// requests, or when the peer sends nothing.
    async fn read_request(&self, stream: &mut TcpStream) -> Result<Option<Vec<u8>>> {
        let mut buffer: Vec<u8> = Vec::with_capacity(8192);
        let mut chunk = [0u8; 8192];

        // Read until the header terminator is seen
        let header_end = loop {
            let n = stream
                .read(&mut chunk)
                .await
                .context("Failed to read HTTP request")?;
            if n == 0 {
                if buffer.is_empty() {
                    return Ok(None);
                }
                break buffer.len();
            }
            buffer.extend_from_slice(&chunk[..n]);

            if buffer.len() > MAX_REQUEST_BYTES {
                warn!("Request headers exceed {} bytes", MAX_REQUEST_BYTES);
                self.reject_oversized(stream).await;
                return Ok(None);
            }

            if let Some(pos) = find_header_end(&buffer) {
                break pos + 4;
            }
        };

        // Continue reading until Content-Length bytes of body have arrived
        if let Some(content_length) = parse_content_length(&buffer[..header_end]) {
            let total = header_end + content_length;
            if total > MAX_REQUEST_BYTES {
                warn!(
                    "Request too large: {} bytes (max: {} bytes)",
                    total, MAX_REQUEST_BYTES
                );
                self.reject_oversized(stream).await;
                return Ok(None);
            }
            while buffer.len() < total {
                let n = stream
                    .read(&mut chunk)
                    .await
                    .context("Failed to read request body")?;
                if n == 0 {
                    break;
                }
                buffer.extend_from_slice(&chunk[..n]);
            }
            debug!(
                "Read full request: {} bytes (header: {}, body: {})",
                buffer.len(),
                header_end,
                content_length
            );
        }

        Ok(Some(buffer))
    }

    async fn reject_oversized(&self, stream: &mut TcpStream) {
        let response = self.failure_response(
            HttpStatus::PayloadTooLarge,
            "Request payload too large",
            None,
        );
        let _ = stream.write_all(&serialize_response(&response)).await;
    }

    /// Structured failure envelope: `success`, `message`, optional diagnostic.
    pub fn failure_response(
        &self,
        status: HttpStatus,
        message: &str,
        error: Option<&str>,
    ) -> HttpResponse {
        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(error) = error {
            body["error"] = json!(error);
        }
        HttpResponse::json(status, body.to_string().into_bytes())
    }
}

impl Default for HttpRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

fn parse_content_length(header_bytes: &[u8]) -> Option<usize> {
    let text = String::from_utf8_lossy(header_bytes);
    for line in text.lines().skip(1) {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().ok();
            }
        }
    }
    None
}

/// Parses request line, headers, and body out of the raw bytes.
///
/// Returns `None` when the request line is not valid HTTP.
pub fn parse_request(raw: &[u8]) -> Option<HttpRequest> {
    let header_end = find_header_end(raw).unwrap_or(raw.len());
    let head = String::from_utf8_lossy(&raw[..header_end]);
    let mut lines = head.lines();

    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = HttpMethod::parse(parts.next()?)?;
    let uri = parts.next()?;
    // Query strings are not part of any route
    let path = uri.split('?').next().unwrap_or(uri).to_string();

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.set(key.trim(), value.trim().to_string());
        }
    }

    let body_start = (header_end + 4).min(raw.len());
    let body = raw[body_start..].to_vec();

    Some(HttpRequest {
        method,
        uri: path,
        headers,
        body,
    })
}

/// Serializes a response with CORS headers and `Connection: close`.
pub fn serialize_response(response: &HttpResponse) -> Vec<u8> {
    let mut http_response = String::new();
    http_response.push_str(response.status.status_line());
    http_response.push_str(&format!("Content-Type: {}\r\n", response.content_type));
    http_response.push_str("Access-Control-Allow-Origin: *\r\n");
    http_response.push_str("Access-Control-Allow-Methods: GET, POST, PUT, DELETE, OPTIONS\r\n");
    http_response.push_str("Access-Control-Allow-Headers: Content-Type, Authorization\r\n");
    http_response.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    http_response.push_str("Connection: close\r\n");
    http_response.push_str("\r\n");

    let mut result = http_response.into_bytes();
    result.extend_from_slice(&response.body);
    result
}
