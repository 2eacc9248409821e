//! Stack API handler.
//!
//! Routes `/api/stack` requests, marshals JSON bodies in and envelopes out.

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::controller::{ApiError, StackController};
use crate::server::http::{HttpMethod, HttpRequest, HttpResponse, HttpStatus};

/// Handles every route under `/api/stack`.
pub struct StackHandler {
    controller: StackController,
}

impl StackHandler {
    pub fn new(controller: StackController) -> Self {
        Self { controller }
    }

    /// Parses the request body as JSON.
    ///
    /// An empty body reads as `null`, so missing fields fall out as
    /// `InvalidInput` downstream. A body that is present but unparseable is
    /// a boundary fault and bubbles up as a 500.
    fn parse_body(request: &HttpRequest) -> Result<Value> {
        if request.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        let value = serde_json::from_slice(&request.body)
            .map_err(|e| anyhow::anyhow!("Unparseable JSON body: {}", e))?;
        Ok(value)
    }
}

#[async_trait::async_trait]
impl crate::server::http::RequestHandler for StackHandler {
    async fn handle_request(&self, request: HttpRequest) -> Result<HttpResponse> {
        info!("Stack handler: {} {}", request.method, request.uri);

        match (request.method, request.uri.as_str()) {
            // CORS preflight for any stack route
            (HttpMethod::Options, _) => Ok(HttpResponse::empty(HttpStatus::NoContent)),

            // GET /api/stack - current projected state
            (HttpMethod::Get, "/api/stack") => {
                json_response(HttpStatus::Ok, &self.controller.stack_state().await)
            }

            // POST /api/stack/push
            (HttpMethod::Post, "/api/stack/push") => {
                let body = Self::parse_body(&request)?;
                match self.controller.push_element(body.get("element")).await {
                    Ok(response) => json_response(HttpStatus::Ok, &response),
                    Err(e) => Ok(api_error_response(&e)),
                }
            }

            // POST /api/stack/pop
            (HttpMethod::Post, "/api/stack/pop") => {
                match self.controller.pop_element().await {
                    Ok(response) => json_response(HttpStatus::Ok, &response),
                    Err(e) => Ok(api_error_response(&e)),
                }
            }

            // POST /api/stack/clear
            (HttpMethod::Post, "/api/stack/clear") => {
                json_response(HttpStatus::Ok, &self.controller.clear_stack().await)
            }

            // PUT /api/stack/size
            (HttpMethod::Put, "/api/stack/size") => {
                let body = Self::parse_body(&request)?;
                match self.controller.set_max_size(body.get("maxSize")).await {
                    Ok(response) => json_response(HttpStatus::Ok, &response),
                    Err(e) => Ok(api_error_response(&e)),
                }
            }

            // Anything else under the prefix is an unmatched route
            _ => Ok(HttpResponse::json(
                HttpStatus::NotFound,
                json!({
                    "success": false,
                    "message": "Route not found",
                })
                .to_string()
                .into_bytes(),
            )),
        }
    }
}

fn json_response<T: Serialize>(status: HttpStatus, data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_vec(data)?;
    Ok(HttpResponse::json(status, body))
}

/// 400 envelope carrying the stable error code and user-facing message.
fn api_error_response(error: &ApiError) -> HttpResponse {
    let body = json!({
        "success": false,
        "error": error.code(),
        "message": error.to_string(),
    });
    HttpResponse::json(HttpStatus::BadRequest, body.to_string().into_bytes())
}
