//! HTTP server module.
//!
//! Provides request parsing, routing, and response serialization.

pub mod router;
pub mod types;

pub use router::HttpRouter;
pub use types::{HttpMethod, HttpRequest, HttpResponse, HttpStatus, RequestHandler};
