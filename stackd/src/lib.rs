//! `stackd` — JSON-over-HTTP service exposing a single bounded stack.
//!
//! One process-wide [`lib_stack::BoundedStack`] behind a `RwLock`, a request
//! adapter that validates untrusted input, and a hand-rolled HTTP/1.1
//! surface over tokio TCP.

pub mod api;
pub mod config;
pub mod server;
