//! API layer: validation, the request adapter, and route handlers.

pub mod constants;
pub mod controller;
pub mod handlers;
