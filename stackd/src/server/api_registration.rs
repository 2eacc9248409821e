//! API handler registration.
//!
//! Wires the stack API handler into the HTTP router.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use lib_stack::BoundedStack;

use crate::api::controller::StackController;
use crate::api::handlers::StackHandler;
use crate::server::http::{HttpRouter, RequestHandler};

/// Registers all API handlers with the router.
pub fn register_api_handlers(router: &mut HttpRouter, stack: Arc<RwLock<BoundedStack<i32>>>) {
    info!("Registering API handlers...");

    let stack_handler: Arc<dyn RequestHandler> =
        Arc::new(StackHandler::new(StackController::new(stack)));
    router.register_handler("/api/stack".to_string(), stack_handler);
}
