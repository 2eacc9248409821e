//! Request adapter between untrusted JSON input and the bounded stack.
//!
//! `StackController` validates raw values, performs exactly one structure
//! mutation per call under a single lock guard, and builds the response
//! payloads. Validation ceilings (element range, capacity cap) live here,
//! not in `lib-stack`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use lib_stack::BoundedStack;

use super::constants::{ELEMENT_MAX, ELEMENT_MIN, MAX_CAPACITY};

/// Request-level validation and business-rule failures.
///
/// All map to a 400 response; none are transient. [`ApiError::code`] gives
/// the stable machine-readable name, `Display` the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The `element` field is missing, non-numeric, or not an integer.
    #[error("Please enter a valid integer")]
    InvalidElement,

    /// The element is an integer outside [-1000, 1000].
    #[error("Number must be between -1000 and 1000")]
    OutOfRange,

    #[error("Stack is full. Cannot push more elements.")]
    StackFull,

    #[error("Stack is empty. Cannot pop elements.")]
    StackEmpty,

    /// The `maxSize` field is missing, non-integer, or not positive.
    #[error("Please enter a valid positive integer for stack size")]
    InvalidSize,

    /// The requested capacity exceeds the absolute ceiling.
    #[error("Maximum stack size cannot exceed 100")]
    LimitExceeded,

    /// The requested capacity is below the current occupancy.
    #[error("Cannot set size to {requested}. Current stack has {len} elements.")]
    CapacityTooSmall { requested: i64, len: usize },
}

impl ApiError {
    /// Stable error code carried in failure envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidElement | Self::InvalidSize => "InvalidInput",
            Self::OutOfRange => "OutOfRange",
            Self::StackFull => "StackFull",
            Self::StackEmpty => "StackEmpty",
            Self::LimitExceeded => "LimitExceeded",
            Self::CapacityTooSmall { .. } => "CapacityTooSmall",
        }
    }
}

/// Read-only projection of the stack returned with every successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackState {
    pub elements: Vec<i32>,
    pub size: usize,
    pub max_size: usize,
    pub is_empty: bool,
    pub is_full: bool,
    /// `null` when the stack is empty; never overloads a stored value.
    pub top_element: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub success: bool,
    pub data: StackState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PushResponse {
    pub success: bool,
    pub message: String,
    pub stack: StackState,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopResponse {
    pub success: bool,
    pub message: String,
    pub popped_element: i32,
    pub stack: StackState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub stack: StackState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResizeResponse {
    pub success: bool,
    pub message: String,
    pub stack: StackState,
}

/// The request adapter. Owns a handle to the single shared stack.
///
/// Each method takes the lock once for its whole read-then-write step, so
/// concurrent requests observe every operation as atomic.
pub struct StackController {
    stack: Arc<RwLock<BoundedStack<i32>>>,
}

impl StackController {
    pub fn new(stack: Arc<RwLock<BoundedStack<i32>>>) -> Self {
        Self { stack }
    }

    /// GET /api/stack
    pub async fn stack_state(&self) -> StateResponse {
        let stack = self.stack.read().await;
        StateResponse {
            success: true,
            data: project(&stack),
        }
    }

    /// POST /api/stack/push
    pub async fn push_element(&self, raw: Option<&Value>) -> Result<PushResponse, ApiError> {
        let value = parse_element(raw)?;

        let mut stack = self.stack.write().await;
        stack.push(value).map_err(|_| ApiError::StackFull)?;

        Ok(PushResponse {
            success: true,
            message: format!("Element {} pushed successfully", value),
            stack: project(&stack),
        })
    }

    /// POST /api/stack/pop
    pub async fn pop_element(&self) -> Result<PopResponse, ApiError> {
        let mut stack = self.stack.write().await;
        let element = stack.pop().ok_or(ApiError::StackEmpty)?;

        Ok(PopResponse {
            success: true,
            message: format!("Element {} popped successfully", element),
            popped_element: element,
            stack: project(&stack),
        })
    }

    /// POST /api/stack/clear — always succeeds.
    pub async fn clear_stack(&self) -> ClearResponse {
        let mut stack = self.stack.write().await;
        stack.clear();

        ClearResponse {
            success: true,
            message: "Stack cleared successfully".to_string(),
            stack: project(&stack),
        }
    }

    /// PUT /api/stack/size
    pub async fn set_max_size(&self, raw: Option<&Value>) -> Result<ResizeResponse, ApiError> {
        let requested = raw.and_then(Value::as_i64).ok_or(ApiError::InvalidSize)?;
        if requested < 1 {
            return Err(ApiError::InvalidSize);
        }
        if requested > MAX_CAPACITY {
            return Err(ApiError::LimitExceeded);
        }

        let mut stack = self.stack.write().await;
        if stack.set_capacity(requested as usize).is_err() {
            return Err(ApiError::CapacityTooSmall {
                requested,
                len: stack.len(),
            });
        }

        Ok(ResizeResponse {
            success: true,
            message: format!("Stack size updated to {}", requested),
            stack: project(&stack),
        })
    }
}

/// Validates a raw JSON value as an in-range stack element.
fn parse_element(raw: Option<&Value>) -> Result<i32, ApiError> {
    let n = raw.and_then(Value::as_i64).ok_or(ApiError::InvalidElement)?;
    if !(ELEMENT_MIN..=ELEMENT_MAX).contains(&n) {
        return Err(ApiError::OutOfRange);
    }
    Ok(n as i32)
}

fn project(stack: &BoundedStack<i32>) -> StackState {
    StackState {
        elements: stack.to_vec(),
        size: stack.len(),
        max_size: stack.capacity(),
        is_empty: stack.is_empty(),
        is_full: stack.is_full(),
        top_element: stack.peek().copied(),
    }
}
