//! Error types for [`BoundedStack`](crate::BoundedStack).
//!
//! These errors represent capacity conditions. Failed operations never
//! mutate the stack.

use thiserror::Error;

/// Errors returned by operations on [`BoundedStack`](crate::BoundedStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StackError {
    /// A push would exceed the current capacity.
    #[error("stack is full (capacity {capacity})")]
    Full { capacity: usize },

    /// A capacity change was below 1 or below the current occupancy.
    #[error("capacity {requested} is below the {len} elements currently stored")]
    TooSmall { requested: usize, len: usize },
}
