//! Validation ceilings for the stack API.
//!
//! These are adapter-level policy, not properties of the structure itself.

/// Smallest element the API accepts.
pub const ELEMENT_MIN: i64 = -1000;

/// Largest element the API accepts.
pub const ELEMENT_MAX: i64 = 1000;

/// Absolute ceiling on the stack capacity a client may request.
pub const MAX_CAPACITY: i64 = 100;

/// Capacity of the stack created at startup when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;
