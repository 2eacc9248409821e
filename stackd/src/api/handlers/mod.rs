//! API request handlers.

pub mod stack;

pub use stack::StackHandler;
