//! # `lib-stack`
//!
//! A bounded LIFO stack: a `Vec`-backed collection with a runtime capacity
//! ceiling that can be raised or lowered, but never below the current
//! occupancy.
//!
//! ## Semantics
//!
//! - Elements are appended and removed at the tail only.
//! - Operations that may exceed capacity are **fallible**: they return
//!   [`StackError::Full`] and leave the stack unchanged ([`BoundedStack::push`]).
//! - Reads of an empty stack return `None` rather than an in-band sentinel
//!   ([`BoundedStack::pop`], [`BoundedStack::peek`]).
//! - [`BoundedStack::set_capacity`] rejects any request that would truncate
//!   stored elements; shrinking never silently drops data.
//! - [`BoundedStack::to_vec`] returns an independent snapshot; mutating the
//!   returned `Vec` never affects the stack.

mod error;

pub use error::StackError;

/// LIFO collection with a mutable upper bound on element count.
///
/// The bound (`capacity`) is distinct from any policy ceiling a caller may
/// enforce on top of it; the structure itself only guarantees
/// `len() <= capacity()` and `capacity() >= 1`.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    /// Creates an empty stack holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "BoundedStack capacity must be at least 1");
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value` at the tail.
    ///
    /// Returns [`StackError::Full`] without mutating if the stack is at
    /// capacity.
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        if self.items.len() >= self.capacity {
            return Err(StackError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Removes and returns the tail element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns the tail element without removing it, or `None` if empty.
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Current upper bound on [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the stack. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Updates the capacity.
    ///
    /// Succeeds only if `new_capacity >= 1` and `new_capacity >= len()`.
    /// A shrink below the current occupancy is rejected wholesale with
    /// [`StackError::TooSmall`]; elements are never truncated.
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<(), StackError> {
        if new_capacity < 1 || new_capacity < self.items.len() {
            return Err(StackError::TooSmall {
                requested: new_capacity,
                len: self.items.len(),
            });
        }
        self.capacity = new_capacity;
        Ok(())
    }
}

impl<T: Clone> BoundedStack<T> {
    /// Returns a defensive copy of the contents in bottom-to-top order.
    ///
    /// The returned `Vec` is independent of the stack and of any previously
    /// returned snapshot.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}
