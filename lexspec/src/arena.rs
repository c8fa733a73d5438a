//! Bounded, index-addressed backing stores.
//!
//! Every pool in this crate — terminal bytes, expression nodes, non-terminal
//! records, NFA states, NFA edges, NFA handles — is a [`Pool<T>`] (or, for
//! the terminal byte buffer, the closely related [`crate::spec::terminal::TerminalPool`]).
//! Allocating an element returns the pre-increment index of that element;
//! nothing is ever freed, and exceeding the configured capacity is a fatal
//! [`CapacityExceeded`] error rather than a silent reallocation. This gives
//! every combinator and parser stage stable integer handles into shared
//! storage instead of pointers, which is what lets the NFA combinators
//! mutate a handle's start/accept state through every alias of it (see
//! `nfa::combinators`).

use thiserror::Error;

/// A pool exhausted its configured capacity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("capacity exceeded: {name} has no room for another entry (limit {limit})")]
pub struct CapacityExceeded {
    pub name: &'static str,
    pub limit: usize,
}

/// A fixed-capacity, append-only store addressed by allocation index.
///
/// Index zero is a valid allocation, not a null sentinel — absence is
/// represented by the caller's own `Option`/tag type, never by a reserved
/// index.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    name: &'static str,
    capacity: usize,
    items: Vec<T>,
}

impl<T> Pool<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Pool {
            name,
            capacity,
            items: Vec::new(),
        }
    }

    /// Allocates `value`, returning the index it was stored at.
    pub fn alloc(&mut self, value: T) -> Result<usize, CapacityExceeded> {
        if self.items.len() >= self.capacity {
            return Err(CapacityExceeded {
                name: self.name,
                limit: self.capacity,
            });
        }
        let idx = self.items.len();
        self.items.push(value);
        Ok(idx)
    }

    pub fn get(&self, idx: usize) -> &T {
        &self.items[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.items[idx]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_preincrement_index() {
        let mut pool = Pool::new("test", 4);
        assert_eq!(pool.alloc("a").unwrap(), 0);
        assert_eq!(pool.alloc("b").unwrap(), 1);
        assert_eq!(pool.alloc("c").unwrap(), 2);
    }

    #[test]
    fn zero_is_a_valid_index() {
        let mut pool = Pool::new("test", 1);
        let idx = pool.alloc(42).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(*pool.get(0), 42);
    }

    #[test]
    fn overflow_is_fatal() {
        let mut pool = Pool::new("test", 2);
        pool.alloc(1).unwrap();
        pool.alloc(2).unwrap();
        let err = pool.alloc(3).unwrap_err();
        assert_eq!(err.name, "test");
        assert_eq!(err.limit, 2);
    }
}
