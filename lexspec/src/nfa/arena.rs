//! Bounded pools for NFA states, edges, and handles (`spec.md` §4.5).

use crate::arena::{CapacityExceeded, Pool};
use crate::limits::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    Start,
    Internal,
    Accepting,
}

/// One NFA state: a bounded outgoing-edge list, its type, and a mark bit
/// used by traversal (set but never reset, per `spec.md` §4.8).
#[derive(Debug, Clone)]
pub struct NfaState {
    pub state_type: StateType,
    edges: Vec<usize>,
    max_edges: usize,
    pub mark: bool,
}

impl NfaState {
    fn new(state_type: StateType, max_edges: usize) -> Self {
        NfaState {
            state_type,
            edges: Vec::new(),
            max_edges,
            mark: false,
        }
    }

    pub fn edges(&self) -> &[usize] {
        &self.edges
    }
}

/// A directed, byte-labelled transition; symbol `0` is ε.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NfaEdge {
    pub target: usize,
    pub symbol: u8,
}

/// The (start, accept) pair identifying one Thompson automaton inside the
/// shared state arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NfaHandle {
    pub start: usize,
    pub accept: usize,
}

/// The three NFA-construction arenas, grouped the way the teacher keeps a
/// graph's nodes and edges under one owning struct.
pub struct NfaPool {
    pub states: Pool<NfaState>,
    pub edges: Pool<NfaEdge>,
    pub handles: Pool<NfaHandle>,
    max_edges_per_state: usize,
}

impl NfaPool {
    pub fn new(limits: &Limits) -> Self {
        NfaPool {
            states: Pool::new("NFA states", limits.max_nfa_states),
            edges: Pool::new("NFA edges", limits.max_edges_per_state * limits.max_nfa_states),
            handles: Pool::new("NFA handles", limits.max_nfa_handles),
            max_edges_per_state: limits.max_edges_per_state,
        }
    }

    pub fn new_state(&mut self, state_type: StateType) -> Result<usize, CapacityExceeded> {
        self.states.alloc(NfaState::new(state_type, self.max_edges_per_state))
    }

    pub fn new_edge(&mut self, from: usize, target: usize, symbol: u8) -> Result<usize, CapacityExceeded> {
        let edge_idx = self.edges.alloc(NfaEdge { target, symbol })?;
        let state = self.states.get_mut(from);
        if state.edges.len() >= state.max_edges {
            return Err(CapacityExceeded {
                name: "NFA edges per state",
                limit: state.max_edges,
            });
        }
        state.edges.push(edge_idx);
        Ok(edge_idx)
    }

    /// Creates a fresh `Start`/`Accepting` state pair and records the
    /// resulting handle.
    pub fn new_nfa(&mut self) -> Result<NfaHandle, CapacityExceeded> {
        let start = self.new_state(StateType::Start)?;
        let accept = self.new_state(StateType::Accepting)?;
        let handle = NfaHandle { start, accept };
        self.handles.alloc(handle)?;
        Ok(handle)
    }

    pub fn set_type(&mut self, state: usize, state_type: StateType) {
        self.states.get_mut(state).state_type = state_type;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> NfaPool {
        NfaPool::new(&Limits {
            max_nfa_states: 16,
            max_edges_per_state: 4,
            max_nfa_handles: 8,
            ..Limits::default()
        })
    }

    #[test]
    fn new_nfa_creates_start_and_accept() {
        let mut pool = pool();
        let handle = pool.new_nfa().unwrap();
        assert_eq!(pool.states.get(handle.start).state_type, StateType::Start);
        assert_eq!(pool.states.get(handle.accept).state_type, StateType::Accepting);
    }

    #[test]
    fn new_edge_appears_on_source_state() {
        let mut pool = pool();
        let handle = pool.new_nfa().unwrap();
        pool.new_edge(handle.start, handle.accept, b'a').unwrap();
        assert_eq!(pool.states.get(handle.start).edges().len(), 1);
    }

    #[test]
    fn edges_per_state_is_bounded() {
        let mut pool = pool();
        let handle = pool.new_nfa().unwrap();
        for _ in 0..4 {
            pool.new_edge(handle.start, handle.accept, b'a').unwrap();
        }
        let err = pool.new_edge(handle.start, handle.accept, b'a').unwrap_err();
        assert_eq!(err.name, "NFA edges per state");
    }
}
