//! The Thompson combinators (`spec.md` §4.6). Each takes NFA handles by
//! value and downgrades their Start/Accepting states to Internal while
//! ε-wiring them together: `concat` reuses `a`'s start and `b`'s accept
//! directly; `or` and `closure` allocate a fresh start/accept pair
//! around both operands. Either way the operand handles passed in
//! become stale the moment their states stop being Start/Accepting —
//! a deliberate storage leak rather than a free (`spec.md` §3, §9
//! "Destructive combinators").

use super::arena::{NfaHandle, NfaPool, StateType};
use crate::arena::CapacityExceeded;
use std::collections::{HashMap, HashSet};

/// A single edge `start -σ-> accept`.
pub fn single_symbol(pool: &mut NfaPool, symbol: u8) -> Result<NfaHandle, CapacityExceeded> {
    let handle = pool.new_nfa()?;
    pool.new_edge(handle.start, handle.accept, symbol)?;
    Ok(handle)
}

/// A chain of states, one per byte, connected by byte-labelled edges; the
/// final state is `Accepting`. `bytes` must be non-empty.
pub fn terminal_chain(pool: &mut NfaPool, bytes: &[u8]) -> Result<NfaHandle, CapacityExceeded> {
    assert!(!bytes.is_empty(), "empty terminal");
    let start = pool.new_state(StateType::Start)?;
    let mut prev = start;
    let mut last = start;
    for (i, &b) in bytes.iter().enumerate() {
        let state_type = if i + 1 == bytes.len() {
            StateType::Accepting
        } else {
            StateType::Internal
        };
        let next = pool.new_state(state_type)?;
        pool.new_edge(prev, next, b)?;
        prev = next;
        last = next;
    }
    let handle = NfaHandle { start, accept: last };
    pool.handles.alloc(handle)?;
    Ok(handle)
}

/// `A` followed by `B`: `A`'s accept becomes internal, ε-linked to `B`'s
/// (now internal) start; `A`'s handle is rewritten to end at `B`'s accept.
pub fn concat(pool: &mut NfaPool, a: NfaHandle, b: NfaHandle) -> Result<NfaHandle, CapacityExceeded> {
    assert_ne!(a, b, "concat of a handle with itself");
    pool.set_type(a.accept, StateType::Internal);
    pool.new_edge(a.accept, b.start, 0)?;
    pool.set_type(b.start, StateType::Internal);
    Ok(NfaHandle { start: a.start, accept: b.accept })
}

/// `A` or `B`: a fresh start/accept pair ε-connects to both operands'
/// (now internal) endpoints.
pub fn or(pool: &mut NfaPool, a: NfaHandle, b: NfaHandle) -> Result<NfaHandle, CapacityExceeded> {
    assert_ne!(a, b, "or of a handle with itself");
    let new_start = pool.new_state(StateType::Start)?;
    let new_accept = pool.new_state(StateType::Accepting)?;

    pool.set_type(a.start, StateType::Internal);
    pool.set_type(a.accept, StateType::Internal);
    pool.set_type(b.start, StateType::Internal);
    pool.set_type(b.accept, StateType::Internal);

    pool.new_edge(new_start, a.start, 0)?;
    pool.new_edge(new_start, b.start, 0)?;
    pool.new_edge(a.accept, new_accept, 0)?;
    pool.new_edge(b.accept, new_accept, 0)?;

    Ok(NfaHandle { start: new_start, accept: new_accept })
}

/// Deep-copies the automaton reachable from `handle` into fresh states and
/// edges, preserving state types, and returns a handle to the copy.
///
/// `concat`/`or` require their two operands to be distinct handles (they
/// mutate both in place), but a non-terminal reference that occurs more
/// than once within its own body — `$x := $x $x` — yields the identical
/// memoised handle for every occurrence. `duplicate` gives such a repeat
/// occurrence its own storage so the combinator can mutate it without
/// also mutating the first occurrence out from under it.
pub fn duplicate(pool: &mut NfaPool, handle: NfaHandle) -> Result<NfaHandle, CapacityExceeded> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut adjacency: HashMap<usize, Vec<(usize, u8)>> = HashMap::new();
    let mut stack = vec![handle.start];
    while let Some(old) = stack.pop() {
        if !seen.insert(old) {
            continue;
        }
        order.push(old);
        let out_edges: Vec<(usize, u8)> = pool
            .states
            .get(old)
            .edges()
            .iter()
            .map(|&e| {
                let edge = pool.edges.get(e);
                (edge.target, edge.symbol)
            })
            .collect();
        for &(target, _) in &out_edges {
            stack.push(target);
        }
        adjacency.insert(old, out_edges);
    }

    let mut mapping: HashMap<usize, usize> = HashMap::new();
    for &old in &order {
        let state_type = pool.states.get(old).state_type;
        mapping.insert(old, pool.new_state(state_type)?);
    }
    for &old in &order {
        let new_from = mapping[&old];
        for &(target, symbol) in &adjacency[&old] {
            pool.new_edge(new_from, mapping[&target], symbol)?;
        }
    }

    let copy = NfaHandle {
        start: mapping[&handle.start],
        accept: mapping[&handle.accept],
    };
    pool.handles.alloc(copy)?;
    Ok(copy)
}

/// Zero or more repetitions of `A`.
pub fn closure(pool: &mut NfaPool, a: NfaHandle) -> Result<NfaHandle, CapacityExceeded> {
    let new_start = pool.new_state(StateType::Start)?;
    let new_accept = pool.new_state(StateType::Accepting)?;

    pool.set_type(a.start, StateType::Internal);
    pool.set_type(a.accept, StateType::Internal);

    pool.new_edge(new_start, a.start, 0)?;
    pool.new_edge(new_start, new_accept, 0)?;
    pool.new_edge(a.accept, a.start, 0)?;
    pool.new_edge(a.accept, new_accept, 0)?;

    Ok(NfaHandle { start: new_start, accept: new_accept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;
    use crate::nfa::test_support::accepts;

    fn pool() -> NfaPool {
        NfaPool::new(&Limits {
            max_nfa_states: 64,
            max_edges_per_state: 8,
            max_nfa_handles: 32,
            ..Limits::default()
        })
    }

    #[test]
    fn single_symbol_accepts_one_byte() {
        let mut pool = pool();
        let h = single_symbol(&mut pool, b'a').unwrap();
        assert!(accepts(&pool, h, b"a"));
        assert!(!accepts(&pool, h, b"b"));
        assert!(!accepts(&pool, h, b""));
    }

    #[test]
    fn terminal_chain_has_len_plus_one_states() {
        let mut pool = pool();
        let before = pool.states.len();
        let h = terminal_chain(&mut pool, b"abc").unwrap();
        assert_eq!(pool.states.len() - before, 4);
        assert!(accepts(&pool, h, b"abc"));
        assert!(!accepts(&pool, h, b"ab"));
    }

    #[test]
    fn concat_accepts_the_product_language() {
        let mut pool = pool();
        let a = single_symbol(&mut pool, b'a').unwrap();
        let b = single_symbol(&mut pool, b'b').unwrap();
        let h = concat(&mut pool, a, b).unwrap();
        assert!(accepts(&pool, h, b"ab"));
        assert!(!accepts(&pool, h, b"a"));
        assert!(!accepts(&pool, h, b"ba"));
    }

    #[test]
    fn or_accepts_the_union_language() {
        let mut pool = pool();
        let a = single_symbol(&mut pool, b'a').unwrap();
        let b = single_symbol(&mut pool, b'b').unwrap();
        let h = or(&mut pool, a, b).unwrap();
        assert!(accepts(&pool, h, b"a"));
        assert!(accepts(&pool, h, b"b"));
        assert!(!accepts(&pool, h, b"ab"));
    }

    #[test]
    fn closure_accepts_zero_or_more_repetitions() {
        let mut pool = pool();
        let a = single_symbol(&mut pool, b'a').unwrap();
        let h = closure(&mut pool, a).unwrap();
        assert!(accepts(&pool, h, b""));
        assert!(accepts(&pool, h, b"a"));
        assert!(accepts(&pool, h, b"aaaa"));
        assert!(!accepts(&pool, h, b"b"));
    }

    #[test]
    fn duplicate_copies_structure_and_leaves_the_original_untouched() {
        let mut pool = pool();
        let a = single_symbol(&mut pool, b'a').unwrap();
        let closed = closure(&mut pool, a).unwrap();
        let copy = duplicate(&mut pool, closed).unwrap();

        assert_ne!(copy.start, closed.start);
        assert_ne!(copy.accept, closed.accept);
        assert!(accepts(&pool, copy, b""));
        assert!(accepts(&pool, copy, b"aaa"));
        assert_eq!(pool.states.get(closed.start).state_type, StateType::Start);
        assert_eq!(pool.states.get(closed.accept).state_type, StateType::Accepting);

        // the copy can now be combined with the original without tripping
        // concat's/or's distinct-handles precondition.
        let h = concat(&mut pool, closed, copy).unwrap();
        assert!(accepts(&pool, h, b""));
        assert!(accepts(&pool, h, b"aa"));
    }

    #[test]
    fn every_handle_has_exactly_one_start_and_accept() {
        let mut pool = pool();
        let a = single_symbol(&mut pool, b'a').unwrap();
        let b = single_symbol(&mut pool, b'b').unwrap();
        let h = or(&mut pool, a, b).unwrap();
        assert_eq!(pool.states.get(h.start).state_type, StateType::Start);
        assert_eq!(pool.states.get(h.accept).state_type, StateType::Accepting);
    }
}
