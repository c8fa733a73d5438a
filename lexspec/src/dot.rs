//! Graphviz DOT emission for a chosen NFA (`spec.md` §4.8, §6 "Output
//! format").

use crate::nfa::arena::{NfaHandle, NfaPool, StateType};
use std::fmt::Write as _;

/// Renders the NFA reachable from `handle.start` as a `digraph NFA { ... }`
/// block. Traversal uses each state's mark bit for cycle detection; the
/// bit is never reset afterwards, matching the source's own one-shot
/// dump contract.
pub fn emit(nfa: &mut NfaPool, handle: NfaHandle) -> String {
    let mut out = String::new();
    out.push_str("digraph NFA {\n");

    let mut stack = vec![handle.start];
    let mut order = Vec::new();
    while let Some(state) = stack.pop() {
        if nfa.states.get(state).mark {
            continue;
        }
        nfa.states.get_mut(state).mark = true;
        order.push(state);
        for &edge_idx in nfa.states.get(state).edges() {
            stack.push(nfa.edges.get(edge_idx).target);
        }
    }
    order.sort_unstable();

    for &state in &order {
        let node = nfa.states.get(state);
        let (shape, style, fill) = match node.state_type {
            StateType::Start => ("box", "filled", "lightgrey"),
            StateType::Accepting => ("box", "filled", "lightblue"),
            StateType::Internal => ("circle", "solid", "white"),
        };
        let _ = writeln!(
            out,
            "  S{state} [shape={shape}, style={style}, fillcolor={fill}];"
        );
    }

    for &state in &order {
        for &edge_idx in nfa.states.get(state).edges() {
            let edge = nfa.edges.get(edge_idx);
            let label = if edge.symbol == 0 {
                "eps".to_string()
            } else {
                (edge.symbol as char).to_string()
            };
            let _ = writeln!(out, "  S{state} -> S{} [label=\"{label}\"];", edge.target);
        }
    }

    out.push_str("}\n");
    out
}
