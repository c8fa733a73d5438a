//! The grammar→NFA driver: a memoised recursive descent over the
//! expression forest, followed by a left-to-right union reduction into a
//! master NFA (`spec.md` §4.7).

use super::arena::{NfaHandle, NfaPool};
use super::combinators;
use crate::arena::CapacityExceeded;
use crate::spec::{Op, Operand, OperandTag, Registry};

/// The outcome of building every completed non-terminal: the master union
/// NFA, and each non-terminal's own (unreduced) handle, recorded before
/// the union so a caller can still ask which non-terminal a given
/// automaton belongs to (`SPEC_FULL.md` §9, resolving the open question
/// left by the union step).
pub struct Built {
    pub master: NfaHandle,
    pub per_nonterm: Vec<(usize, NfaHandle)>,
}

/// Builds every completed non-terminal's NFA in definition order and
/// unions them into a master NFA rooted at `per_nonterm[0]`.
///
/// When there is more than one non-terminal, the union is built over a
/// fresh [`combinators::duplicate`] of each handle rather than the
/// handles themselves: `or` reclassifies both of its operands'
/// start/accept states to `Internal`, and `per_nonterm`'s handles are
/// kept around afterwards (e.g. for `--emit <name>`) and must still have
/// their own, un-reclassified start/accept states. With exactly one
/// non-terminal no combinator runs at all, so its handle is reused as
/// the master directly rather than paying for a needless copy.
pub fn build_all(reg: &Registry, nfa: &mut NfaPool) -> Result<Built, CapacityExceeded> {
    let mut memo: Vec<Option<NfaHandle>> = vec![None; reg.nonterms.len()];
    let mut per_nonterm = Vec::with_capacity(reg.definition_order.len());

    for &idx in &reg.definition_order {
        let handle = build_non_terminal(idx, reg, nfa, &mut memo)?;
        per_nonterm.push((idx, handle));
    }

    let master = match per_nonterm.as_slice() {
        [] => nfa.new_nfa()?,
        [(_, only)] => *only,
        [(_, first), rest @ ..] => {
            let mut acc = combinators::duplicate(nfa, *first)?;
            for &(_, h) in rest {
                let h = combinators::duplicate(nfa, h)?;
                acc = combinators::or(nfa, acc, h)?;
            }
            acc
        }
    };

    Ok(Built { master, per_nonterm })
}

/// Builds (or returns the memoised handle for) non-terminal `idx`.
/// Memoisation is what keeps mutually- or self-referential grammars from
/// descending forever (`spec.md` §4.7): a fresh, empty placeholder handle
/// is memoised *before* descending into the non-terminal's own
/// expression, so a reference back to `idx` from within that expression
/// (directly or through another non-terminal) resolves to the
/// placeholder instead of recursing again. The placeholder is then
/// replaced with the real handle once the expression finishes building.
/// Left-recursive grammars are not rejected; a self-reference simply
/// contributes a dead branch that accepts nothing.
///
/// A non-terminal that is referenced but never defined by end of input
/// (`complete == false`, `expr == None`) is a valid parse outcome, not a
/// fatal error (`spec.md` §8) — it gets the same placeholder treatment as
/// a self-reference: a dead, non-accepting branch, rather than a panic.
pub fn build_non_terminal(
    idx: usize,
    reg: &Registry,
    nfa: &mut NfaPool,
    memo: &mut Vec<Option<NfaHandle>>,
) -> Result<NfaHandle, CapacityExceeded> {
    if let Some(handle) = memo[idx] {
        return Ok(handle);
    }
    let placeholder = nfa.new_nfa()?;
    memo[idx] = Some(placeholder);
    let Some(expr_idx) = reg.nonterms.get(idx).expr else {
        return Ok(placeholder);
    };
    let handle = build_expr(expr_idx, reg, nfa, memo)?;
    memo[idx] = Some(handle);
    Ok(handle)
}

/// Dispatches on an expression node's operator, building its operand(s)
/// and applying the matching combinator.
///
/// `Or`/`And` require their two operand handles to be distinct (the
/// combinators mutate both in place), but a non-terminal operand that
/// occurs more than once within its own body (`$x := $x $x`) resolves
/// both occurrences to the identical memoised handle. When that happens,
/// one side is deep-copied first via [`combinators::duplicate`] so the
/// combinator gets two independent automata instead of panicking on the
/// aliasing.
pub fn build_expr(
    expr_idx: usize,
    reg: &Registry,
    nfa: &mut NfaPool,
    memo: &mut Vec<Option<NfaHandle>>,
) -> Result<NfaHandle, CapacityExceeded> {
    let expr = *reg.exprs.get(expr_idx);
    let op1 = build_operand(expr.op1, reg, nfa, memo)?;
    match expr.op {
        Op::NoOp => Ok(op1),
        Op::ZeroOrMore => combinators::closure(nfa, op1),
        Op::Or => {
            let op2 = build_operand(expr.op2, reg, nfa, memo)?;
            let op2 = if op2 == op1 { combinators::duplicate(nfa, op2)? } else { op2 };
            combinators::or(nfa, op1, op2)
        }
        Op::And => {
            let op2 = build_operand(expr.op2, reg, nfa, memo)?;
            let op2 = if op2 == op1 { combinators::duplicate(nfa, op2)? } else { op2 };
            combinators::concat(nfa, op1, op2)
        }
    }
}

fn build_operand(
    operand: Operand,
    reg: &Registry,
    nfa: &mut NfaPool,
    memo: &mut Vec<Option<NfaHandle>>,
) -> Result<NfaHandle, CapacityExceeded> {
    match operand.tag {
        OperandTag::NestedExpression => build_expr(operand.index, reg, nfa, memo),
        OperandTag::NonTerminal => build_non_terminal(operand.index, reg, nfa, memo),
        OperandTag::Terminal => {
            let bytes = reg.terminals.get(operand.index);
            combinators::terminal_chain(nfa, bytes)
        }
        OperandTag::Nothing => unreachable!("Nothing is never read as an NFA operand"),
    }
}
