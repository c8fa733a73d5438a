//! The specification parser: non-terminal table, expression forest, and
//! terminal byte pool (`spec.md` §3-§4.4).

pub mod body;
pub mod error;
pub mod header;
pub mod terminal;

use crate::arena::{CapacityExceeded, Pool};
use crate::diagnostics::Located;
use crate::limits::Limits;
use error::SpecError;
use std::collections::HashMap;
use terminal::TerminalPool;

/// The operator carried by one [`Expr`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    NoOp,
    Or,
    And,
    ZeroOrMore,
}

/// Which arena an [`Operand`]'s `index` is interpreted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandTag {
    NestedExpression,
    NonTerminal,
    Terminal,
    Nothing,
}

/// One operand slot of an [`Expr`] node: a tag identifying the arena plus
/// the index into it. Replaces the aliased-pointer trick of the system
/// this crate is modelled on with an explicit sum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub tag: OperandTag,
    pub index: usize,
}

impl Operand {
    pub fn nothing() -> Self {
        Operand {
            tag: OperandTag::Nothing,
            index: 0,
        }
    }

    pub fn nested(expr_idx: usize) -> Self {
        Operand {
            tag: OperandTag::NestedExpression,
            index: expr_idx,
        }
    }

    pub fn non_terminal(idx: usize) -> Self {
        Operand {
            tag: OperandTag::NonTerminal,
            index: idx,
        }
    }

    pub fn terminal(offset: usize) -> Self {
        Operand {
            tag: OperandTag::Terminal,
            index: offset,
        }
    }

    pub fn is_nothing(&self) -> bool {
        self.tag == OperandTag::Nothing
    }
}

/// One node of the right-descending expression chain (`spec.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expr {
    pub op: Op,
    pub op1: Operand,
    pub op2: Operand,
}

/// A named regex: either a completed definition or a stub created by a
/// forward reference.
#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub name: String,
    pub expr: Option<usize>,
    pub complete: bool,
}

/// The three parser-owned arenas (terminal bytes, expression nodes,
/// non-terminal records) plus the name lookup table and capacity limits.
/// Kept separate from the NFA arenas so the parser and the NFA driver can
/// each see only the state they need.
pub struct Registry {
    pub terminals: TerminalPool,
    pub exprs: Pool<Expr>,
    pub nonterms: Pool<NonTerminal>,
    pub name_index: HashMap<String, usize>,
    pub limits: Limits,
    pub warnings: Vec<Located<String>>,
    /// Non-terminal indices in the order their definitions completed —
    /// distinct from allocation order, since a forward reference can
    /// allocate a stub before its definition is reached (`spec.md` §5).
    pub definition_order: Vec<usize>,
}

impl Registry {
    pub fn new(limits: Limits) -> Self {
        Registry {
            terminals: TerminalPool::new(limits.max_terminal_bytes),
            exprs: Pool::new("expression nodes", limits.max_expr_nodes),
            nonterms: Pool::new("non-terminals", limits.max_nonterminals),
            name_index: HashMap::new(),
            limits,
            warnings: Vec::new(),
            definition_order: Vec::new(),
        }
    }

    fn check_name_len(&self, name: &str) -> Result<(), CapacityExceeded> {
        if name.len() > self.limits.max_nonterminal_name_len {
            return Err(CapacityExceeded {
                name: "non-terminal name",
                limit: self.limits.max_nonterminal_name_len,
            });
        }
        Ok(())
    }

    /// Looks up `name`, returning its index. Creates an incomplete stub if
    /// this is the first time `name` has been seen — this is what lets a
    /// non-terminal operand forward-reference a definition that appears
    /// later in the input (`spec.md` §4.4).
    pub fn resolve_reference(&mut self, name: &str) -> Result<usize, CapacityExceeded> {
        self.check_name_len(name)?;
        if let Some(&idx) = self.name_index.get(name) {
            return Ok(idx);
        }
        let idx = self.nonterms.alloc(NonTerminal {
            name: name.to_string(),
            expr: None,
            complete: false,
        })?;
        self.name_index.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Begins a header definition of `name`: reuses an existing incomplete
    /// stub's index, allocates a fresh entry if `name` is new, or fails if
    /// `name` already names a completed definition (`spec.md` §4.3).
    pub fn begin_definition(&mut self, name: &str) -> Result<usize, SpecError> {
        self.check_name_len(name)
            .map_err(SpecError::CapacityExceeded)?;
        if let Some(&idx) = self.name_index.get(name) {
            if self.nonterms.get(idx).complete {
                return Err(SpecError::Redefinition {
                    name: name.to_string(),
                });
            }
            return Ok(idx);
        }
        let idx = self
            .nonterms
            .alloc(NonTerminal {
                name: name.to_string(),
                expr: None,
                complete: false,
            })
            .map_err(SpecError::CapacityExceeded)?;
        self.name_index.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Upgrades a stub (or fresh entry) in place once its body has parsed.
    pub fn complete_definition(&mut self, idx: usize, expr: usize) {
        let record = self.nonterms.get_mut(idx);
        record.expr = Some(expr);
        record.complete = true;
        self.definition_order.push(idx);
    }
}
