//! `lexspec` compiles a line-oriented grammar file of named regular
//! expressions over terminals and other named regexes into a single
//! Thompson-constructed NFA accepting the union of those token languages.
//!
//! A grammar file is a sequence of lines, each a comment (`!`-prefixed),
//! blank, or a definition `$name := body`. A body is a sequence of
//! operands — terminals or `$name` non-terminal references — joined by
//! alternation (`|`), implicit concatenation (juxtaposition), and
//! postfix closure (`*`). See [`spec::body`] for the exact grammar and
//! escape table.
//!
//! ```
//! use lexspec::{compile, limits::Limits};
//!
//! let compiled = compile("$x := a | b\n", Limits::default()).unwrap();
//! assert_eq!(compiled.built.per_nonterm.len(), 1);
//! ```
//!
//! This crate does not match strings against the produced NFA, convert
//! it to a DFA, or minimise it — see `lexspec-cli` for a command-line
//! front end, and the crate documentation's Non-goals for the full list.

pub mod arena;
pub mod diagnostics;
pub mod dot;
pub mod limits;
pub mod nfa;
pub mod scanner;
pub mod spec;

#[cfg(test)]
#[path = "proptests.rs"]
mod proptests;

use diagnostics::Located;
use limits::Limits;
use nfa::arena::NfaPool;
use nfa::build::Built;
use scanner::{ScanError, Scanner};
use spec::error::SpecError;
use spec::{body, header, Registry};
use thiserror::Error;

/// Any error that can abort a compilation (`spec.md` §7). Scan and spec
/// errors carry the `Error LINE:COL: <detail>` position the scanner was
/// at; NFA arena exhaustion happens after parsing has finished and so
/// carries no source position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("{0}")]
    Scan(Located<ScanError>),
    #[error("{0}")]
    Spec(Located<SpecError>),
    #[error("Error: {0}")]
    Nfa(arena::CapacityExceeded),
}

/// One compilation run's arenas, held by an explicit value instead of as
/// process globals (`spec.md` §9 Design Notes, "Global state").
pub struct Context {
    registry: Registry,
    nfa: NfaPool,
}

impl Context {
    pub fn new(limits: Limits) -> Self {
        let registry = Registry::new(limits);
        let nfa = NfaPool::new(&registry.limits);
        Context { registry, nfa }
    }

    /// Parses `source` and builds its NFAs, consuming this context. There
    /// is no API to mutate a `Context` after this returns.
    pub fn compile(mut self, source: &str) -> Result<Compiled, CompileError> {
        let mut scan = Scanner::new(source, self.registry.limits.max_line_len);

        while let Some(line) = scan.next_line().map_err(CompileError::Scan)? {
            let header = header::parse(line.text, line.line_no, &mut self.registry)
                .map_err(CompileError::Spec)?;
            let expr = body::parse(header.body, line.line_no, header.body_col, &mut self.registry)
                .map_err(CompileError::Spec)?;
            self.registry.complete_definition(header.nonterm, expr);
        }

        let built = nfa::build::build_all(&self.registry, &mut self.nfa).map_err(CompileError::Nfa)?;

        Ok(Compiled {
            registry: self.registry,
            nfa: self.nfa,
            built,
        })
    }
}

/// The immutable result of a successful compilation.
pub struct Compiled {
    pub registry: Registry,
    pub nfa: NfaPool,
    pub built: Built,
}

impl Compiled {
    /// Renders the master union NFA, or (when `name` is given) the NFA
    /// built for that single non-terminal, as Graphviz DOT.
    pub fn dot_for(&mut self, name: Option<&str>) -> Option<String> {
        let handle = match name {
            None => self.built.master,
            Some(n) => {
                let idx = *self.registry.name_index.get(n)?;
                self.built
                    .per_nonterm
                    .iter()
                    .find(|&&(i, _)| i == idx)?
                    .1
            }
        };
        Some(dot::emit(&mut self.nfa, handle))
    }
}

/// Compiles `source` with the given capacity `limits`. Equivalent to
/// `Context::new(limits).compile(source)`.
pub fn compile(source: &str, limits: Limits) -> Result<Compiled, CompileError> {
    Context::new(limits).compile(source)
}
