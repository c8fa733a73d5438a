//! Source positions and the `Error LINE:COL: <detail>` / `Warning LINE:COL:
//! <detail>` message formats of `spec.md` §7.

use std::fmt;

/// A 1-based line and column, as observed by the scanner at the moment an
/// error or warning was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Pairs a detail value (an error or a warning message) with the position
/// it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<E> {
    pub at: Position,
    pub detail: E,
}

impl<E> Located<E> {
    pub fn new(detail: E, at: Position) -> Self {
        Located { at, detail }
    }

    pub fn map<F, R>(self, f: F) -> Located<R>
    where
        F: FnOnce(E) -> R,
    {
        Located {
            at: self.at,
            detail: f(self.detail),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Located<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.at, self.detail)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Located<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.detail)
    }
}

/// A warning is a `Located<String>`; rendered with the `Warning` prefix
/// instead of `Error`, matching `spec.md` §7's "Warnings ... are printed to
/// the diagnostic stream but do not abort".
pub fn format_warning(w: &Located<String>) -> String {
    format!("Warning {}: {}", w.at, w.detail)
}
