//! The line scanner: reads the grammar text one logical line at a time,
//! dropping blank and comment lines, and tracking line/column for
//! diagnostics (`spec.md` §4.2).

use crate::diagnostics::{Located, Position};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    #[error("line is {len} bytes, exceeding the maximum of {limit}")]
    LineTooLong { len: usize, limit: usize },
}

/// One non-blank, non-comment input line, together with its 1-based line
/// number (used as the `line` half of a `Position`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub line_no: u32,
}

pub struct Scanner<'a> {
    lines: std::str::Lines<'a>,
    line_no: u32,
    max_line_len: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, max_line_len: usize) -> Self {
        Scanner {
            lines: source.lines(),
            line_no: 0,
            max_line_len,
        }
    }

    /// Returns the next non-blank, non-comment line, or `None` at end of
    /// input. A line starting (after leading whitespace) with `!` is a
    /// comment and is skipped silently; a line that is blank after
    /// whitespace is skipped as well.
    pub fn next_line(&mut self) -> Result<Option<Line<'a>>, Located<ScanError>> {
        loop {
            let Some(raw) = self.lines.next() else {
                return Ok(None);
            };
            self.line_no += 1;

            if raw.len() > self.max_line_len {
                return Err(Located::new(
                    ScanError::LineTooLong {
                        len: raw.len(),
                        limit: self.max_line_len,
                    },
                    Position::new(self.line_no, 1),
                ));
            }

            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('!') {
                continue;
            }

            return Ok(Some(Line {
                text: raw,
                line_no: self.line_no,
            }));
        }
    }
}
