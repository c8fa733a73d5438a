//! The body parser: tokenises the right-hand side of a definition into a
//! right-descending [`super::Expr`] chain (`spec.md` §4.4).
//!
//! Operands are whitespace-delimited runs of bytes; `|` and `*` are only
//! operators when they stand apart from an operand (surrounded by
//! whitespace, or pushed back from a trailing unescaped `*`). A run that
//! happens to contain an unescaped `|` or `*` in its interior (no
//! surrounding whitespace) is not split — this mirrors the grammar's own
//! operand definition, "a maximal run of non-whitespace bytes", literally.

use super::error::SpecError;
use super::{Expr, Op, Operand, Registry};
use crate::diagnostics::{Located, Position};
use nom::bytes::complete::take_till;
use nom::character::complete::space0;

type NomError<'a> = nom::error::Error<&'a str>;

/// Splits `input` into a non-whitespace run and the whitespace-or-end
/// remainder that follows it.
fn take_run(input: &str) -> (&str, &str) {
    take_till::<_, _, NomError>(char::is_whitespace)(input)
        .map(|(rest, run)| (run, rest))
        .expect("take_till never fails")
}

/// Splits leading whitespace off `input`.
fn skip_ws(input: &str) -> (usize, &str) {
    let (rest, _) = space0::<_, NomError>(input).expect("space0 never fails");
    (input.len() - rest.len(), rest)
}

/// Parses a definition body into an expression chain, returning the
/// handle of its root node.
pub fn parse(
    body: &str,
    line_no: u32,
    body_col: u32,
    reg: &mut Registry,
) -> Result<usize, Located<SpecError>> {
    parse_operand_and_chain(body, line_no, body_col, reg)
}

fn parse_operand_and_chain(
    input: &str,
    line_no: u32,
    col: u32,
    reg: &mut Registry,
) -> Result<usize, Located<SpecError>> {
    let (op1, rest, rest_col) = read_operand(input, line_no, col, reg)?;
    finish_node(op1, rest, line_no, rest_col, reg)
}

/// Decides the operator following an already-read operand `op1` and
/// assembles the node, recursing for whatever continues the chain.
fn finish_node(
    op1: Operand,
    rest: &str,
    line_no: u32,
    rest_col: u32,
    reg: &mut Registry,
) -> Result<usize, Located<SpecError>> {
    let (ws_len, after_ws) = skip_ws(rest);
    let after_ws_col = rest_col + ws_len as u32;

    if after_ws.is_empty() {
        return alloc_expr(
            reg,
            Expr {
                op: Op::NoOp,
                op1,
                op2: Operand::nothing(),
            },
            line_no,
            after_ws_col,
        );
    }

    match after_ws.as_bytes()[0] {
        b'|' => {
            let remainder = &after_ws[1..];
            let remainder_col = after_ws_col + 1;
            let op2 = parse_operand_and_chain(remainder, line_no, remainder_col, reg)?;
            alloc_expr(
                reg,
                Expr {
                    op: Op::Or,
                    op1,
                    op2: Operand::nested(op2),
                },
                line_no,
                after_ws_col,
            )
        }
        b'*' => {
            let remainder = &after_ws[1..];
            let remainder_col = after_ws_col + 1;
            let closure = alloc_expr(
                reg,
                Expr {
                    op: Op::ZeroOrMore,
                    op1,
                    op2: Operand::nothing(),
                },
                line_no,
                after_ws_col,
            )?;
            finish_node(Operand::nested(closure), remainder, line_no, remainder_col, reg)
        }
        _ => {
            let op2 = parse_operand_and_chain(after_ws, line_no, after_ws_col, reg)?;
            alloc_expr(
                reg,
                Expr {
                    op: Op::And,
                    op1,
                    op2: Operand::nested(op2),
                },
                line_no,
                after_ws_col,
            )
        }
    }
}

/// Reads one operand: a maximal run of non-whitespace bytes, with the
/// trailing-unescaped-`*` pushback, then classifies it as a non-terminal
/// reference or a terminal.
fn read_operand<'a>(
    input: &'a str,
    line_no: u32,
    col: u32,
    reg: &mut Registry,
) -> Result<(Operand, &'a str, u32), Located<SpecError>> {
    let (ws_len, trimmed) = skip_ws(input);
    let col = col + ws_len as u32;

    if trimmed.is_empty() {
        return Err(Located::new(
            SpecError::DanglingOperator { op: '\0' },
            Position::new(line_no, col),
        ));
    }

    let first = trimmed.as_bytes()[0];
    if first == b'|' || first == b'*' {
        return Err(Located::new(
            SpecError::DanglingOperator { op: first as char },
            Position::new(line_no, col),
        ));
    }

    let (mut run, mut rest) = take_run(trimmed);
    let run_len = run.len();
    let mut rest_col = col + run_len as u32;

    if let Some(before_star) = run.strip_suffix('*') {
        let trailing_ats = before_star.bytes().rev().take_while(|&b| b == b'@').count();
        if trailing_ats % 2 == 0 {
            run = before_star;
            rest = &trimmed[run_len - 1..];
            rest_col -= 1;
        }
    }

    if let Some(name) = run.strip_prefix('$') {
        if name.is_empty() {
            return Err(Located::new(SpecError::EmptyName, Position::new(line_no, col)));
        }
        let idx = reg
            .resolve_reference(name)
            .map_err(|e| Located::new(SpecError::CapacityExceeded(e), Position::new(line_no, col)))?;
        Ok((Operand::non_terminal(idx), rest, rest_col))
    } else {
        let decoded = decode_escapes(run, line_no, col, reg)?;
        let offset = reg
            .terminals
            .intern(&decoded)
            .map_err(|e| Located::new(SpecError::CapacityExceeded(e), Position::new(line_no, col)))?;
        Ok((Operand::terminal(offset), rest, rest_col))
    }
}

/// Decodes the escape table of `spec.md` §4.4/§6 over one operand run.
/// Unrecognised `@x` pairs warn and decode to `x` verbatim; a trailing
/// lone `@` is fatal.
fn decode_escapes(
    run: &str,
    line_no: u32,
    col: u32,
    reg: &mut Registry,
) -> Result<Vec<u8>, Located<SpecError>> {
    let bytes = run.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'@' {
            out.push(b);
            i += 1;
            continue;
        }
        if i + 1 >= bytes.len() {
            return Err(Located::new(
                SpecError::IncompleteEscape,
                Position::new(line_no, col + i as u32),
            ));
        }
        let next = bytes[i + 1];
        let decoded = match next {
            b'_' => b' ',
            b'@' => b'@',
            b'|' => b'|',
            b'*' => b'*',
            b'$' => b'$',
            other => {
                reg.warnings.push(Located::new(
                    format!(
                        "unrecognised escape '@{}'; copying '{}' verbatim",
                        other as char, other as char
                    ),
                    Position::new(line_no, col + i as u32),
                ));
                other
            }
        };
        out.push(decoded);
        i += 2;
    }
    Ok(out)
}

fn alloc_expr(
    reg: &mut Registry,
    node: Expr,
    line_no: u32,
    col: u32,
) -> Result<usize, Located<SpecError>> {
    reg.exprs
        .alloc(node)
        .map_err(|e| Located::new(SpecError::CapacityExceeded(e), Position::new(line_no, col)))
}
