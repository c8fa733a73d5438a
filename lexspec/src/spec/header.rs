//! The header-line parser: `$name := body` (`spec.md` §4.3).

use super::error::SpecError;
use super::Registry;
use crate::diagnostics::{Located, Position};
use nom::bytes::complete::tag;
use nom::character::complete::space0;

type NomError<'a> = nom::error::Error<&'a str>;

/// A successfully parsed header: the non-terminal being defined, and the
/// unparsed body text together with the column it starts at (so the body
/// parser can keep reporting positions against the original line).
pub struct Header<'a> {
    pub nonterm: usize,
    pub body: &'a str,
    pub body_col: u32,
}

/// Parses one non-blank, non-comment line as a non-terminal definition.
pub fn parse<'a>(
    line: &'a str,
    line_no: u32,
    reg: &mut Registry,
) -> Result<Header<'a>, Located<SpecError>> {
    let leading_ws = line.len() - line.trim_start().len();
    let rest = line.trim_start();
    let dollar_col = leading_ws as u32 + 1;

    let after_dollar: &str = match tag::<_, _, NomError>("$")(rest) {
        Ok((remainder, _)) => remainder,
        Err(_) => {
            return Err(Located::new(
                SpecError::MalformedHeader,
                Position::new(line_no, dollar_col),
            ))
        }
    };

    let (after_name, name): (&str, &str) =
        match nom::bytes::complete::take_till1::<_, _, NomError>(char::is_whitespace)(after_dollar)
        {
            Ok(v) => v,
            Err(_) => {
                return Err(Located::new(
                    SpecError::EmptyName,
                    Position::new(line_no, dollar_col),
                ))
            }
        };
    let name_col = dollar_col + 1;

    let (after_ws1, _) = space0::<_, NomError>(after_name).expect("space0 never fails");
    let assign_col = name_col + name.len() as u32 + (after_name.len() - after_ws1.len()) as u32;

    let after_assign: &str = match tag::<_, _, NomError>(":=")(after_ws1) {
        Ok((remainder, _)) => remainder,
        Err(_) => {
            return Err(Located::new(
                SpecError::MissingDefinition {
                    name: name.to_string(),
                },
                Position::new(line_no, assign_col),
            ))
        }
    };

    let (body, _) = space0::<_, NomError>(after_assign).expect("space0 never fails");
    let body_col = assign_col + 2 + (after_assign.len() - body.len()) as u32;

    if body.is_empty() {
        return Err(Located::new(
            SpecError::MissingDefinition {
                name: name.to_string(),
            },
            Position::new(line_no, body_col),
        ));
    }

    let nonterm = reg
        .begin_definition(name)
        .map_err(|e| Located::new(e, Position::new(line_no, name_col)))?;

    Ok(Header {
        nonterm,
        body,
        body_col,
    })
}
