//! Parses `--limit KEY=VALUE` overrides onto a [`Limits`] value.

use lexspec::limits::Limits;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed --limit {0:?}, expected KEY=VALUE")]
    Malformed(String),
    #[error("unknown limit {0:?}")]
    UnknownKey(String),
    #[error("--limit {key}={value:?} is not a valid number")]
    NotANumber { key: String, value: String },
}

/// Applies every `KEY=VALUE` override in `overrides`, in order, to the
/// production defaults.
pub fn apply(overrides: &[String]) -> Result<Limits, Error> {
    let mut limits = Limits::default();
    for entry in overrides {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| Error::Malformed(entry.clone()))?;
        let value: usize = value
            .trim()
            .parse()
            .map_err(|_| Error::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
            })?;
        match key.trim() {
            "max_nonterminals" => limits.max_nonterminals = value,
            "max_nonterminal_name_len" => limits.max_nonterminal_name_len = value,
            "max_terminal_bytes" => limits.max_terminal_bytes = value,
            "max_expr_nodes" => limits.max_expr_nodes = value,
            "max_line_len" => limits.max_line_len = value,
            "max_nfa_states" => limits.max_nfa_states = value,
            "max_edges_per_state" => limits.max_edges_per_state = value,
            "max_nfa_handles" => limits.max_nfa_handles = value,
            other => return Err(Error::UnknownKey(other.to_string())),
        }
    }
    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_a_known_key() {
        let limits = apply(&["max_nfa_states=64".to_string()]).unwrap();
        assert_eq!(limits.max_nfa_states, 64);
        assert_eq!(limits.max_nonterminals, Limits::default().max_nonterminals);
    }

    #[test]
    fn rejects_unknown_key() {
        let err = apply(&["bogus=1".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnknownKey(k) if k == "bogus"));
    }

    #[test]
    fn rejects_non_numeric_value() {
        let err = apply(&["max_nfa_states=many".to_string()]).unwrap_err();
        assert!(matches!(err, Error::NotANumber { .. }));
    }

    #[test]
    fn rejects_missing_equals() {
        let err = apply(&["max_nfa_states".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
