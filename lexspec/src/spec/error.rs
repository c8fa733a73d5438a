//! The seven fatal error kinds of `spec.md` §7.

use crate::arena::CapacityExceeded;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("header line does not start with '$'")]
    MalformedHeader,

    #[error("'$' is not followed by a non-terminal name")]
    EmptyName,

    #[error("missing ':=' or a body in the definition of '{name}'")]
    MissingDefinition { name: String },

    #[error("non-terminal '{name}' is already defined")]
    Redefinition { name: String },

    #[error("'{op}' encountered where an operand was expected")]
    DanglingOperator { op: char },

    #[error("'@' escape at end of operand")]
    IncompleteEscape,

    #[error(transparent)]
    CapacityExceeded(#[from] CapacityExceeded),
}
