//! Errors raised by the entity retrievers (spec §7).

use std::fmt;

/// Errors a retriever can raise while resolving a literal to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityError {
    /// No retrieval strategy succeeded and `ignore_not_found` was false.
    CannotFindEntity { kind: String, display: String },
    /// The *used* bag held more than one candidate for the same value.
    AmbiguousEntity { kind: String, display: String, candidates: Vec<String> },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::CannotFindEntity { kind, display } => {
                write!(f, "cannot find entity of kind {kind} for value {display:?}")
            }
            EntityError::AmbiguousEntity { kind, display, candidates } => {
                write!(
                    f,
                    "ambiguous entity of kind {kind} for value {display:?}: candidates {candidates:?}"
                )
            }
        }
    }
}

impl std::error::Error for EntityError {}
