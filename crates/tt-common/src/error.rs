//! The shared error taxonomy (spec §7). Every fallible operation in the
//! workspace produces one of these kinds, directly or via `From`.

use std::fmt;

use tt_entities::EntityError;

/// One token's position in the flat sequence, carried by errors so the CLI
/// can point at the offending token.
pub type SourceIndex = Option<usize>;

/// The top-level error type every crate's local errors convert into.
#[derive(Debug, Clone, PartialEq)]
pub enum ThingTalkError {
    /// Raised by the lexer (unknown entity, malformed `@fn`, bad `context:`)
    /// and the parser (no valid shift/reduce action).
    Syntax { message: String, source_index: SourceIndex },
    /// Raised by the AST -> tokens compiler for constructs outside the NN
    /// sublanguage.
    Unsynthesizable { reason: String },
    /// Raised by the filter normalizer for structures it cannot place in CNF.
    Unserializable { reason: String },
    /// Raised when an AST shape the compiler assumed unreachable was seen.
    /// Indicates a bug, not a user error.
    Type { message: String },
    /// The *used* entity bag held more than one match for a value.
    AmbiguousEntity { kind: String, display: String },
    /// No retrieval strategy succeeded and `ignore_not_found` was false.
    EntityNotFound { kind: String, display: String },
}

impl fmt::Display for ThingTalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThingTalkError::Syntax { message, source_index } => match source_index {
                Some(i) => write!(f, "syntax error at token {i}: {message}"),
                None => write!(f, "syntax error: {message}"),
            },
            ThingTalkError::Unsynthesizable { reason } => write!(f, "cannot synthesize NN tokens: {reason}"),
            ThingTalkError::Unserializable { reason } => write!(f, "cannot serialize filter: {reason}"),
            ThingTalkError::Type { message } => write!(f, "internal type error (this is a bug): {message}"),
            ThingTalkError::AmbiguousEntity { kind, display } => {
                write!(f, "ambiguous entity of kind {kind} for value {display:?}")
            }
            ThingTalkError::EntityNotFound { kind, display } => {
                write!(f, "cannot find entity of kind {kind} for value {display:?}")
            }
        }
    }
}

impl std::error::Error for ThingTalkError {}

impl From<EntityError> for ThingTalkError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::CannotFindEntity { kind, display } => ThingTalkError::EntityNotFound { kind, display },
            EntityError::AmbiguousEntity { kind, display, .. } => {
                ThingTalkError::AmbiguousEntity { kind, display }
            }
        }
    }
}

impl ThingTalkError {
    pub fn syntax(message: impl Into<String>, source_index: SourceIndex) -> Self {
        ThingTalkError::Syntax { message: message.into(), source_index }
    }

    pub fn unsynthesizable(reason: impl Into<String>) -> Self {
        ThingTalkError::Unsynthesizable { reason: reason.into() }
    }

    pub fn unserializable(reason: impl Into<String>) -> Self {
        ThingTalkError::Unserializable { reason: reason.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ThingTalkError::Type { message: message.into() }
    }

    /// The `source_index` this error points at, if any -- used by the CLI
    /// to render an `ariadne` span.
    pub fn source_index(&self) -> SourceIndex {
        match self {
            ThingTalkError::Syntax { source_index, .. } => *source_index,
            _ => None,
        }
    }
}
