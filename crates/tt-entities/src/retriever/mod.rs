//! Entity retrievers (spec §4.3): given a projected [`EntityValue`], produce
//! the token-level form that should stand in for it.
//!
//! Retrievers don't know about [`tt_common::Token`] or [`tt_common::List`] --
//! that would put a dependency from this crate onto the one that depends on
//! it. Instead they return a [`RetrievedForm`], which the NN compiler
//! (`tt-nn`, which depends on both `tt-common` and `tt-entities`) lowers into
//! actual tokens.

pub mod sentence;
pub mod sequential;

use crate::error::EntityError;
use crate::value::EntityValue;

/// Options threaded into every `find_entity` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindEntityOpts {
    /// If a retrieval strategy fails, return `Ok(None)` instead of an error.
    pub ignore_not_found: bool,
}

/// The token-level shape a retriever decided on for one literal.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievedForm {
    /// Reference an existing or freshly allocated placeholder.
    Placeholder(String),
    /// Emit the value inline, as a sequence of wire terms (quoted string
    /// pieces, `new Date ( ... )`, `^^type` suffixes, ...).
    Inline(Vec<InlineTerm>),
}

/// One piece of an inline wire form. Kept deliberately small and
/// string-based; `tt-nn` maps each variant onto the right [`tt_common::TerminalKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum InlineTerm {
    /// A bare structural keyword or punctuation token (`"`, `new`, `Date`, `(`, `)`, `,`).
    Keyword(&'static str),
    /// One piece of quoted text, emitted as a `WORD` token inside a string.
    Word(String),
    /// An entity-type tag suffix, e.g. `^^tt:hashtag`.
    EntityType(String),
}

/// Common contract both retrievers expose (spec §4.3).
pub trait EntityRetriever {
    fn find_entity(
        &mut self,
        kind: &str,
        value: &EntityValue,
        opts: FindEntityOpts,
    ) -> Result<Option<RetrievedForm>, EntityError>;
}
