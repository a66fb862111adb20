//! The entity registry: kind classification shared by the retrievers and the
//! lexer. Projection (`value_of`) lives with the AST types that can produce
//! an [`EntityValue`] (`tt-ast`); this module only knows the *kinds*.

/// Placeholder kinds whose value is matched against the sentence before
/// falling back to the entity bag (spec §4.3.1 step 2).
const STRING_LIKE_KINDS: &[&str] = &["QUOTED_STRING", "HASHTAG", "USERNAME", "LOCATION"];

/// Whether `kind` should first try a sentence match. `GENERIC_ENTITY` kinds
/// (which carry their own sub-type suffix, e.g. `GENERIC_ENTITY_tt:device`)
/// are string-like whenever the projected value has a `display` -- that
/// check needs the value itself, so this function only covers the kinds
/// whose string-likeness doesn't depend on the value (see
/// `retriever::sentence::is_string_like` for the full predicate).
pub fn is_known_string_like_kind(kind: &str) -> bool {
    STRING_LIKE_KINDS.contains(&kind) || kind.starts_with("GENERIC_ENTITY")
}

/// Whether `kind` is `DATE` -- handled separately because the sentence match
/// is against the ISO-8601 string, not a token-for-token display match.
pub fn is_date_kind(kind: &str) -> bool {
    kind == "DATE"
}
