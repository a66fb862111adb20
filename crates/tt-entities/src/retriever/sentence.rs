//! `SentenceEntityRetriever` -- §4.3.1. Prefers a literal match against the
//! input sentence over a context-bag lookup, because predicting a literal
//! that appears verbatim in the sentence is a stronger signal than a context
//! entity that merely happens to carry the same value.

use crate::bag::RetrievalBags;
use crate::error::EntityError;
use crate::registry::is_known_string_like_kind;
use crate::value::EntityValue;

use super::{EntityRetriever, FindEntityOpts, InlineTerm, RetrievedForm};

/// Whether `kind`/`value` should attempt a sentence match before falling
/// back to the bag.
///
/// Inherited quirk (spec §9 Open Questions): the source this was ported from
/// guards generic entities with `(entityType.startsWith('GENERIC_ENTITY_') &&
/// entity.display)`, parenthesized in a way that reads like it could bind
/// differently than intended against the surrounding `||`. Preserved as-is
/// rather than "fixed" -- the observable behavior (generic entities only
/// sentence-match when they carry a display string) is what every known
/// source tree actually executes.
fn is_string_like(kind: &str, value: &EntityValue) -> bool {
    if kind.starts_with("GENERIC_ENTITY") {
        matches!(value, EntityValue::Generic { display: Some(_), .. })
    } else {
        is_known_string_like_kind(kind)
    }
}

/// Lowercase, whitespace-tokenize `text`, returning the pieces in order.
fn tokenize_lower(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Find a contiguous, case-insensitive match of `needle` inside `haystack`
/// (both already lowercased). Returns the byte-slice-equivalent matched
/// words, or `None`.
fn find_contiguous(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Wire form for a successful sentence match, per spec §6.3.
fn sentence_wire_form(kind: &str, text: &str) -> RetrievedForm {
    let mut terms = vec![InlineTerm::Keyword("\"")];
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            terms.push(InlineTerm::Keyword(" "));
        }
        terms.push(InlineTerm::Word(word.to_string()));
    }
    terms.push(InlineTerm::Keyword("\""));
    match kind {
        "HASHTAG" => terms.push(InlineTerm::EntityType("tt:hashtag".into())),
        "USERNAME" => terms.push(InlineTerm::EntityType("tt:username".into())),
        "LOCATION" => {
            terms = vec![InlineTerm::Keyword("location:"), InlineTerm::Keyword("\"")];
            for (i, word) in text.split_whitespace().enumerate() {
                if i > 0 {
                    terms.push(InlineTerm::Keyword(" "));
                }
                terms.push(InlineTerm::Word(word.to_string()));
            }
            terms.push(InlineTerm::Keyword("\""));
        }
        k if k.starts_with("GENERIC_ENTITY") => {
            let entity_type = k.trim_start_matches("GENERIC_ENTITY_");
            terms.push(InlineTerm::EntityType(entity_type.to_string()));
        }
        _ => {}
    }
    RetrievedForm::Inline(terms)
}

pub struct SentenceEntityRetriever {
    sentence: Vec<String>,
    bags: RetrievalBags,
}

impl SentenceEntityRetriever {
    pub fn new(sentence_text: &str, bags: RetrievalBags) -> Self {
        Self { sentence: tokenize_lower(sentence_text), bags }
    }

    pub fn into_bags(self) -> RetrievalBags {
        self.bags
    }

    fn try_sentence_match(&self, kind: &str, value: &EntityValue) -> Option<RetrievedForm> {
        if is_known_string_like_kind(kind) && is_string_like(kind, value) {
            let display = value.display_string();
            if display.is_empty() {
                return None;
            }
            let needle = tokenize_lower(&display);
            if find_contiguous(&self.sentence, &needle) {
                return Some(sentence_wire_form(kind, &display));
            }
        }
        if kind == "DATE" {
            if let EntityValue::Date(date) = value {
                let iso = crate::iso8601::format_epoch_millis(date.to_epoch_millis());
                if self.sentence.iter().any(|w| w == &iso.to_lowercase()) {
                    return Some(RetrievedForm::Inline(vec![
                        InlineTerm::Keyword("new"),
                        InlineTerm::Keyword("Date"),
                        InlineTerm::Keyword("("),
                        InlineTerm::Keyword("\""),
                        InlineTerm::Word(iso),
                        InlineTerm::Keyword("\""),
                        InlineTerm::Keyword(")"),
                    ]));
                }
            }
        }
        None
    }

    fn bag_candidates(&self, kind: &str, value: &EntityValue) -> Vec<String> {
        let mut out = Vec::new();
        for name in self.bags.available.keys_with_kind(kind) {
            if let Some(v) = self.bags.available.get(&name) {
                if v.entities_equal(value) {
                    out.push(name);
                }
            }
        }
        out
    }

    fn used_candidates(&self, kind: &str, value: &EntityValue) -> Vec<String> {
        let mut out = Vec::new();
        for name in self.bags.used.keys_with_kind(kind) {
            if let Some(v) = self.bags.used.get(&name) {
                if v.entities_equal(value) {
                    out.push(name);
                }
            }
        }
        out
    }
}

impl EntityRetriever for SentenceEntityRetriever {
    fn find_entity(
        &mut self,
        kind: &str,
        value: &EntityValue,
        opts: FindEntityOpts,
    ) -> Result<Option<RetrievedForm>, EntityError> {
        if let Some(form) = self.try_sentence_match(kind, value) {
            return Ok(Some(form));
        }

        let mut available = self.bag_candidates(kind, value);
        if available.is_empty() {
            let used = self.used_candidates(kind, value);
            match used.len() {
                0 => {}
                1 => return Ok(Some(RetrievedForm::Placeholder(used[0].clone()))),
                _ => {
                    return Err(EntityError::AmbiguousEntity {
                        kind: kind.to_string(),
                        display: value.display_string(),
                        candidates: used,
                    })
                }
            }
        }

        if available.is_empty() {
            if opts.ignore_not_found {
                return Ok(None);
            }
            // Last-resort retry before failing -- spec §4.3.1 step 5.
            if let Some(form) = self.try_sentence_match(kind, value) {
                return Ok(Some(form));
            }
            return Err(EntityError::CannotFindEntity {
                kind: kind.to_string(),
                display: value.display_string(),
            });
        }

        available.sort();
        let chosen = available.into_iter().next().unwrap();
        self.bags.mark_used(&chosen);
        Ok(Some(RetrievedForm::Placeholder(chosen)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::EntityBag;

    #[test]
    fn prefers_sentence_match_over_bag_entry() {
        let mut bag = EntityBag::new();
        bag.insert("QUOTED_STRING_0".into(), EntityValue::String("other".into()));
        let bags = RetrievalBags::new(bag);
        let mut retriever = SentenceEntityRetriever::new("please say hello world", bags);
        let got = retriever
            .find_entity("QUOTED_STRING", &EntityValue::String("hello world".into()), FindEntityOpts::default())
            .unwrap();
        assert!(matches!(got, Some(RetrievedForm::Inline(_))));
    }

    #[test]
    fn falls_back_to_bag_when_no_sentence_match() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(1234.0));
        let bags = RetrievalBags::new(bag);
        let mut retriever = SentenceEntityRetriever::new("no numbers here", bags);
        let got = retriever
            .find_entity("NUMBER", &EntityValue::Number(1234.0), FindEntityOpts::default())
            .unwrap();
        assert_eq!(got, Some(RetrievedForm::Placeholder("NUMBER_0".into())));
    }

    #[test]
    fn ambiguous_used_candidates_is_an_error() {
        let bags = RetrievalBags::new(EntityBag::new());
        let mut retriever = SentenceEntityRetriever::new("", bags);
        retriever.bags.used.insert("NUMBER_0".into(), EntityValue::Number(5.0));
        retriever.bags.used.insert("NUMBER_1".into(), EntityValue::Number(5.0));
        let err = retriever
            .find_entity("NUMBER", &EntityValue::Number(5.0), FindEntityOpts::default())
            .unwrap_err();
        assert!(matches!(err, EntityError::AmbiguousEntity { .. }));
    }

    #[test]
    fn ignore_not_found_returns_none_instead_of_erroring() {
        let bags = RetrievalBags::new(EntityBag::new());
        let mut retriever = SentenceEntityRetriever::new("nothing relevant", bags);
        let got = retriever
            .find_entity("NUMBER", &EntityValue::Number(42.0), FindEntityOpts { ignore_not_found: true })
            .unwrap();
        assert_eq!(got, None);
    }
}
