//! `SequentialEntityAllocator` -- §4.3.2. Used when `opts.allocate_entities`
//! is set: there is no sentence to match against, so every literal either
//! reuses an existing bag entry with an equal value or gets a freshly
//! allocated placeholder name.

use rustc_hash::FxHashMap;

use crate::bag::EntityBag;
use crate::error::EntityError;
use crate::registry::is_known_string_like_kind;
use crate::value::EntityValue;

use super::{EntityRetriever, FindEntityOpts, InlineTerm, RetrievedForm};

pub struct SequentialEntityAllocator {
    bag: EntityBag,
    explicit_strings: bool,
    /// Per-kind offsets, seeded from the pre-populated bag's existing keys
    /// and advanced on every fresh allocation. Kept distinct from the bag's
    /// own entries so that `SequentialEntityAllocator` with a pre-populated
    /// bag never overwrites an existing key (spec §8 Entity allocator
    /// invariants) -- see §9 Open Questions: this is the "offsets" reading
    /// of `updateOffsets`, not the entity-name-scoped reading some source
    /// trees use.
    offsets: FxHashMap<String, usize>,
}

impl SequentialEntityAllocator {
    pub fn new(bag: EntityBag, explicit_strings: bool) -> Self {
        Self { bag, explicit_strings, offsets: FxHashMap::default() }
    }

    pub fn into_bag(self) -> EntityBag {
        self.bag
    }

    fn next_name(&mut self, kind: &str) -> String {
        let offset = self.offsets.entry(kind.to_string()).or_insert_with(|| self.bag.next_offset(kind));
        let name = format!("{kind}_{offset}");
        *offset += 1;
        name
    }

    fn find_existing(&self, kind: &str, value: &EntityValue) -> Option<String> {
        self.bag
            .keys_with_kind(kind)
            .into_iter()
            .find(|name| self.bag.get(name).map(|v| v.entities_equal(value)).unwrap_or(false))
    }

    fn inline_form(kind: &str, value: &EntityValue) -> RetrievedForm {
        let text = value.display_string();
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
            k if k.starts_with("GENERIC_ENTITY") => {
                terms.push(InlineTerm::EntityType(k.trim_start_matches("GENERIC_ENTITY_").to_string()))
            }
            _ => {}
        }
        RetrievedForm::Inline(terms)
    }
}

impl EntityRetriever for SequentialEntityAllocator {
    fn find_entity(
        &mut self,
        kind: &str,
        value: &EntityValue,
        _opts: FindEntityOpts,
    ) -> Result<Option<RetrievedForm>, EntityError> {
        if self.explicit_strings && is_known_string_like_kind(kind) {
            return Ok(Some(Self::inline_form(kind, value)));
        }
        if let Some(existing) = self.find_existing(kind, value) {
            return Ok(Some(RetrievedForm::Placeholder(existing)));
        }
        let name = self.next_name(kind);
        self.bag.insert(name.clone(), value.clone());
        Ok(Some(RetrievedForm::Placeholder(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_fresh_names_in_order() {
        let mut allocator = SequentialEntityAllocator::new(EntityBag::new(), false);
        let a = allocator.find_entity("NUMBER", &EntityValue::Number(1.0), FindEntityOpts::default()).unwrap();
        let b = allocator.find_entity("NUMBER", &EntityValue::Number(2.0), FindEntityOpts::default()).unwrap();
        assert_eq!(a, Some(RetrievedForm::Placeholder("NUMBER_0".into())));
        assert_eq!(b, Some(RetrievedForm::Placeholder("NUMBER_1".into())));
    }

    #[test]
    fn reuses_existing_entry_with_equal_value() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(7.0));
        let mut allocator = SequentialEntityAllocator::new(bag, false);
        let got = allocator.find_entity("NUMBER", &EntityValue::Number(7.0), FindEntityOpts::default()).unwrap();
        assert_eq!(got, Some(RetrievedForm::Placeholder("NUMBER_0".into())));
    }

    #[test]
    fn never_overwrites_existing_keys_when_allocating_fresh_ones() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(7.0));
        let mut allocator = SequentialEntityAllocator::new(bag, false);
        let got = allocator.find_entity("NUMBER", &EntityValue::Number(99.0), FindEntityOpts::default()).unwrap();
        assert_eq!(got, Some(RetrievedForm::Placeholder("NUMBER_1".into())));
    }

    #[test]
    fn explicit_strings_emits_inline_form_for_string_like_kinds() {
        let mut allocator = SequentialEntityAllocator::new(EntityBag::new(), true);
        let got = allocator
            .find_entity("QUOTED_STRING", &EntityValue::String("hi".into()), FindEntityOpts::default())
            .unwrap();
        assert!(matches!(got, Some(RetrievedForm::Inline(_))));
    }
}
