//! The entity bag: a mapping from placeholder name to [`EntityValue`], plus
//! the available/used split a serialization threads through (spec §3).

use rustc_hash::FxHashMap;

use crate::value::EntityValue;

/// A flat mapping from placeholder name (`NUMBER_3`, `GENERIC_ENTITY_tt:device_0`)
/// to the entity value it stands for.
#[derive(Debug, Clone, Default)]
pub struct EntityBag {
    entries: FxHashMap<String, EntityValue>,
}

impl EntityBag {
    pub fn new() -> Self {
        Self { entries: FxHashMap::default() }
    }

    pub fn from_entries(entries: FxHashMap<String, EntityValue>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&EntityValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: String, value: EntityValue) {
        self.entries.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<EntityValue> {
        self.entries.remove(name)
    }

    pub fn into_entries(self) -> FxHashMap<String, EntityValue> {
        self.entries
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &EntityValue)> {
        self.entries.iter()
    }

    /// All placeholder names whose kind prefix is exactly `kind` (the part
    /// of the name before the trailing `_<n>`).
    pub fn keys_with_kind(&self, kind: &str) -> Vec<String> {
        let mut out: Vec<String> = self
            .entries
            .keys()
            .filter(|k| placeholder_kind(k).as_deref() == Some(kind))
            .cloned()
            .collect();
        out.sort();
        out
    }

    /// The smallest unused offset `n` for placeholders of the given kind,
    /// read from the **offsets** the bag has seen so far rather than from
    /// the entity names themselves -- see spec §9 Open Questions on
    /// `SequentialEntityAllocator.updateOffsets`: this bag is the "offsets"
    /// reading, not the "entity name" reading.
    pub fn next_offset(&self, kind: &str) -> usize {
        self.entries
            .keys()
            .filter_map(|k| {
                let n = placeholder_index(k)?;
                if placeholder_kind(k).as_deref() == Some(kind) {
                    Some(n + 1)
                } else {
                    None
                }
            })
            .max()
            .unwrap_or(0)
    }
}

/// Split a placeholder name `<KIND>_<n>` into its kind prefix. Returns
/// `None` if the name does not end in `_<digits>`.
pub fn placeholder_kind(name: &str) -> Option<String> {
    let idx = name.rfind('_')?;
    let (kind, rest) = name.split_at(idx);
    let digits = &rest[1..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(kind.to_string())
}

/// The trailing `<n>` of a placeholder name, if well formed.
pub fn placeholder_index(name: &str) -> Option<usize> {
    let idx = name.rfind('_')?;
    name[idx + 1..].parse().ok()
}

/// The two bags threaded through one serialization: entities not yet
/// referenced, and entities already emitted into the token stream.
///
/// Invariant (spec §3): a placeholder name exists in exactly one of the two
/// bags at a time; movement is unidirectional `available -> used`.
#[derive(Debug, Clone, Default)]
pub struct RetrievalBags {
    pub available: EntityBag,
    pub used: EntityBag,
}

impl RetrievalBags {
    pub fn new(available: EntityBag) -> Self {
        Self { available, used: EntityBag::new() }
    }

    /// Move a placeholder from `available` to `used`. Panics if the name is
    /// not currently in `available` -- this would indicate a retriever bug,
    /// not a user-facing error.
    pub fn mark_used(&mut self, name: &str) {
        let value = self
            .available
            .remove(name)
            .expect("mark_used called on a name not present in the available bag");
        self.used.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_kind_parses_simple_names() {
        assert_eq!(placeholder_kind("NUMBER_3").as_deref(), Some("NUMBER"));
        assert_eq!(placeholder_kind("GENERIC_ENTITY_tt:device_0").as_deref(), Some("GENERIC_ENTITY_tt:device"));
        assert_eq!(placeholder_kind("not_a_placeholder"), None);
    }

    #[test]
    fn next_offset_initializes_from_existing_keys() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(1.0));
        bag.insert("NUMBER_2".into(), EntityValue::Number(2.0));
        assert_eq!(bag.next_offset("NUMBER"), 3);
        assert_eq!(bag.next_offset("QUOTED_STRING"), 0);
    }

    #[test]
    fn mark_used_moves_between_bags() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(1.0));
        let mut bags = RetrievalBags::new(bag);
        bags.mark_used("NUMBER_0");
        assert!(!bags.available.contains("NUMBER_0"));
        assert!(bags.used.contains("NUMBER_0"));
    }
}
