//! The lexer's entity-resolution seam (spec §4.6): the lexer classifies
//! tokens but never owns the entity bag itself -- that's supplied by the
//! caller through this trait, so the same lexer works whether it's fed by
//! `from_nn`'s caller-provided bag or a training-data replay harness.

use tt_common::ThingTalkError;
use tt_entities::EntityValue;

/// `resolve(name, last_param, last_function, unit)` -- spec §4.6.
pub trait EntityResolver {
    fn resolve(
        &mut self,
        name: &str,
        last_param: Option<&str>,
        last_function: Option<&str>,
        unit: Option<&str>,
    ) -> Result<EntityValue, ThingTalkError>;
}

/// A resolver backed by a flat entity bag, the common case for `from_nn`.
/// `SLOT_*` placeholders resolve to `Undefined` rather than failing even
/// when absent from the bag -- an as-yet-unfilled slot is valid input, not
/// malformed (spec §4.6).
pub struct BagEntityResolver<'a> {
    bag: &'a tt_entities::EntityBag,
}

impl<'a> BagEntityResolver<'a> {
    pub fn new(bag: &'a tt_entities::EntityBag) -> Self {
        Self { bag }
    }
}

impl<'a> EntityResolver for BagEntityResolver<'a> {
    fn resolve(
        &mut self,
        name: &str,
        _last_param: Option<&str>,
        _last_function: Option<&str>,
        _unit: Option<&str>,
    ) -> Result<EntityValue, ThingTalkError> {
        if let Some(value) = self.bag.get(name) {
            return Ok(value.clone());
        }
        if name.starts_with("SLOT_") {
            return Ok(EntityValue::Undefined);
        }
        Err(ThingTalkError::syntax(format!("invalid entity {name}: not present in the entity bag"), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_entities::EntityBag;

    #[test]
    fn missing_slot_resolves_to_undefined() {
        let bag = EntityBag::new();
        let mut resolver = BagEntityResolver::new(&bag);
        let value = resolver.resolve("SLOT_0", None, None, None).unwrap();
        assert!(matches!(value, EntityValue::Undefined));
    }

    #[test]
    fn missing_non_slot_entity_is_an_error() {
        let bag = EntityBag::new();
        let mut resolver = BagEntityResolver::new(&bag);
        assert!(resolver.resolve("NUMBER_0", None, None, None).is_err());
    }

    #[test]
    fn present_entity_resolves_from_the_bag() {
        let mut bag = EntityBag::new();
        bag.insert("NUMBER_0".into(), EntityValue::Number(42.0));
        let mut resolver = BagEntityResolver::new(&bag);
        let value = resolver.resolve("NUMBER_0", None, None, None).unwrap();
        assert!(matches!(value, EntityValue::Number(n) if n == 42.0));
    }
}
