//! `Scope` -- a chained mapping from parameter names to declared types,
//! resolved lexically through the enclosing function schemas (spec §3/§9).
//!
//! Implemented as an immutable, reference-counted linked list rather than
//! borrowed references: every node the compiler visits owns its own `Scope`
//! value for the duration of one visitor call, and cloning a `Scope` is a
//! refcount bump, not a copy of the underlying schemas.

use std::rc::Rc;

use crate::types::ThingTalkType;

struct Frame {
    vars: Vec<(String, ThingTalkType)>,
    parent: Option<Rc<Frame>>,
}

/// A lexical scope: the innermost frame plus a chain of outer frames.
/// `lookup` walks from innermost to outermost, as spec §3/§9 requires; chain
/// depth is bounded by join nesting (< 5 in practice).
#[derive(Clone, Default)]
pub struct Scope(Option<Rc<Frame>>);

impl Scope {
    pub fn root() -> Self {
        Scope(None)
    }

    /// Push a new innermost frame declaring `vars`, keeping `self` as the
    /// outer scope.
    pub fn push(&self, vars: Vec<(String, ThingTalkType)>) -> Scope {
        Scope(Some(Rc::new(Frame { vars, parent: self.0.clone() })))
    }

    /// Look up `name`, walking from the innermost frame outward.
    pub fn lookup(&self, name: &str) -> Option<ThingTalkType> {
        let mut cursor = self.0.as_ref();
        while let Some(frame) = cursor {
            if let Some((_, ty)) = frame.vars.iter().find(|(n, _)| n == name) {
                return Some(ty.clone());
            }
            cursor = frame.parent.as_ref();
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_innermost_first() {
        let outer = Scope::root().push(vec![("x".into(), ThingTalkType::Number)]);
        let inner = outer.push(vec![("x".into(), ThingTalkType::String)]);
        assert_eq!(inner.lookup("x"), Some(ThingTalkType::String));
    }

    #[test]
    fn lookup_falls_back_to_outer_scope() {
        let outer = Scope::root().push(vec![("y".into(), ThingTalkType::Boolean)]);
        let inner = outer.push(vec![("x".into(), ThingTalkType::Number)]);
        assert_eq!(inner.lookup("y"), Some(ThingTalkType::Boolean));
        assert_eq!(inner.lookup("z"), None);
    }
}
