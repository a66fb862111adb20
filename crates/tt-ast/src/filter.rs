//! `BooleanExpression` -- the filter AST (spec §3 filter tree, §4.4).
//!
//! This is the *raw* shape produced while walking a program; [`tt_filter`]
//! normalizes it into the closed CNF shape (`True | False |
//! And(Or(literal)*)`) that [`tt_nn`] actually serializes.

use crate::value::Value;

/// A boolean expression over table/stream parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpression {
    True,
    False,
    And(Vec<BooleanExpression>),
    Or(Vec<BooleanExpression>),
    Not(Box<BooleanExpression>),
    /// `param:<name> <op> <value>`.
    Atom { name: String, op: String, value: Value },
    /// An existential subquery lowered to its legacy `@kind.channel(...) {
    /// filter }` form.
    External { kind: String, channel: String, in_params: Vec<(String, Value)>, filter: Box<BooleanExpression> },
    /// `<lhs> <op> <rhs>`, comparing two computed values.
    Compute { lhs: Value, op: String, rhs: Value },
    /// `true param:<name>` -- the parameter may hold any value, but must be
    /// present.
    DontCare { name: String },
}

impl BooleanExpression {
    pub fn and(parts: impl IntoIterator<Item = BooleanExpression>) -> Self {
        BooleanExpression::And(parts.into_iter().collect())
    }

    pub fn or(parts: impl IntoIterator<Item = BooleanExpression>) -> Self {
        BooleanExpression::Or(parts.into_iter().collect())
    }

    /// Whether this node is one of the six literal shapes CNF allows:
    /// `Atom | Not(Atom) | External | Not(External) | Compute | DontCare`.
    pub fn is_literal(&self) -> bool {
        match self {
            BooleanExpression::Atom { .. }
            | BooleanExpression::External { .. }
            | BooleanExpression::Compute { .. }
            | BooleanExpression::DontCare { .. } => true,
            BooleanExpression::Not(inner) => {
                matches!(**inner, BooleanExpression::Atom { .. } | BooleanExpression::External { .. })
            }
            _ => false,
        }
    }
}
