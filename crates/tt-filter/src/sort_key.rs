//! Canonical sort keys for filter literals and conjuncts (spec §4.4 step 4:
//! "sort ... lexicographically by their flattened token form").
//!
//! This produces a deterministic textual rendering of a literal, not the
//! exact NN wire tokens (that would require depending on `tt-nn`, which
//! itself depends on this crate to normalize the filters it serializes --
//! a genuine cycle in the spec's own component graph, per its "tightly
//! coupled subsystems" framing in §1). `tt-nn::filter::cnf_filter_to_nn`
//! re-uses this exact key when it sorts conjuncts/disjuncts before emitting
//! tokens, so the two layers never disagree on ordering even though this
//! key isn't itself NN wire syntax.

use tt_ast::value::{DateLiteral, EventValue, LocationValue, Value};
use tt_ast::BooleanExpression;

pub fn value_key(value: &Value) -> String {
    match value {
        Value::Boolean(b) => format!("bool:{b}"),
        Value::String(s) => format!("str:{s}"),
        Value::Number(n) => format!("num:{n}"),
        Value::Measure { value, unit } => format!("measure:{value}{unit}"),
        Value::Currency { value, code } => format!("currency:{value}{code}"),
        Value::Location(LocationValue::Absolute { lat, lon, .. }) => format!("loc:{lat},{lon}"),
        Value::Location(LocationValue::Relative(name)) => format!("loc:{name}"),
        Value::Date(DateLiteral::Now) => "date:now".to_string(),
        Value::Date(DateLiteral::Edge { edge, unit }) => format!("date:{edge}:{unit}"),
        Value::Date(DateLiteral::Piece { year, month, day, .. }) => {
            format!("date:{year:?}-{month:?}-{day:?}")
        }
        Value::Date(DateLiteral::WeekDay { day, .. }) => format!("date:{day}"),
        Value::Date(DateLiteral::Absolute(d)) => format!("date:{}-{}-{}", d.year, d.month, d.day),
        Value::Time(t) => format!("time:{}:{}:{}", t.hour, t.minute, t.second),
        Value::Enum(e) => format!("enum:{e}"),
        Value::Entity { value, entity_type, .. } => format!("entity:{entity_type}:{value:?}"),
        Value::VarRef { name } => format!("var:{name}"),
        Value::ContextRef { name, .. } => format!("ctx:{name}"),
        Value::Event(EventValue::Generic) => "event".to_string(),
        Value::Event(EventValue::Type) => "event.type".to_string(),
        Value::Event(EventValue::Program) => "event.program".to_string(),
        Value::Array(items) => format!("[{}]", items.iter().map(value_key).collect::<Vec<_>>().join(",")),
        Value::Object(fields) => format!(
            "{{{}}}",
            fields.iter().map(|(k, v)| format!("{k}={}", value_key(v))).collect::<Vec<_>>().join(",")
        ),
        Value::Filter { value, filter } => format!("{} filter {{{}}}", value_key(value), literal_key(filter)),
        Value::Undefined { .. } => "undefined".to_string(),
        Value::RecurrentTimeSpecification(_) => "recurrent_time".to_string(),
        Value::Slot { name } => format!("slot:{name:?}"),
    }
}

/// A canonical key for one CNF literal (`Atom | Not(Atom) | External |
/// Not(External) | Compute | DontCare`).
pub fn literal_key(expr: &BooleanExpression) -> String {
    match expr {
        BooleanExpression::True => "true".to_string(),
        BooleanExpression::False => "false".to_string(),
        BooleanExpression::Atom { name, op, value } => format!("{name}{op}{}", value_key(value)),
        BooleanExpression::Not(inner) => format!("!{}", literal_key(inner)),
        BooleanExpression::External { kind, channel, in_params, filter } => {
            let params = in_params
                .iter()
                .map(|(n, v)| format!("{n}={}", value_key(v)))
                .collect::<Vec<_>>()
                .join(",");
            format!("@{kind}.{channel}({params}){{{}}}", literal_key(filter))
        }
        BooleanExpression::Compute { lhs, op, rhs } => format!("{}{op}{}", value_key(lhs), value_key(rhs)),
        BooleanExpression::DontCare { name } => format!("dontcare:{name}"),
        // `And`/`Or` never reach this function on a well-formed CNF literal;
        // rendered anyway (rather than panicking) so a malformed tree still
        // sorts deterministically instead of crashing the normalizer.
        BooleanExpression::And(parts) => format!("and({})", parts.iter().map(literal_key).collect::<Vec<_>>().join(",")),
        BooleanExpression::Or(parts) => format!("or({})", parts.iter().map(literal_key).collect::<Vec<_>>().join(",")),
    }
}

/// A canonical key for one disjunction (sorted set of literals joined with `|`).
pub fn disjunction_key(literals: &[BooleanExpression]) -> String {
    literals.iter().map(literal_key).collect::<Vec<_>>().join("|")
}
