//! AST value nodes (spec §3 AST, the `Value` category feeding §4.5's
//! `value_to_nn`).

use tt_entities::value::DateValue as EntityDateValue;
use tt_entities::EntityValue;

use crate::filter::BooleanExpression;
use crate::types::ThingTalkType;

/// Time-of-day, used both standalone and inside date values.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// A location literal, either a named relative location (`home`, `work`,
/// `current_location`) or an absolute lat/lon with optional display text.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationValue {
    Absolute { lat: f64, lon: f64, display: Option<String> },
    Relative(String),
}

/// An absolute calendar date, with optional time-of-day components.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub time: Option<TimeOfDay>,
}

/// The five sub-cases of a date literal (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub enum DateLiteral {
    /// `null` in the source AST, meaning "now".
    Now,
    /// `DateEdge`: `start_of`/`end_of` a unit (`start_of unit:day`).
    Edge { edge: String, unit: String },
    /// `DatePiece`: a date built from partial calendar fields.
    Piece { year: Option<i32>, month: Option<u8>, day: Option<u8>, time: Option<TimeOfDay> },
    /// `WeekDayDate`: the next occurrence of a weekday, optionally with time.
    WeekDay { day: String, time: Option<TimeOfDay> },
    /// A concrete, fully resolved date.
    Absolute(AbsoluteDate),
}

/// The three `$event.*` forms (spec §4.5/§7 `$event.*` handling).
#[derive(Debug, Clone, PartialEq)]
pub enum EventValue {
    Generic,
    Type,
    Program,
}

/// One rule of a `RecurrentTimeSpecification` (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentTimeRule {
    pub begin_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub interval: Option<(f64, String)>,
    pub frequency: Option<i64>,
    pub day_of_week: Vec<String>,
    pub begin_date: Option<DateLiteral>,
    pub end_date: Option<DateLiteral>,
    pub subtract: bool,
}

/// Every kind of ThingTalk value (spec §3 `Value`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    String(String),
    Number(f64),
    Measure { value: f64, unit: String },
    Currency { value: f64, code: String },
    Location(LocationValue),
    Date(DateLiteral),
    Time(TimeOfDay),
    Enum(String),
    Entity { value: Option<String>, display: Option<String>, entity_type: String },
    VarRef { name: String },
    ContextRef { name: String, ty: ThingTalkType },
    Event(EventValue),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    Filter { value: Box<Value>, filter: Box<BooleanExpression> },
    Undefined { local: bool },
    RecurrentTimeSpecification(Vec<RecurrentTimeRule>),
    /// An as-yet-unfilled slot in a partially specified command.
    Slot { name: Option<String> },
}

impl Value {
    /// `isSmallInteger` per spec §4.5: a non-negative integral value at most
    /// 12, small enough to be emitted as an inline literal instead of
    /// allocating a `NUMBER_*` placeholder.
    pub fn is_small_integer(v: f64) -> bool {
        v.floor() == v && (0.0..=12.0).contains(&v)
    }

    /// Project this value onto the narrow [`EntityValue`] shape the entity
    /// bag stores and compares, where that makes sense. Returns `None` for
    /// values that never go through the entity bag (`VarRef`, `ContextRef`,
    /// `Event`, `Array`, `Object`, `Filter`, `Undefined`, `Slot`, `Boolean`,
    /// `Enum`).
    pub fn project_to_entity(&self) -> Option<EntityValue> {
        match self {
            Value::String(s) => Some(EntityValue::String(s.clone())),
            Value::Number(n) => Some(EntityValue::Number(*n)),
            Value::Measure { value, unit } => Some(EntityValue::Measure { unit: unit.clone(), value: *value }),
            Value::Currency { value, code } => Some(EntityValue::Currency { code: code.clone(), value: *value }),
            Value::Time(t) => Some(EntityValue::Time { hour: t.hour, minute: t.minute, second: t.second }),
            Value::Location(LocationValue::Absolute { lat, lon, display }) => {
                Some(EntityValue::Location { lat: *lat, lon: *lon, display: display.clone() })
            }
            Value::Location(LocationValue::Relative(name)) => {
                Some(EntityValue::Location { lat: f64::NAN, lon: f64::NAN, display: Some(name.clone()) })
            }
            Value::Entity { value, display, entity_type } => Some(EntityValue::Generic {
                value: value.clone(),
                display: display.clone(),
                entity_type: entity_type.clone(),
            }),
            Value::Date(DateLiteral::Absolute(d)) => Some(EntityValue::Date(EntityDateValue::Fields {
                year: d.year,
                month: d.month,
                day: d.day,
                hour: d.time.as_ref().map(|t| t.hour),
                minute: d.time.as_ref().map(|t| t.minute),
                second: d.time.as_ref().map(|t| t.second),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integer_boundaries() {
        assert!(Value::is_small_integer(0.0));
        assert!(Value::is_small_integer(12.0));
        assert!(!Value::is_small_integer(13.0));
        assert!(!Value::is_small_integer(-1.0));
        assert!(!Value::is_small_integer(1.5));
    }

    #[test]
    fn relative_location_projects_to_unresolved_nan_entity() {
        let loc = Value::Location(LocationValue::Relative("home".into()));
        match loc.project_to_entity() {
            Some(EntityValue::Location { lat, lon, display }) => {
                assert!(lat.is_nan() && lon.is_nan());
                assert_eq!(display.as_deref(), Some("home"));
            }
            _ => panic!("expected a location entity"),
        }
    }
}
