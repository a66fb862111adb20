//! Entity values -- the literal payloads substituted by placeholders during
//! NN serialization (`NUMBER_3`, `QUOTED_STRING_0`, ...).
//!
//! Every variant here is a *projection* of some richer AST value onto the
//! narrow shape the entity bag actually stores and compares. Projection
//! itself (`EntityValue::from` an AST node) lives in `tt-ast`, which is the
//! only crate that knows about AST value types; this crate only knows about
//! the projected shape.

use serde::{Deserialize, Serialize};

/// A date, either as a concrete point in time or as calendar fields that have
/// not yet been resolved to an absolute instant (e.g. `DatePiece`, a date with
/// only a day-of-month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateValue {
    /// Calendar fields, with time-of-day components optional.
    Fields {
        year: i32,
        month: u8,
        day: u8,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
    },
    /// An absolute instant, UTC milliseconds since the epoch.
    Epoch(i64),
}

impl DateValue {
    /// Compare dates by UTC epoch millis, per spec §4.2. `Fields` values are
    /// converted using a proleptic Gregorian day count; missing time
    /// components default to midnight.
    pub fn to_epoch_millis(&self) -> i64 {
        match self {
            DateValue::Epoch(ms) => *ms,
            DateValue::Fields { year, month, day, hour, minute, second } => {
                let days = days_since_epoch(*year, *month, *day);
                let h = hour.unwrap_or(0) as i64;
                let m = minute.unwrap_or(0) as i64;
                let s = second.unwrap_or(0) as i64;
                days * 86_400_000 + h * 3_600_000 + m * 60_000 + s * 1_000
            }
        }
    }
}

/// Days between the Unix epoch (1970-01-01) and the given proleptic
/// Gregorian date. Adapted from the standard Howard Hinnant `days_from_civil`
/// algorithm; valid for the date ranges ThingTalk dialogue states use.
fn days_since_epoch(year: i32, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year as i64 - 1 } else { year as i64 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64; // [0, 399]
    let mp = (month as i64 + 9) % 12; // [0, 11], Mar=0 .. Feb=11
    let doy = (153 * mp + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - 719_468
}

/// A projected entity value: the narrow shape the entity bag stores, compared
/// by `entities_equal`, and rendered by `display_string`. See spec §3/§4.2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityValue {
    Measure { unit: String, value: f64 },
    Location { lat: f64, lon: f64, display: Option<String> },
    Time { hour: u8, minute: u8, second: u8 },
    Date(DateValue),
    Currency { code: String, value: f64 },
    Generic { value: Option<String>, display: Option<String>, entity_type: String },
    String(String),
    Number(f64),
    Undefined,
}

/// The uppercase kind prefix of a placeholder name, e.g. `NUMBER`,
/// `QUOTED_STRING`, or `GENERIC_ENTITY_tt:device`.
pub type PlaceholderKind = String;

impl EntityValue {
    /// `entities_equal` -- kind-specific equality per spec §4.2.
    ///
    /// Two values of different shape are never equal, even if one could in
    /// principle be coerced into the other's kind; callers are expected to
    /// only compare values already filtered to the same placeholder kind.
    pub fn entities_equal(&self, other: &EntityValue) -> bool {
        match (self, other) {
            (EntityValue::Measure { unit: u1, value: v1 }, EntityValue::Measure { unit: u2, value: v2 }) => {
                u1 == u2 && v1 == v2
            }
            (EntityValue::Currency { code: c1, value: v1 }, EntityValue::Currency { code: c2, value: v2 }) => {
                c1 == c2 && v1 == v2
            }
            (EntityValue::Time { hour: h1, minute: m1, second: s1 }, EntityValue::Time { hour: h2, minute: m2, second: s2 }) => {
                h1 == h2 && m1 == m2 && s1 == s2
            }
            (EntityValue::Date(a), EntityValue::Date(b)) => a.to_epoch_millis() == b.to_epoch_millis(),
            (EntityValue::Location { lat: lat1, lon: lon1, display: d1 }, EntityValue::Location { lat: lat2, lon: lon2, display: d2 }) => {
                let unresolved = lat1.is_nan() && lat2.is_nan() && lon1.is_nan() && lon2.is_nan();
                if unresolved {
                    d1 == d2
                } else {
                    (lat1 - lat2).abs() < 0.01 && (lon1 - lon2).abs() < 0.01
                }
            }
            (
                EntityValue::Generic { value: v1, display: d1, entity_type: t1 },
                EntityValue::Generic { value: v2, display: d2, entity_type: t2 },
            ) => {
                if t1 != t2 {
                    return false;
                }
                match (v1, v2) {
                    (Some(a), Some(b)) => a == b,
                    (None, None) => d1 == d2,
                    _ => v1.as_deref().unwrap_or("") == v2.as_deref().unwrap_or("") && d1 == d2,
                }
            }
            (EntityValue::String(a), EntityValue::String(b)) => a == b,
            (EntityValue::Number(a), EntityValue::Number(b)) => a == b,
            (EntityValue::Undefined, EntityValue::Undefined) => true,
            _ => false,
        }
    }

    /// `display_string` -- the human-readable projection used for
    /// sentence-match lookup and for quoted-string wire forms.
    pub fn display_string(&self) -> String {
        match self {
            EntityValue::Measure { unit, value } => format!("{value} {unit}"),
            EntityValue::Currency { code, value } => format!("{value} {code}"),
            EntityValue::Time { hour, minute, second } => {
                if *second == 0 {
                    format!("{hour:02}:{minute:02}")
                } else {
                    format!("{hour:02}:{minute:02}:{second:02}")
                }
            }
            EntityValue::Date(_) => String::new(),
            EntityValue::Location { display, .. } => display.clone().unwrap_or_default(),
            EntityValue::Generic { display, value, .. } => {
                display.clone().or_else(|| value.clone()).unwrap_or_default()
            }
            EntityValue::String(s) => s.clone(),
            EntityValue::Number(n) => n.to_string(),
            EntityValue::Undefined => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_equality_requires_same_unit_and_value() {
        let a = EntityValue::Measure { unit: "kg".into(), value: 1.5 };
        let b = EntityValue::Measure { unit: "kg".into(), value: 1.5 };
        let c = EntityValue::Measure { unit: "lb".into(), value: 1.5 };
        assert!(a.entities_equal(&b));
        assert!(!a.entities_equal(&c));
    }

    #[test]
    fn unresolved_locations_never_match_resolved_coordinates() {
        let unresolved = EntityValue::Location { lat: f64::NAN, lon: f64::NAN, display: Some("here".into()) };
        let resolved = EntityValue::Location { lat: 0.0, lon: 0.0, display: None };
        assert!(!unresolved.entities_equal(&resolved));
    }

    #[test]
    fn unresolved_locations_match_on_display() {
        let a = EntityValue::Location { lat: f64::NAN, lon: f64::NAN, display: Some("work".into()) };
        let b = EntityValue::Location { lat: f64::NAN, lon: f64::NAN, display: Some("work".into()) };
        assert!(a.entities_equal(&b));
    }

    #[test]
    fn locations_within_epsilon_are_equal() {
        let a = EntityValue::Location { lat: 1.0, lon: 1.0, display: None };
        let b = EntityValue::Location { lat: 1.005, lon: 1.005, display: None };
        assert!(a.entities_equal(&b));
    }

    #[test]
    fn dates_compare_by_epoch_millis() {
        let a = DateValue::Fields { year: 1970, month: 1, day: 1, hour: None, minute: None, second: None };
        let b = DateValue::Epoch(0);
        assert_eq!(a.to_epoch_millis(), b.to_epoch_millis());
    }
}
