//! `value_to_nn` -- the largest visitor (spec §4.5), covering every `Value`
//! variant with its own emission rule.

use tt_ast::value::{AbsoluteDate, DateLiteral, EventValue, LocationValue, RecurrentTimeRule, TimeOfDay};
use tt_ast::{Scope, Value};
use tt_common::list::List;
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;
use tt_entities::EntityValue;

use crate::context::{is_known_measure_unit, kw, literal_token, name_and_type_token, NnContext};
use crate::filter::cnf_filter_to_nn;

/// Serialize one AST value (spec §4.5 `value_to_nn`).
pub fn value_to_nn(value: &Value, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match value {
        Value::Boolean(b) => Ok(List::singleton(kw(if *b { "true" } else { "false" }))),

        Value::String(s) if s.is_empty() => {
            Ok(List::singleton(literal_token(TerminalKind::QuotedString, "\"\"")))
        }
        Value::String(s) => ctx.emit_entity("QUOTED_STRING", &EntityValue::String(s.clone()), None),

        Value::Number(n) => number_to_nn(*n, ctx),

        Value::Measure { value, unit } => measure_to_nn(*value, unit, ctx),

        Value::Currency { value, code } => currency_to_nn(*value, code, ctx),

        Value::Location(loc) => location_to_nn(loc, ctx),

        Value::Date(date) => date_to_nn(date, ctx),

        Value::Time(t) => ctx.emit_entity("TIME", &EntityValue::Time { hour: t.hour, minute: t.minute, second: t.second }, None),

        Value::Enum(name) => Ok(List::singleton(literal_token(TerminalKind::Enum, format!("enum:{name}")))),

        Value::Entity { value: v, display, entity_type } => {
            let kind = format!("GENERIC_ENTITY_{entity_type}");
            let entity = EntityValue::Generic { value: v.clone(), display: display.clone(), entity_type: entity_type.clone() };
            ctx.emit_entity(&kind, &entity, None)
        }

        Value::VarRef { name } => {
            let ty = if ctx.opts.type_annotations { scope.lookup(name).map(|t| t.to_string()) } else { None };
            Ok(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), ty)))
        }

        Value::ContextRef { name, ty } => {
            Ok(List::singleton(name_and_type_token(TerminalKind::ContextRef, name.clone(), Some(ty.to_string()))))
        }

        Value::Event(e) => Ok(List::singleton(kw(match e {
            EventValue::Generic => "$event",
            EventValue::Type => "$event.type",
            EventValue::Program => "$event.program",
        }))),

        Value::Array(items) => {
            let mut parts = vec![List::singleton(kw("["))];
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    parts.push(List::singleton(kw(",")));
                }
                parts.push(value_to_nn(item, scope, ctx)?);
            }
            parts.push(List::singleton(kw("]")));
            Ok(List::concat(parts))
        }

        Value::Object(fields) => {
            let mut parts = vec![List::singleton(kw("{"))];
            for (i, (name, v)) in fields.iter().enumerate() {
                if i > 0 {
                    parts.push(List::singleton(kw(",")));
                }
                parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), None)));
                parts.push(List::singleton(kw("=")));
                parts.push(value_to_nn(v, scope, ctx)?);
            }
            parts.push(List::singleton(kw("}")));
            Ok(List::concat(parts))
        }

        Value::Filter { value: inner, filter } => {
            let cnf = tt_filter::normalize(filter)?;
            Ok(List::concat([
                value_to_nn(inner, scope, ctx)?,
                List::singleton(kw("filter")),
                List::singleton(kw("{")),
                cnf_filter_to_nn(&cnf, scope, ctx)?,
                List::singleton(kw("}")),
            ]))
        }

        Value::Undefined { .. } => ctx.emit_entity("SLOT", &EntityValue::Undefined, None),

        Value::RecurrentTimeSpecification(rules) => recurrent_time_spec_to_nn(rules, ctx),

        Value::Slot { name } => Ok(List::singleton(kw(name.clone().unwrap_or_else(|| "SLOT_*".to_string())))),
    }
}

/// `isSmallInteger`-gated number emission: 0..=12 become an inline literal;
/// other negative numbers try both the positive-and-prefixed `- N` form and
/// a direct negative bag lookup, preferring the positive form (spec §4.5);
/// everything else goes straight through the `NUMBER` bag.
fn number_to_nn(n: f64, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    if Value::is_small_integer(n) {
        return Ok(List::singleton(literal_token(TerminalKind::LiteralInteger, format!("{}", n as i64))));
    }
    if n < 0.0 {
        if Value::is_small_integer(-n) {
            return Ok(List::concat([
                List::singleton(kw("-")),
                List::singleton(literal_token(TerminalKind::LiteralInteger, format!("{}", (-n) as i64))),
            ]));
        }
        // prefer the positive-and-prefixed form over a direct negative lookup
        // (spec §4.5): a bag holding the positive magnitude should still be
        // reused rather than forcing a fresh negative entity.
        if let Some(list) = ctx.try_entity("NUMBER", &EntityValue::Number(-n), None)? {
            return Ok(List::concat([List::singleton(kw("-")), list]));
        }
    }
    ctx.emit_entity("NUMBER", &EntityValue::Number(n), None)
}

/// Measures try `DURATION` when the base unit is `ms`, else
/// `MEASURE_<baseunit>`; on failure (an unrecognized base unit) fall back to
/// `<NUMBER> unit:<unit>`.
fn measure_to_nn(value: f64, unit: &str, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    if is_known_measure_unit(unit) {
        let kind = if unit == "ms" { "DURATION".to_string() } else { format!("MEASURE_{unit}") };
        let entity = EntityValue::Measure { unit: unit.to_string(), value };
        if let Some(list) = ctx.try_entity(&kind, &entity, None)? {
            return Ok(list);
        }
    }
    Ok(List::concat([
        number_to_nn(value, ctx)?,
        List::singleton(literal_token(TerminalKind::Unit, format!("unit:{unit}"))),
    ]))
}

/// Currencies try `CURRENCY`, else `<NUMBER> unit:$<code>`.
fn currency_to_nn(value: f64, code: &str, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let entity = EntityValue::Currency { code: code.to_string(), value };
    if let Some(list) = ctx.try_entity("CURRENCY", &entity, None)? {
        return Ok(list);
    }
    Ok(List::concat([
        number_to_nn(value, ctx)?,
        List::singleton(literal_token(TerminalKind::CurrencyCode, format!("unit:${code}"))),
    ]))
}

fn location_to_nn(loc: &LocationValue, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let entity = match loc {
        LocationValue::Absolute { lat, lon, display } => {
            EntityValue::Location { lat: *lat, lon: *lon, display: display.clone() }
        }
        LocationValue::Relative(name) => {
            EntityValue::Location { lat: f64::NAN, lon: f64::NAN, display: Some(name.clone()) }
        }
    };
    ctx.emit_entity("LOCATION", &entity, None)
}

/// Dates have five sub-cases (spec §4.5): `null` means "now"; `DateEdge`
/// emits `<edge> unit:<unit>`; `DatePiece`/`WeekDayDate` build a `new Date (
/// ... )` constructor from their partial fields; a concrete `Date` first
/// tries the `DATE` bag, then an ISO-8601 quoted string, else the
/// constructor form with a literal year/month/day.
fn date_to_nn(date: &DateLiteral, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match date {
        DateLiteral::Now => Ok(List::singleton(kw("now"))),
        DateLiteral::Edge { edge, unit } => {
            Ok(List::concat([List::singleton(kw(edge)), List::singleton(literal_token(TerminalKind::Unit, format!("unit:{unit}")))]))
        }
        DateLiteral::Piece { year, month, day, time } => {
            date_constructor(year.map(|y| y as i64), month.map(|m| m as i64), day.map(|d| d as i64), time.as_ref())
        }
        DateLiteral::WeekDay { day, time } => Ok(List::concat([
            List::singleton(kw(day)),
            time.as_ref().map(time_fields).unwrap_or_else(List::nil),
        ])),
        DateLiteral::Absolute(d) => absolute_date_to_nn(d, ctx),
    }
}

fn time_fields(t: &TimeOfDay) -> List {
    List::concat([
        List::singleton(literal_token(TerminalKind::LiteralInteger, format!("{}", t.hour))),
        List::singleton(kw(":")),
        List::singleton(literal_token(TerminalKind::LiteralInteger, format!("{}", t.minute))),
    ])
}

fn date_constructor(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    time: Option<&TimeOfDay>,
) -> Result<List, ThingTalkError> {
    let mut parts = vec![List::singleton(kw("new")), List::singleton(kw("Date")), List::singleton(kw("("))];
    let fields = [year.map(|v| v.to_string()), month.map(|v| v.to_string()), day.map(|v| v.to_string())];
    let mut first = true;
    for field in fields.into_iter().flatten() {
        if !first {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(List::singleton(literal_token(TerminalKind::LiteralInteger, field)));
        first = false;
    }
    if let Some(t) = time {
        if !first {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(time_fields(t));
    }
    parts.push(List::singleton(kw(")")));
    Ok(List::concat(parts))
}

/// `year` is written literally when in `[1950, 2050)`; a concrete date
/// outside that range is written as a two-digit year where representable
/// (spec §4.5).
fn absolute_date_to_nn(d: &AbsoluteDate, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let entity = EntityValue::Date(tt_entities::value::DateValue::Fields {
        year: d.year,
        month: d.month,
        day: d.day,
        hour: d.time.as_ref().map(|t| t.hour),
        minute: d.time.as_ref().map(|t| t.minute),
        second: d.time.as_ref().map(|t| t.second),
    });
    if let Some(list) = ctx.try_entity("DATE", &entity, None)? {
        return Ok(list);
    }
    let year_literal = if (1950..2050).contains(&d.year) {
        d.year.to_string()
    } else {
        format!("{:02}", d.year.rem_euclid(100))
    };
    let mut parts = vec![
        List::singleton(kw("new")),
        List::singleton(kw("Date")),
        List::singleton(kw("(")),
        List::singleton(literal_token(TerminalKind::LiteralInteger, year_literal)),
        List::singleton(kw(",")),
        List::singleton(literal_token(TerminalKind::LiteralInteger, d.month.to_string())),
        List::singleton(kw(",")),
        List::singleton(literal_token(TerminalKind::LiteralInteger, d.day.to_string())),
    ];
    if let Some(t) = &d.time {
        parts.push(List::singleton(kw(",")));
        parts.push(time_fields(t));
    }
    parts.push(List::singleton(kw(")")));
    Ok(List::concat(parts))
}

/// Each rule expands into a brace-delimited field list; multiple rules are
/// comma-joined (spec §4.5).
fn recurrent_time_spec_to_nn(rules: &[RecurrentTimeRule], ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut parts = Vec::new();
    for (i, rule) in rules.iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(recurrent_time_rule_to_nn(rule, ctx)?);
    }
    Ok(List::concat(parts))
}

fn recurrent_time_rule_to_nn(rule: &RecurrentTimeRule, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut fields: Vec<List> = vec![
        List::concat([
            List::singleton(kw("beginTime")),
            List::singleton(kw("=")),
            time_fields(&rule.begin_time),
        ]),
        List::concat([List::singleton(kw("endTime")), List::singleton(kw("=")), time_fields(&rule.end_time)]),
    ];
    if let Some((n, unit)) = &rule.interval {
        fields.push(List::concat([
            List::singleton(kw("interval")),
            List::singleton(kw("=")),
            measure_to_nn(*n, unit, ctx)?,
        ]));
    }
    if let Some(freq) = rule.frequency {
        fields.push(List::concat([
            List::singleton(kw("frequency")),
            List::singleton(kw("=")),
            List::singleton(literal_token(TerminalKind::LiteralInteger, freq.to_string())),
        ]));
    }
    if !rule.day_of_week.is_empty() {
        let mut days = vec![List::singleton(kw("["))];
        for (i, day) in rule.day_of_week.iter().enumerate() {
            if i > 0 {
                days.push(List::singleton(kw(",")));
            }
            days.push(List::singleton(kw(day)));
        }
        days.push(List::singleton(kw("]")));
        fields.push(List::concat([
            List::singleton(kw("dayOfWeek")),
            List::singleton(kw("=")),
            List::concat(days),
        ]));
    }
    if let Some(begin) = &rule.begin_date {
        fields.push(List::concat([List::singleton(kw("beginDate")), List::singleton(kw("=")), date_to_nn(begin, ctx)?]));
    }
    if let Some(end) = &rule.end_date {
        fields.push(List::concat([List::singleton(kw("endDate")), List::singleton(kw("=")), date_to_nn(end, ctx)?]));
    }
    if rule.subtract {
        fields.push(List::concat([List::singleton(kw("subtract")), List::singleton(kw("=")), List::singleton(kw("true"))]));
    }
    let mut parts = vec![List::singleton(kw("{"))];
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(field);
    }
    parts.push(List::singleton(kw("}")));
    Ok(List::concat(parts))
}
