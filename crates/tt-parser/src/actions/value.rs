//! `Value` parsing -- the inverse of `tt_nn::value::value_to_nn` (spec
//! §4.5/§6.3), one case per wire shape rather than one case per AST variant,
//! since several variants share a shape and are disambiguated only by which
//! closed terminal kind carries them.

use tt_ast::types::ThingTalkType;
use tt_ast::{AbsoluteDate, DateLiteral, EventValue, LocationValue, RecurrentTimeRule, TimeOfDay, Value};
use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;
use tt_entities::value::DateValue;
use tt_entities::EntityValue;

use crate::driver::Parser;

const WEEKDAYS: &[&str] = &["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

/// A value, plus the `filter { <cnf> }` suffix any value can carry (spec
/// §4.5 `Value::Filter`).
pub fn parse_value(p: &mut Parser) -> Result<Value, ThingTalkError> {
    let value = parse_value_inner(p)?;
    if p.at_kw("filter") {
        p.bump();
        p.eat_kw("{")?;
        let filter = crate::actions::filter::parse_cnf(p)?;
        p.eat_kw("}")?;
        return Ok(Value::Filter { value: Box::new(value), filter: Box::new(filter) });
    }
    Ok(value)
}

fn parse_value_inner(p: &mut Parser) -> Result<Value, ThingTalkError> {
    if p.at_kw("true") {
        p.bump();
        return Ok(Value::Boolean(true));
    }
    if p.at_kw("false") {
        p.bump();
        return Ok(Value::Boolean(false));
    }
    if p.at_kw("$event") {
        p.bump();
        return Ok(Value::Event(EventValue::Generic));
    }
    if p.at_kw("$event.type") {
        p.bump();
        return Ok(Value::Event(EventValue::Type));
    }
    if p.at_kw("$event.program") {
        p.bump();
        return Ok(Value::Event(EventValue::Program));
    }
    if p.at_kw("[") {
        return parse_array(p);
    }
    if p.at_kw("{") {
        if matches!(p.peek_n(1).map(|t| &t.terminal), Some(TerminalKind::Param)) {
            return parse_object(p);
        }
        return parse_recurrent_time_spec(p);
    }
    if p.at_kw("location:") {
        p.bump();
        let text = p.parse_quoted_text()?;
        return Ok(Value::Location(LocationValue::Relative(text)));
    }
    if p.at_kw("\"") {
        let text = p.parse_quoted_text()?;
        if let Some(tag) = p.try_read_entity_type_tag() {
            return Ok(Value::Entity { value: None, display: Some(text), entity_type: tag });
        }
        return Ok(Value::String(text));
    }

    if looks_like_number_start(p) {
        let n = parse_number_magnitude(p)?;
        if matches!(p.peek_terminal(), Some(TerminalKind::Unit)) {
            let unit = p.read_unit_literal()?;
            return Ok(Value::Measure { value: n, unit });
        }
        if matches!(p.peek_terminal(), Some(TerminalKind::CurrencyCode)) {
            let code = p.read_currency_code_literal()?;
            return Ok(Value::Currency { value: n, code });
        }
        return Ok(Value::Number(n));
    }

    if p.at_kw("new") {
        return Ok(Value::Date(parse_date_constructor(p)?));
    }
    if p.at_kw("now") {
        p.bump();
        return Ok(Value::Date(DateLiteral::Now));
    }
    if is_weekday_name(p) {
        let day = p.bump().unwrap().to_surface_string();
        let time = if at_time_fields_start(p) { Some(parse_hour_minute(p)?) } else { None };
        return Ok(Value::Date(DateLiteral::WeekDay { day, time }));
    }
    if is_date_edge_keyword(p) {
        let edge = p.bump().unwrap().to_surface_string();
        let unit = p.read_unit_literal()?;
        return Ok(Value::Date(DateLiteral::Edge { edge, unit }));
    }

    match p.peek_terminal() {
        Some(TerminalKind::Date) => {
            let ev = p.read_placeholder_value()?;
            date_entity_to_value(ev)
        }
        Some(TerminalKind::LiteralTime) | Some(TerminalKind::Time) => {
            let ev = p.read_placeholder_value()?;
            match ev {
                EntityValue::Time { hour, minute, second } => Ok(Value::Time(TimeOfDay { hour, minute, second })),
                other => Err(ThingTalkError::type_error(format!("expected a Time entity value, got {other:?}"))),
            }
        }
        Some(TerminalKind::Location) => {
            let ev = p.read_placeholder_value()?;
            match ev {
                EntityValue::Location { lat, lon, display } if lat.is_nan() || lon.is_nan() => {
                    Ok(Value::Location(LocationValue::Relative(display.unwrap_or_default())))
                }
                EntityValue::Location { lat, lon, display } => {
                    Ok(Value::Location(LocationValue::Absolute { lat, lon, display }))
                }
                other => Err(ThingTalkError::type_error(format!("expected a Location entity value, got {other:?}"))),
            }
        }
        Some(TerminalKind::Measure) | Some(TerminalKind::MeasureUnit(_)) | Some(TerminalKind::Duration) => {
            let ev = p.read_placeholder_value()?;
            match ev {
                EntityValue::Measure { value, unit } => Ok(Value::Measure { value, unit }),
                other => Err(ThingTalkError::type_error(format!("expected a Measure entity value, got {other:?}"))),
            }
        }
        Some(TerminalKind::Currency) => {
            let ev = p.read_placeholder_value()?;
            match ev {
                EntityValue::Currency { value, code } => Ok(Value::Currency { value, code }),
                other => Err(ThingTalkError::type_error(format!("expected a Currency entity value, got {other:?}"))),
            }
        }
        Some(TerminalKind::QuotedString) => {
            if matches!(p.peek(), Some(Token { payload: TerminalPayload::Literal(s), .. }) if s == "\"\"") {
                p.bump();
                return Ok(Value::String(String::new()));
            }
            let ev = p.read_placeholder_value()?;
            match ev {
                EntityValue::String(s) => Ok(Value::String(s)),
                other => Err(ThingTalkError::type_error(format!("expected a String entity value, got {other:?}"))),
            }
        }
        Some(TerminalKind::Slot) => {
            p.read_placeholder_value()?;
            Ok(Value::Undefined { local: false })
        }
        Some(TerminalKind::GenericEntity) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:entity"))
        }
        Some(TerminalKind::Hashtag) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:hashtag"))
        }
        Some(TerminalKind::Username) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:username"))
        }
        Some(TerminalKind::Picture) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:picture"))
        }
        Some(TerminalKind::Url) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:url"))
        }
        Some(TerminalKind::PhoneNumber) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:phone_number"))
        }
        Some(TerminalKind::EmailAddress) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:email_address"))
        }
        Some(TerminalKind::PathName) => {
            let ev = p.read_placeholder_value()?;
            Ok(generic_entity_to_value(ev, "tt:path_name"))
        }
        Some(TerminalKind::Enum) => Ok(Value::Enum(p.read_enum_name()?)),
        Some(TerminalKind::Param) => {
            let (name, _ty) = p.read_param_name_and_type()?;
            Ok(Value::VarRef { name })
        }
        Some(TerminalKind::ContextRef) => {
            let (name, ty) = p.read_context_ref()?;
            Ok(Value::ContextRef { name, ty: parse_thingtalk_type(&ty) })
        }
        _ => Err(p.unexpected("a value")),
    }
}

fn looks_like_number_start(p: &Parser) -> bool {
    p.at_kw("-")
        || p.at_kw("0")
        || p.at_kw("1")
        || matches!(p.peek_terminal(), Some(TerminalKind::LiteralInteger) | Some(TerminalKind::Number))
}

fn parse_number_magnitude(p: &mut Parser) -> Result<f64, ThingTalkError> {
    if p.at_kw("-") {
        p.bump();
        // the magnitude after `-` is either a plain integer literal (a
        // negative small integer) or a `NUMBER` placeholder carrying the
        // positive magnitude (spec §4.5: negative numbers prefer the
        // positive-and-prefixed form over a direct negative bag entry).
        if let Some(n) = p.try_parse_plain_integer_literal() {
            return Ok(-(n as f64));
        }
        return match p.read_placeholder_value()? {
            EntityValue::Number(n) => Ok(-n),
            other => Err(ThingTalkError::type_error(format!("expected a Number entity value, got {other:?}"))),
        };
    }
    if let Some(n) = p.try_parse_plain_integer_literal() {
        return Ok(n as f64);
    }
    if matches!(p.peek_terminal(), Some(TerminalKind::Number)) {
        let ev = p.read_placeholder_value()?;
        return match ev {
            EntityValue::Number(n) => Ok(n),
            other => Err(ThingTalkError::type_error(format!("expected a Number entity value, got {other:?}"))),
        };
    }
    Err(p.unexpected("a number"))
}

fn is_weekday_name(p: &Parser) -> bool {
    matches!(p.peek_terminal(), Some(TerminalKind::Keyword(k)) if WEEKDAYS.contains(&k.as_str()))
}

fn is_date_edge_keyword(p: &Parser) -> bool {
    match p.peek_terminal() {
        Some(TerminalKind::Keyword(k)) => {
            (k == "start_of" || k == "end_of") && matches!(p.peek_n(1).map(|t| &t.terminal), Some(TerminalKind::Unit))
        }
        _ => false,
    }
}

fn at_time_fields_start(p: &Parser) -> bool {
    p.at_kw("0") || p.at_kw("1") || matches!(p.peek_terminal(), Some(TerminalKind::LiteralInteger))
}

/// `<hour> : <minute>` (spec §4.5 `time_fields`, second always 0 on this
/// path -- only the `new Date(...)` constructor and weekday forms carry a
/// bare hour:minute pair; a full h:m:s always goes through the `TIME`/
/// `LiteralTime` placeholder instead).
fn parse_hour_minute(p: &mut Parser) -> Result<TimeOfDay, ThingTalkError> {
    let hour = p.parse_plain_integer_literal()?;
    p.eat_kw(":")?;
    let minute = p.parse_plain_integer_literal()?;
    Ok(TimeOfDay { hour: hour as u8, minute: minute as u8, second: 0 })
}

/// `new Date ( <int> [, <int>]* [, <hour>:<minute>] )`. Field count decides
/// the shape: three integers is a fully resolved `Absolute` date (wire-
/// identical to a `Piece` with every field set); one or two is a partial
/// `Piece` reconstructed as day-only / month-and-day (see `DESIGN.md` for why
/// this convention was picked over the alternative reading).
fn parse_date_constructor(p: &mut Parser) -> Result<DateLiteral, ThingTalkError> {
    p.eat_kw("new")?;
    p.eat_kw("Date")?;
    p.eat_kw("(")?;
    let mut ints: Vec<i64> = Vec::new();
    let mut time: Option<TimeOfDay> = None;
    if !p.at_kw(")") {
        loop {
            if let Some(h) = p.try_parse_plain_integer_literal() {
                if p.at_kw(":") {
                    p.bump();
                    let m = p.parse_plain_integer_literal()?;
                    time = Some(TimeOfDay { hour: h as u8, minute: m as u8, second: 0 });
                } else {
                    ints.push(h);
                }
            } else {
                return Err(p.unexpected("an integer or time field inside Date(...)"));
            }
            if p.at_kw(",") {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.eat_kw(")")?;
    match ints.len() {
        0 => Ok(DateLiteral::Piece { year: None, month: None, day: None, time }),
        1 => Ok(DateLiteral::Piece { year: None, month: None, day: Some(ints[0] as u8), time }),
        2 => Ok(DateLiteral::Piece { year: None, month: Some(ints[0] as u8), day: Some(ints[1] as u8), time }),
        3 => Ok(DateLiteral::Absolute(AbsoluteDate { year: ints[0] as i32, month: ints[1] as u8, day: ints[2] as u8, time })),
        _ => Err(ThingTalkError::syntax("too many integer fields in Date(...) constructor".to_string(), None)),
    }
}

fn date_entity_to_value(ev: EntityValue) -> Result<Value, ThingTalkError> {
    let dv = match ev {
        EntityValue::Date(dv) => dv,
        other => return Err(ThingTalkError::type_error(format!("expected a Date entity value, got {other:?}"))),
    };
    let (year, month, day, time) = match dv {
        DateValue::Fields { year, month, day, hour, minute, second } => {
            let time = hour.map(|h| TimeOfDay { hour: h, minute: minute.unwrap_or(0), second: second.unwrap_or(0) });
            (year, month, day, time)
        }
        DateValue::Epoch(ms) => {
            let (y, mo, d, h, mi, s) = tt_entities::iso8601::fields_from_epoch_millis(ms);
            (y, mo, d, Some(TimeOfDay { hour: h, minute: mi, second: s }))
        }
    };
    Ok(Value::Date(DateLiteral::Absolute(AbsoluteDate { year, month, day, time })))
}

/// `HASHTAG`/`USERNAME`/`PICTURE`/`URL`/... placeholders all carry a generic
/// entity value today; `fallback_entity_type` recovers a sensible
/// `entity_type` when the resolver only handed back a bare string.
fn generic_entity_to_value(ev: EntityValue, fallback_entity_type: &str) -> Value {
    match ev {
        EntityValue::Generic { value, display, entity_type } => Value::Entity { value, display, entity_type },
        EntityValue::String(s) => Value::Entity { value: None, display: Some(s), entity_type: fallback_entity_type.to_string() },
        _ => Value::Entity { value: None, display: None, entity_type: fallback_entity_type.to_string() },
    }
}

fn parse_array(p: &mut Parser) -> Result<Value, ThingTalkError> {
    p.eat_kw("[")?;
    let mut items = Vec::new();
    if !p.at_kw("]") {
        loop {
            items.push(parse_value(p)?);
            if p.at_kw(",") {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.eat_kw("]")?;
    Ok(Value::Array(items))
}

fn parse_object(p: &mut Parser) -> Result<Value, ThingTalkError> {
    p.eat_kw("{")?;
    let mut fields = Vec::new();
    if !p.at_kw("}") {
        loop {
            let (name, _ty) = p.read_param_name_and_type()?;
            p.eat_kw("=")?;
            let value = parse_value(p)?;
            fields.push((name, value));
            if p.at_kw(",") {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.eat_kw("}")?;
    Ok(Value::Object(fields))
}

fn parse_recurrent_time_spec(p: &mut Parser) -> Result<Value, ThingTalkError> {
    let mut rules = vec![parse_recurrent_time_rule(p)?];
    loop {
        if !p.at_kw(",") {
            break;
        }
        let checkpoint = p.pos();
        p.bump();
        if p.at_kw("{") {
            rules.push(parse_recurrent_time_rule(p)?);
        } else {
            p.set_pos(checkpoint);
            break;
        }
    }
    Ok(Value::RecurrentTimeSpecification(rules))
}

fn parse_recurrent_time_rule(p: &mut Parser) -> Result<RecurrentTimeRule, ThingTalkError> {
    p.eat_kw("{")?;
    p.eat_kw("beginTime")?;
    p.eat_kw("=")?;
    let begin_time = parse_hour_minute(p)?;
    p.eat_kw(",")?;
    p.eat_kw("endTime")?;
    p.eat_kw("=")?;
    let end_time = parse_hour_minute(p)?;

    let mut interval = None;
    let mut frequency = None;
    let mut day_of_week = Vec::new();
    let mut begin_date = None;
    let mut end_date = None;
    let mut subtract = false;

    while p.at_kw(",") {
        p.bump();
        if p.at_kw("interval") {
            p.bump();
            p.eat_kw("=")?;
            match parse_value(p)? {
                Value::Measure { value, unit } => interval = Some((value, unit)),
                other => return Err(ThingTalkError::type_error(format!("expected a measure for `interval`, got {other:?}"))),
            }
        } else if p.at_kw("frequency") {
            p.bump();
            p.eat_kw("=")?;
            frequency = Some(p.parse_plain_integer_literal()?);
        } else if p.at_kw("dayOfWeek") {
            p.bump();
            p.eat_kw("=")?;
            p.eat_kw("[")?;
            if !p.at_kw("]") {
                loop {
                    let day = p.peek().map(|t| t.to_surface_string()).ok_or_else(|| p.unexpected("a weekday name"))?;
                    p.bump();
                    day_of_week.push(day);
                    if p.at_kw(",") {
                        p.bump();
                        continue;
                    }
                    break;
                }
            }
            p.eat_kw("]")?;
        } else if p.at_kw("beginDate") {
            p.bump();
            p.eat_kw("=")?;
            begin_date = Some(parse_date_literal_value(p)?);
        } else if p.at_kw("endDate") {
            p.bump();
            p.eat_kw("=")?;
            end_date = Some(parse_date_literal_value(p)?);
        } else if p.at_kw("subtract") {
            p.bump();
            p.eat_kw("=")?;
            p.eat_kw("true")?;
            subtract = true;
        } else {
            return Err(p.unexpected("a recurrent time rule field (interval, frequency, dayOfWeek, beginDate, endDate, subtract)"));
        }
    }
    p.eat_kw("}")?;
    Ok(RecurrentTimeRule { begin_time, end_time, interval, frequency, day_of_week, begin_date, end_date, subtract })
}

/// `beginDate`/`endDate` carry a bare `DateLiteral`, not a full `Value`.
fn parse_date_literal_value(p: &mut Parser) -> Result<DateLiteral, ThingTalkError> {
    match parse_value(p)? {
        Value::Date(d) => Ok(d),
        other => Err(ThingTalkError::type_error(format!("expected a date, got {other:?}"))),
    }
}

fn parse_thingtalk_type(s: &str) -> ThingTalkType {
    match s {
        "String" => ThingTalkType::String,
        "Number" => ThingTalkType::Number,
        "Boolean" => ThingTalkType::Boolean,
        "Date" => ThingTalkType::Date,
        "Time" => ThingTalkType::Time,
        "Currency" => ThingTalkType::Currency,
        "Location" => ThingTalkType::Location,
        "RecurrentTimeSpecification" => ThingTalkType::RecurrentTimeSpecification,
        "Any" => ThingTalkType::Any,
        s if s.starts_with("Entity(") && s.ends_with(')') => ThingTalkType::Entity(s["Entity(".len()..s.len() - 1].to_string()),
        s if s.starts_with("Measure(") && s.ends_with(')') => ThingTalkType::Measure(s["Measure(".len()..s.len() - 1].to_string()),
        s if s.starts_with("Enum(") && s.ends_with(')') => {
            ThingTalkType::Enum(s["Enum(".len()..s.len() - 1].split(',').map(|s| s.to_string()).collect())
        }
        s if s.starts_with("Array(") && s.ends_with(')') => {
            ThingTalkType::Array(Box::new(parse_thingtalk_type(&s["Array(".len()..s.len() - 1])))
        }
        _ => ThingTalkType::Any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    fn int(n: i64) -> Token {
        Token::new(TerminalKind::LiteralInteger, TerminalPayload::Integer(n), None)
    }

    fn placeholder(terminal: TerminalKind, name: &str, value: EntityValue) -> Token {
        Token::new(terminal, TerminalPayload::Placeholder { name: name.to_string(), value }, None)
    }

    #[test]
    fn small_integer_parses_as_plain_number() {
        let tokens = [int(7)];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_value(&mut p).unwrap(), Value::Number(7.0));
    }

    #[test]
    fn negative_small_integer_round_trips() {
        let tokens = [kw("-"), int(3)];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_value(&mut p).unwrap(), Value::Number(-3.0));
    }

    #[test]
    fn number_placeholder_with_unit_becomes_measure() {
        let tokens = [
            placeholder(TerminalKind::Number, "NUMBER_0", EntityValue::Number(88.0)),
            Token::new(TerminalKind::Unit, TerminalPayload::Literal("unit:mph".to_string()), None),
        ];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_value(&mut p).unwrap(), Value::Measure { value: 88.0, unit: "mph".to_string() });
    }

    #[test]
    fn three_field_date_constructor_is_absolute() {
        let tokens = [kw("new"), kw("Date"), kw("("), int(2018), kw(","), int(6), kw(","), int(23), kw(")")];
        let mut p = Parser::new(&tokens);
        assert_eq!(
            parse_value(&mut p).unwrap(),
            Value::Date(DateLiteral::Absolute(AbsoluteDate { year: 2018, month: 6, day: 23, time: None }))
        );
    }

    #[test]
    fn one_field_date_constructor_is_day_only_piece() {
        let tokens = [kw("new"), kw("Date"), kw("("), int(23), kw(")")];
        let mut p = Parser::new(&tokens);
        assert_eq!(
            parse_value(&mut p).unwrap(),
            Value::Date(DateLiteral::Piece { year: None, month: None, day: Some(23), time: None })
        );
    }

    #[test]
    fn empty_quoted_string_placeholder_is_empty_value_string() {
        let tokens = [Token::new(TerminalKind::QuotedString, TerminalPayload::Literal("\"\"".to_string()), None)];
        // the empty-string literal never goes through the entity bag, so it's
        // parsed directly from its payload rather than `read_placeholder_value`
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_value(&mut p).unwrap(), Value::String(String::new()));
    }

    #[test]
    fn value_filter_suffix_wraps_the_base_value() {
        let tokens = [
            int(1),
            kw("filter"),
            kw("{"),
            Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name: "x".to_string(), ty: None }, None),
            kw("=="),
            int(2),
            kw("}"),
        ];
        let mut p = Parser::new(&tokens);
        match parse_value(&mut p).unwrap() {
            Value::Filter { value, .. } => assert_eq!(*value, Value::Number(1.0)),
            other => panic!("expected Value::Filter, got {other:?}"),
        }
    }
}
