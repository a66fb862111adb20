//! `Stream` parsing -- the inverse of `tt_nn::stream::stream_to_nn` (spec
//! §4.5/§4.7). `Monitor`/`Edge`/`AtTimer`/`Timer` are atoms, each introduced
//! by its own leading keyword; `Filter`/`Join` always wrap their inner
//! stream in parens first, so (as in `actions::table`) a leading `"("` is
//! parsed recursively and the suffix token after the matching `")"` picks
//! the variant.

use tt_ast::Stream;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_stream(p: &mut Parser) -> Result<Stream, ThingTalkError> {
    if p.at_kw("monitor") {
        return parse_monitor(p);
    }
    if p.at_kw("edge") {
        return parse_edge(p);
    }
    if p.at_kw("attimer") {
        return parse_attimer(p);
    }
    if p.at_kw("timer") {
        return parse_timer(p);
    }

    p.eat_kw("(")?;
    let inner = parse_stream(p)?;
    p.eat_kw(")")?;

    if p.at_kw("filter") {
        p.bump();
        p.eat_kw("{")?;
        let filter = crate::actions::filter::parse_cnf(p)?;
        p.eat_kw("}")?;
        return Ok(Stream::Filter { stream: Box::new(inner), filter });
    }
    if p.at_kw("=>") {
        p.bump();
        p.eat_kw("(")?;
        let rhs = crate::actions::table::parse_table(p)?;
        p.eat_kw(")")?;
        let in_params = crate::actions::table::parse_on_params(p)?;
        return Ok(Stream::Join { lhs: Box::new(inner), rhs: Box::new(rhs), in_params });
    }
    Err(p.unexpected("`filter` or `=>` after a parenthesized stream"))
}

fn parse_monitor(p: &mut Parser) -> Result<Stream, ThingTalkError> {
    p.eat_kw("monitor")?;
    p.eat_kw("(")?;
    let table = crate::actions::table::parse_table(p)?;
    p.eat_kw(")")?;
    let mut args = None;
    if p.at_kw("on") {
        p.bump();
        p.eat_kw("new")?;
        if p.at_kw("[") {
            p.bump();
            let mut names = Vec::new();
            if !p.at_kw("]") {
                loop {
                    let (name, _ty) = p.read_param_name_and_type()?;
                    names.push(name);
                    if p.at_kw(",") {
                        p.bump();
                        continue;
                    }
                    break;
                }
            }
            p.eat_kw("]")?;
            args = Some(names);
        } else {
            let (name, _ty) = p.read_param_name_and_type()?;
            args = Some(vec![name]);
        }
    }
    Ok(Stream::Monitor { table: Box::new(table), args })
}

fn parse_edge(p: &mut Parser) -> Result<Stream, ThingTalkError> {
    p.eat_kw("edge")?;
    p.eat_kw("(")?;
    let inner = parse_stream(p)?;
    p.eat_kw(")")?;
    p.eat_kw("on")?;
    let filter = crate::actions::filter::parse_cnf(p)?;
    Ok(Stream::Edge { stream: Box::new(inner), filter })
}

fn parse_attimer(p: &mut Parser) -> Result<Stream, ThingTalkError> {
    p.eat_kw("attimer")?;
    p.eat_kw("time")?;
    p.eat_kw("=")?;
    let mut times = vec![crate::actions::value::parse_value(p)?];
    let mut expiration_date = None;
    while p.at_kw(",") {
        let checkpoint = p.pos();
        p.bump();
        if p.at_kw("time") {
            p.bump();
            p.eat_kw("=")?;
            times.push(crate::actions::value::parse_value(p)?);
            continue;
        }
        if p.at_kw("expiration_date") {
            p.bump();
            p.eat_kw("=")?;
            expiration_date = Some(crate::actions::value::parse_value(p)?);
            break;
        }
        p.set_pos(checkpoint);
        break;
    }
    Ok(Stream::AtTimer { times, expiration_date })
}

fn parse_timer(p: &mut Parser) -> Result<Stream, ThingTalkError> {
    p.eat_kw("timer")?;
    p.eat_kw("base")?;
    p.eat_kw("=")?;
    let base = crate::actions::value::parse_value(p)?;
    p.eat_kw(",")?;
    p.eat_kw("interval")?;
    p.eat_kw("=")?;
    let interval = crate::actions::value::parse_value(p)?;
    let mut frequency = None;
    if p.at_kw(",") {
        p.bump();
        p.eat_kw("frequency")?;
        p.eat_kw("=")?;
        frequency = Some(crate::actions::value::parse_value(p)?);
    }
    Ok(Stream::Timer { base, interval, frequency })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalKind, TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    fn function_ref(kind: &str, channel: &str) -> Token {
        Token::new(
            TerminalKind::FunctionRef,
            TerminalPayload::FunctionRef { kind: kind.to_string(), channel: channel.to_string() },
            None,
        )
    }

    #[test]
    fn monitor_with_single_on_new_param() {
        let tokens = [
            kw("monitor"), kw("("), function_ref("com.xkcd", "get_comic"), kw(")"),
            kw("on"), kw("new"),
            Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name: "title".to_string(), ty: None }, None),
        ];
        let mut p = Parser::new(&tokens);
        match parse_stream(&mut p).unwrap() {
            Stream::Monitor { args, .. } => assert_eq!(args, Some(vec!["title".to_string()])),
            other => panic!("expected Monitor, got {other:?}"),
        }
    }

    #[test]
    fn timer_without_frequency() {
        let tokens = [
            kw("timer"), kw("base"), kw("="), kw("now"), kw(","), kw("interval"), kw("="),
            Token::new(TerminalKind::Duration, TerminalPayload::Placeholder {
                name: "DURATION_0".to_string(),
                value: tt_entities::EntityValue::Measure { unit: "ms".to_string(), value: 3600000.0 },
            }, None),
        ];
        let mut p = Parser::new(&tokens);
        match parse_stream(&mut p).unwrap() {
            Stream::Timer { frequency, .. } => assert!(frequency.is_none()),
            other => panic!("expected Timer, got {other:?}"),
        }
    }
}
