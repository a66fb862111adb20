//! `Table` parsing -- the inverse of `tt_nn::table::table_to_nn` (spec
//! §4.5/§4.7). `Invocation` is the only atom that never self-wraps in
//! parens; `Filter`/`Slice`/`Join` always wrap their inner table as `"("
//! <table> ")"` before the suffix that names them, so a leading `"("` is
//! parsed recursively and the branch is decided by the token right after
//! the matching `")"`.

use tt_ast::{Table, Value};
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_table(p: &mut Parser) -> Result<Table, ThingTalkError> {
    if matches!(p.peek_terminal(), Some(TerminalKind::FunctionRef)) {
        let inv = crate::actions::invocation::parse_invocation(p)?;
        return Ok(Table::Invocation(inv));
    }

    p.eat_kw("(")?;
    let inner = parse_table(p)?;
    p.eat_kw(")")?;

    if p.at_kw("filter") {
        p.bump();
        p.eat_kw("{")?;
        let filter = crate::actions::filter::parse_cnf(p)?;
        p.eat_kw("}")?;
        return Ok(Table::Filter { table: Box::new(inner), filter });
    }
    if p.at_kw("[") {
        p.bump();
        let base = crate::actions::value::parse_value(p)?;
        p.eat_kw(":")?;
        let limit = crate::actions::value::parse_value(p)?;
        p.eat_kw("]")?;
        return Ok(Table::Slice { table: Box::new(inner), base, limit });
    }
    if p.at_kw("join") {
        p.bump();
        p.eat_kw("(")?;
        let rhs = parse_table(p)?;
        p.eat_kw(")")?;
        let in_params = parse_on_params(p)?;
        return Ok(Table::Join { lhs: Box::new(inner), rhs: Box::new(rhs), in_params });
    }
    Err(p.unexpected("`filter`, `[`, or `join` after a parenthesized table"))
}

/// `[on param:p=v]*`, shared by table and stream joins, sorted
/// lexicographically on the wire so this just reads them in that order
/// (spec §4.5).
pub fn parse_on_params(p: &mut Parser) -> Result<Vec<(String, Value)>, ThingTalkError> {
    let mut params = Vec::new();
    while p.at_kw("on") {
        p.bump();
        let (name, _ty) = p.read_param_name_and_type()?;
        p.eat_kw("=")?;
        let value = crate::actions::value::parse_value(p)?;
        params.push((name, value));
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalPayload, Token};

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
    fn bare_invocation_is_invocation_table() {
        let tokens = [function_ref("com.xkcd", "get_comic")];
        let mut p = Parser::new(&tokens);
        assert!(matches!(parse_table(&mut p).unwrap(), Table::Invocation(_)));
    }

    #[test]
    fn parenthesized_slice_round_trips() {
        let tokens = [
            kw("("), function_ref("com.xkcd", "get_comic"), kw(")"),
            kw("["), kw("1"), kw(":"), kw("3"), kw("]"),
        ];
        let mut p = Parser::new(&tokens);
        match parse_table(&mut p).unwrap() {
            Table::Slice { table, .. } => assert!(matches!(*table, Table::Invocation(_))),
            other => panic!("expected Slice, got {other:?}"),
        }
    }

    #[test]
    fn chained_filter_over_filter_nests() {
        let tokens = [
            kw("("), kw("("), function_ref("com.xkcd", "get_comic"), kw(")"),
            kw("filter"), kw("{"), kw("true"), kw("}"), kw(")"),
            kw("filter"), kw("{"), kw("false"), kw("}"),
        ];
        let mut p = Parser::new(&tokens);
        match parse_table(&mut p).unwrap() {
            Table::Filter { table, .. } => assert!(matches!(*table, Table::Filter { .. })),
            other => panic!("expected outer Filter, got {other:?}"),
        }
    }
}
