//! `Statement` parsing -- the inverse of `tt_nn::rule::{rule_to_nn,
//! command_to_nn}` (spec §4.5/§4.7).
//!
//! A leading `now` can only start a `Command`, since every `Stream` variant
//! is introduced by its own keyword or a `"("`, never a bare `now`. Past
//! that, `Table::Invocation` and `Action::Invocation` share an identical
//! wire shape (`@kind.channel ...`), so a command without a table is
//! ambiguous with one whose table happens to be a bare invocation: this
//! parses a table unconditionally, then reinterprets it as the action if no
//! `=>` follows. Any other table shape (`Filter`/`Slice`/`Join`) is only
//! legal in this position followed by `=>`, so the reinterpretation never
//! needs to consider them.

use tt_ast::{Action, Command, Rule, Statement, Table};
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_statement(p: &mut Parser) -> Result<Statement, ThingTalkError> {
    if p.at_kw("now") {
        p.bump();
        p.eat_kw("=>")?;
        return parse_command_tail(p).map(Statement::Command);
    }
    let stream = crate::actions::stream::parse_stream(p)?;
    p.eat_kw("=>")?;
    let action = crate::actions::action::parse_action(p)?;
    Ok(Statement::Rule(Rule { stream, actions: vec![action] }))
}

fn parse_command_tail(p: &mut Parser) -> Result<Command, ThingTalkError> {
    if p.at_kw("notify") {
        p.bump();
        return Ok(Command { table: None, actions: vec![Action::Notify] });
    }
    let table = crate::actions::table::parse_table(p)?;
    if p.at_kw("=>") {
        p.bump();
        let action = crate::actions::action::parse_action(p)?;
        return Ok(Command { table: Some(table), actions: vec![action] });
    }
    match table {
        Table::Invocation(inv) => Ok(Command { table: None, actions: vec![Action::Invocation(inv)] }),
        _ => Err(p.unexpected("`=>` after a non-invocation table")),
    }
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
    fn bare_now_invocation_is_command_action_only() {
        let tokens = [kw("now"), kw("=>"), function_ref("security-camera", "set_power")];
        let mut p = Parser::new(&tokens);
        match parse_statement(&mut p).unwrap() {
            Statement::Command(Command { table, actions }) => {
                assert!(table.is_none());
                assert!(matches!(actions[0], Action::Invocation(_)));
            }
            other => panic!("expected Command, got {other:?}"),
        }
    }

    #[test]
    fn now_table_then_action() {
        let tokens = [
            kw("now"), kw("=>"), function_ref("com.xkcd", "get_comic"), kw("=>"), kw("notify"),
        ];
        let mut p = Parser::new(&tokens);
        match parse_statement(&mut p).unwrap() {
            Statement::Command(Command { table, actions }) => {
                assert!(matches!(table, Some(Table::Invocation(_))));
                assert_eq!(actions[0], Action::Notify);
            }
            other => panic!("expected Command, got {other:?}"),
        }
    }

    #[test]
    fn monitor_rule() {
        let tokens = [
            kw("monitor"), kw("("), function_ref("com.xkcd", "get_comic"), kw(")"),
            kw("=>"), kw("notify"),
        ];
        let mut p = Parser::new(&tokens);
        assert!(matches!(parse_statement(&mut p).unwrap(), Statement::Rule(_)));
    }
}
