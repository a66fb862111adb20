//! `DialogueState` parsing -- the inverse of
//! `tt_nn::dialogue_state::dialogue_state_to_nn` (spec §4.5/§4.7):
//! `$dialogue @policy.act [, param:arg = value]* [; <history-item>]*`, each
//! history item a statement followed by zero or more `#[ ... ]` annotation
//! blocks.

use tt_ast::{ConfirmState, DialogueState, HistoryItem, ResultsAnnotation, Value};
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_dialogue_state(p: &mut Parser) -> Result<DialogueState, ThingTalkError> {
    p.eat_kw("$dialogue")?;
    let (policy, act) = p.read_function_ref()?;

    let mut args = Vec::new();
    while p.at_kw(",") {
        p.bump();
        let (name, _ty) = p.read_param_name_and_type()?;
        p.eat_kw("=")?;
        let value = crate::actions::value::parse_value(p)?;
        args.push((name, value));
    }

    let mut history = Vec::new();
    while p.at_kw(";") {
        p.bump();
        history.push(parse_history_item(p)?);
    }
    p.expect_end()?;
    Ok(DialogueState { policy, act, args, history })
}

fn parse_history_item(p: &mut Parser) -> Result<HistoryItem, ThingTalkError> {
    let statement = crate::actions::rule::parse_statement(p)?;
    let mut confirm = ConfirmState::Accepted;
    let mut results: Option<ResultsAnnotation> = None;

    while p.at_kw("#[") {
        p.bump();
        if p.at_kw("confirm") {
            p.bump();
            p.eat_kw("=")?;
            let name = p.read_enum_name()?;
            confirm = match name.as_str() {
                "proposed" => ConfirmState::Proposed,
                "confirmed" => ConfirmState::Confirmed,
                other => return Err(ThingTalkError::syntax(format!("unknown confirm state `{other}`"), None)),
            };
            p.eat_kw("]")?;
        } else if p.at_kw("results") {
            p.bump();
            p.eat_kw("=")?;
            p.eat_kw("[")?;
            let mut objs = Vec::new();
            if !p.at_kw("]") {
                loop {
                    objs.push(parse_result_object(p)?);
                    if p.at_kw(",") {
                        p.bump();
                        continue;
                    }
                    break;
                }
            }
            p.eat_kw("]")?;
            p.eat_kw("]")?;
            results.get_or_insert_with(ResultsAnnotation::default).results = objs;
        } else if p.at_kw("count") {
            p.bump();
            p.eat_kw("=")?;
            let n = p.parse_plain_integer_literal()?;
            p.eat_kw("]")?;
            results.get_or_insert_with(ResultsAnnotation::default).count = Some(n);
        } else if p.at_kw("more") {
            p.bump();
            p.eat_kw("=")?;
            p.eat_kw("true")?;
            p.eat_kw("]")?;
            results.get_or_insert_with(ResultsAnnotation::default).more = true;
        } else if p.at_kw("error") {
            p.bump();
            p.eat_kw("=")?;
            let value = crate::actions::value::parse_value(p)?;
            p.eat_kw("]")?;
            results.get_or_insert_with(ResultsAnnotation::default).error = Some(value);
        } else {
            return Err(p.unexpected("a dialogue history annotation (confirm, results, count, more, error)"));
        }
    }
    Ok(HistoryItem { statement, confirm, results })
}

fn parse_result_object(p: &mut Parser) -> Result<Vec<(String, Value)>, ThingTalkError> {
    p.eat_kw("{")?;
    let mut fields = Vec::new();
    if !p.at_kw("}") {
        loop {
            let (name, _ty) = p.read_param_name_and_type()?;
            p.eat_kw("=")?;
            let value = crate::actions::value::parse_value(p)?;
            fields.push((name, value));
            if p.at_kw(",") {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.eat_kw("}")?;
    Ok(fields)
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
    fn policy_act_with_no_history() {
        let tokens = [kw("$dialogue"), function_ref("org.thingpedia.dialogue.transaction", "sys_greet")];
        let mut p = Parser::new(&tokens);
        let state = parse_dialogue_state(&mut p).unwrap();
        assert_eq!(state.policy, "org.thingpedia.dialogue.transaction");
        assert_eq!(state.act, "sys_greet");
        assert!(state.history.is_empty());
    }

    #[test]
    fn confirmed_history_item() {
        let tokens = [
            kw("$dialogue"), function_ref("org.thingpedia.dialogue.transaction", "execute"),
            kw(";"), kw("now"), kw("=>"), kw("notify"),
            kw("#["), kw("confirm"), kw("="), Token::new(TerminalKind::Enum, TerminalPayload::Literal("enum:confirmed".to_string()), None), kw("]"),
        ];
        let mut p = Parser::new(&tokens);
        let state = parse_dialogue_state(&mut p).unwrap();
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].confirm, ConfirmState::Confirmed);
    }

    #[test]
    fn results_annotation_with_count_and_more() {
        let tokens = [
            kw("$dialogue"), function_ref("org.thingpedia.dialogue.transaction", "execute"),
            kw(";"), kw("now"), kw("=>"), kw("notify"),
            kw("#["), kw("results"), kw("="), kw("["), kw("]"), kw("]"),
            kw("#["), kw("count"), kw("="), kw("1"), kw("]"),
            kw("#["), kw("more"), kw("="), kw("true"), kw("]"),
        ];
        let mut p = Parser::new(&tokens);
        let state = parse_dialogue_state(&mut p).unwrap();
        let ann = state.history[0].results.as_ref().unwrap();
        assert_eq!(ann.count, Some(1));
        assert!(ann.more);
        assert!(ann.results.is_empty());
    }
}
