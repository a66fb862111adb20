//! `dialogue_state_to_nn` (spec §4.5): `$dialogue @<policy>.<act> [ ,
//! param:<arg>* ] ; <history-item> ; ...`.

use tt_ast::{ConfirmState, DialogueState, HistoryItem, ResultsAnnotation, Scope};
use tt_common::list::List;
use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;

use crate::context::{kw, literal_token, name_and_type_token};
use crate::rule::statement_to_nn;
use crate::value_to_nn;
use crate::NnContext;

pub fn dialogue_state_to_nn(state: &DialogueState, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let scope = Scope::root();
    let mut parts = vec![
        List::singleton(kw("$dialogue")),
        List::singleton(Token::new(
            TerminalKind::FunctionRef,
            TerminalPayload::FunctionRef { kind: state.policy.clone(), channel: state.act.clone() },
            None,
        )),
    ];
    for (name, value) in &state.args {
        parts.push(List::singleton(kw(",")));
        parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), None)));
        parts.push(List::singleton(kw("=")));
        parts.push(value_to_nn(value, &scope, ctx)?);
    }
    for item in &state.history {
        parts.push(List::singleton(kw(";")));
        parts.push(history_item_to_nn(item, &scope, ctx)?);
    }
    Ok(List::concat(parts))
}

fn history_item_to_nn(item: &HistoryItem, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let statement = statement_to_nn(&item.statement, scope, ctx)?;
    let annotation = match (&item.confirm, &item.results) {
        (ConfirmState::Accepted, Some(results)) => results_annotation_to_nn(results, scope, ctx)?,
        (ConfirmState::Accepted, None) => List::nil(),
        (ConfirmState::Proposed, _) => confirm_annotation("proposed"),
        (ConfirmState::Confirmed, _) => confirm_annotation("confirmed"),
    };
    Ok(List::concat([statement, annotation]))
}

fn confirm_annotation(state: &str) -> List {
    List::concat([
        List::singleton(kw("#[")),
        List::singleton(kw("confirm")),
        List::singleton(kw("=")),
        List::singleton(literal_token(TerminalKind::Enum, format!("enum:{state}"))),
        List::singleton(kw("]")),
    ])
}

/// `#[ results = [ {...}, ... ] ] [#[ count = N ]] [#[ more = true ]] [#[
/// error = ... ]]` (spec §4.5).
fn results_annotation_to_nn(ann: &ResultsAnnotation, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut parts = vec![List::singleton(kw("#[")), List::singleton(kw("results")), List::singleton(kw("=")), List::singleton(kw("["))];
    for (i, result) in ann.results.iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(result_object_to_nn(result, scope, ctx)?);
    }
    parts.push(List::singleton(kw("]")));
    parts.push(List::singleton(kw("]")));

    if let Some(count) = ann.count {
        parts.push(List::concat([
            List::singleton(kw("#[")),
            List::singleton(kw("count")),
            List::singleton(kw("=")),
            List::singleton(literal_token(TerminalKind::LiteralInteger, count.to_string())),
            List::singleton(kw("]")),
        ]));
    }
    if ann.more {
        parts.push(List::concat([
            List::singleton(kw("#[")),
            List::singleton(kw("more")),
            List::singleton(kw("=")),
            List::singleton(kw("true")),
            List::singleton(kw("]")),
        ]));
    }
    if let Some(error) = &ann.error {
        parts.push(List::concat([
            List::singleton(kw("#[")),
            List::singleton(kw("error")),
            List::singleton(kw("=")),
            value_to_nn(error, scope, ctx)?,
            List::singleton(kw("]")),
        ]));
    }
    Ok(List::concat(parts))
}

fn result_object_to_nn(fields: &[(String, tt_ast::Value)], scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut parts = vec![List::singleton(kw("{"))];
    for (i, (name, value)) in fields.iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw(",")));
        }
        parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), None)));
        parts.push(List::singleton(kw("=")));
        parts.push(value_to_nn(value, scope, ctx)?);
    }
    parts.push(List::singleton(kw("}")));
    Ok(List::concat(parts))
}
