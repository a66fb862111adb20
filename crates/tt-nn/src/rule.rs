//! `rule_to_nn` / `command_to_nn` (spec §4.5): the two top-level statement
//! shapes, and `statement_to_nn`, the dispatcher dialogue-state history
//! items also use.

use tt_ast::{Command, Rule, Scope, Statement};
use tt_common::list::List;
use tt_common::ThingTalkError;

use crate::action::action_to_nn;
use crate::context::kw;
use crate::stream::stream_to_nn;
use crate::table::table_to_nn;
use crate::NnContext;

/// `<stream> => <action>`. Multiple actions make a rule unsynthesizable
/// (spec §4.5).
pub fn rule_to_nn(rule: &Rule, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let action = single_action(&rule.actions)?;
    Ok(List::concat([stream_to_nn(&rule.stream, scope, ctx)?, List::singleton(kw("=>")), action_to_nn(action, scope, ctx)?]))
}

/// `now => [<table> =>] <action>`.
pub fn command_to_nn(command: &Command, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let action = single_action(&command.actions)?;
    let mut parts = vec![List::singleton(kw("now")), List::singleton(kw("=>"))];
    if let Some(table) = &command.table {
        parts.push(table_to_nn(table, scope, ctx)?);
        parts.push(List::singleton(kw("=>")));
    }
    parts.push(action_to_nn(action, scope, ctx)?);
    Ok(List::concat(parts))
}

pub fn statement_to_nn(statement: &Statement, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match statement {
        Statement::Rule(rule) => rule_to_nn(rule, scope, ctx),
        Statement::Command(command) => command_to_nn(command, scope, ctx),
    }
}

fn single_action(actions: &[tt_ast::Action]) -> Result<&tt_ast::Action, ThingTalkError> {
    match actions {
        [action] => Ok(action),
        [] => Err(ThingTalkError::unsynthesizable("rule/command with no action")),
        _ => Err(ThingTalkError::unsynthesizable("multiple actions in a single rule are not synthesizable")),
    }
}
