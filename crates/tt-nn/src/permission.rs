//! `permission_rule_to_nn` (spec §4.5): `policy <principal-or-true> : <qfn>
//! => <afn>`.

use tt_ast::{PermissionFunction, PermissionRule, Scope};
use tt_common::list::List;
use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;

use crate::context::kw;
use crate::filter::cnf_filter_to_nn;
use crate::NnContext;

pub fn permission_rule_to_nn(rule: &PermissionRule, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let scope = Scope::root();
    let principal = match &rule.principal {
        Some(expr) => {
            let cnf = tt_filter::normalize(expr)?;
            cnf_filter_to_nn(&cnf, &scope, ctx)?
        }
        None => List::singleton(kw("true")),
    };
    Ok(List::concat([
        List::singleton(kw("policy")),
        principal,
        List::singleton(kw(":")),
        permission_function_to_nn(&rule.query, &scope, ctx)?,
        List::singleton(kw("=>")),
        permission_function_to_nn(&rule.action, &scope, ctx)?,
    ]))
}

fn permission_function_to_nn(func: &PermissionFunction, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match func {
        PermissionFunction::Star => Ok(List::singleton(kw("*"))),
        PermissionFunction::ClassStar(kind) => Ok(List::singleton(Token::new(
            TerminalKind::ClassStar,
            TerminalPayload::FunctionRef { kind: kind.clone(), channel: "*".to_string() },
            None,
        ))),
        PermissionFunction::Specific { kind, channel, filter } => {
            let head = List::singleton(Token::new(
                TerminalKind::FunctionRef,
                TerminalPayload::FunctionRef { kind: kind.clone(), channel: channel.clone() },
                None,
            ));
            match filter {
                None => Ok(head),
                Some(expr) => {
                    let cnf = tt_filter::normalize(expr)?;
                    Ok(List::concat([
                        head,
                        List::singleton(kw("filter")),
                        cnf_filter_to_nn(&cnf, scope, ctx)?,
                    ]))
                }
            }
        }
    }
}
