//! `action_to_nn` (spec §4.5): the literal `notify`, or an invocation.

use tt_ast::{Action, Scope};
use tt_common::list::List;
use tt_common::ThingTalkError;

use crate::context::{invocation_to_nn, kw, NnContext};

pub fn action_to_nn(action: &Action, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match action {
        Action::Notify => Ok(List::singleton(kw("notify"))),
        Action::Invocation(inv) => invocation_to_nn(inv, scope, ctx),
    }
}
