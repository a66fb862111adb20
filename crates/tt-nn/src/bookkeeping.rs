//! `bookkeeping_to_nn` (spec §4.5): `bookkeeping special special:<t>` |
//! `bookkeeping choice <n>` | `bookkeeping answer <value>`.

use tt_ast::{ControlCommand, Scope};
use tt_common::list::List;
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::context::{kw, literal_token};
use crate::value_to_nn;
use crate::NnContext;

pub fn bookkeeping_to_nn(command: &ControlCommand, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let head = List::singleton(kw("bookkeeping"));
    match command {
        ControlCommand::Special(name) => Ok(List::concat([
            head,
            List::singleton(kw("special")),
            List::singleton(literal_token(TerminalKind::Special, format!("special:{name}"))),
        ])),
        ControlCommand::Choice(n) => Ok(List::concat([
            head,
            List::singleton(kw("choice")),
            List::singleton(literal_token(TerminalKind::LiteralInteger, n.to_string())),
        ])),
        ControlCommand::Answer(value) => {
            let scope = Scope::root();
            Ok(List::concat([head, List::singleton(kw("answer")), value_to_nn(value, &scope, ctx)?]))
        }
    }
}
