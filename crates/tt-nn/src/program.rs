//! `program_to_nn` (spec §4.5): rejects programs with more than one
//! statement; class definitions and top-level declarations have no
//! representation in [`tt_ast::Program`] at all, so they cannot even be
//! constructed here (spec §1 keeps the rest of the surface grammar out of
//! scope).

use tt_ast::{Program, Scope};
use tt_common::list::List;
use tt_common::ThingTalkError;

use crate::context::kw;
use crate::rule::statement_to_nn;
use crate::NnContext;

pub fn program_to_nn(program: &Program, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let statement = match program.statements.as_slice() {
        [statement] => statement,
        [] => return Err(ThingTalkError::unsynthesizable("program with no statements")),
        _ => return Err(ThingTalkError::unsynthesizable("multiple statements in a program")),
    };

    let scope = Scope::root();
    let mut parts = Vec::new();
    if let Some(executor) = &program.executor {
        parts.push(List::singleton(kw("executor")));
        parts.push(List::singleton(kw("=")));
        parts.push(crate::value_to_nn(executor, &scope, ctx)?);
        parts.push(List::singleton(kw(":")));
    }
    parts.push(statement_to_nn(statement, &scope, ctx)?);
    Ok(List::concat(parts))
}
