//! `table_to_nn` (spec §4.5): one case per [`Table`] variant.

use tt_ast::{Scope, Table};
use tt_common::list::List;
use tt_common::ThingTalkError;

use crate::context::{invocation_to_nn, kw, name_and_type_token, NnContext};
use crate::value_to_nn;
use tt_common::token::TerminalKind;

pub fn table_to_nn(table: &Table, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match table {
        Table::Invocation(inv) => invocation_to_nn(inv, scope, ctx),

        Table::Filter { table, filter } => {
            let cnf = tt_filter::normalize(filter)?;
            Ok(List::concat([
                List::singleton(kw("(")),
                table_to_nn(table, scope, ctx)?,
                List::singleton(kw(")")),
                List::singleton(kw("filter")),
                List::singleton(kw("{")),
                crate::filter::cnf_filter_to_nn(&cnf, scope, ctx)?,
                List::singleton(kw("}")),
            ]))
        }

        Table::Slice { table, base, limit } => Ok(List::concat([
            List::singleton(kw("(")),
            table_to_nn(table, scope, ctx)?,
            List::singleton(kw(")")),
            List::singleton(kw("[")),
            value_to_nn(base, scope, ctx)?,
            List::singleton(kw(":")),
            value_to_nn(limit, scope, ctx)?,
            List::singleton(kw("]")),
        ])),

        Table::Join { lhs, rhs, in_params } => {
            let mut parts = vec![
                List::singleton(kw("(")),
                table_to_nn(lhs, scope, ctx)?,
                List::singleton(kw(")")),
                List::singleton(kw("join")),
                List::singleton(kw("(")),
                table_to_nn(rhs, scope, ctx)?,
                List::singleton(kw(")")),
            ];
            parts.push(on_params_to_nn(in_params, scope, ctx)?);
            Ok(List::concat(parts))
        }

        Table::Projection { .. } => {
            Err(ThingTalkError::unsynthesizable("projections on tables are not part of the NN sublanguage"))
        }

        Table::Aggregation { .. } => Err(ThingTalkError::unsynthesizable("aggregation")),
    }
}

/// `[on param:p=v]*`, shared by table and stream joins (spec §4.5, input
/// params sorted lexicographically).
pub fn on_params_to_nn(
    in_params: &[(String, tt_ast::Value)],
    scope: &Scope,
    ctx: &mut NnContext,
) -> Result<List, ThingTalkError> {
    let mut sorted: Vec<&(String, tt_ast::Value)> = in_params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    let mut parts = Vec::new();
    for (name, value) in sorted {
        parts.push(List::singleton(kw("on")));
        let ty = if ctx.opts.type_annotations { scope.lookup(name).map(|t| t.to_string()) } else { None };
        parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), ty)));
        parts.push(List::singleton(kw("=")));
        parts.push(value_to_nn(value, scope, ctx)?);
    }
    Ok(List::concat(parts))
}
