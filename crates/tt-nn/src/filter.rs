//! `cnf_filter_to_nn` (spec §4.5): renders an already-normalized [`Cnf`] as
//! `<andclause> and <andclause> ...`, each andclause `<literal> or <literal>
//! ...`.

use tt_ast::{BooleanExpression, Scope};
use tt_common::list::List;
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;
use tt_filter::Cnf;

use crate::context::{external_invocation_to_nn, kw, name_and_type_token, NnContext};
use crate::value_to_nn;

pub fn cnf_filter_to_nn(cnf: &Cnf, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match cnf {
        Cnf::True => Ok(List::singleton(kw("true"))),
        Cnf::False => Ok(List::singleton(kw("false"))),
        Cnf::And(conjuncts) => {
            let mut parts = Vec::new();
            for (i, disjunction) in conjuncts.iter().enumerate() {
                if i > 0 {
                    parts.push(List::singleton(kw("and")));
                }
                parts.push(disjunction_to_nn(disjunction, scope, ctx)?);
            }
            Ok(List::concat(parts))
        }
    }
}

fn disjunction_to_nn(literals: &[BooleanExpression], scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut parts = Vec::new();
    for (i, literal) in literals.iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw("or")));
        }
        parts.push(literal_to_nn(literal, scope, ctx)?);
    }
    Ok(List::concat(parts))
}

fn literal_to_nn(expr: &BooleanExpression, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    match expr {
        BooleanExpression::Not(inner) => {
            Ok(List::concat([List::singleton(kw("not")), literal_to_nn(inner, scope, ctx)?]))
        }
        BooleanExpression::Atom { name, op, value } => {
            let ty = if ctx.opts.type_annotations { scope.lookup(name).map(|t| t.to_string()) } else { None };
            Ok(List::concat([
                List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), ty)),
                List::singleton(kw(op)),
                value_to_nn(value, scope, ctx)?,
            ]))
        }
        BooleanExpression::Compute { lhs, op, rhs } => Ok(List::concat([
            value_to_nn(lhs, scope, ctx)?,
            List::singleton(kw(op)),
            value_to_nn(rhs, scope, ctx)?,
        ])),
        BooleanExpression::DontCare { name } => {
            let ty = if ctx.opts.type_annotations { scope.lookup(name).map(|t| t.to_string()) } else { None };
            Ok(List::concat([
                List::singleton(kw("true")),
                List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), ty)),
            ]))
        }
        BooleanExpression::External { kind, channel, in_params, filter } => {
            let sub_cnf = tt_filter::normalize(filter)?;
            Ok(List::concat([
                external_invocation_to_nn(kind, channel, in_params, scope, ctx)?,
                List::singleton(kw("{")),
                cnf_filter_to_nn(&sub_cnf, scope, ctx)?,
                List::singleton(kw("}")),
            ]))
        }
        BooleanExpression::True => Ok(List::singleton(kw("true"))),
        BooleanExpression::False => Ok(List::singleton(kw("false"))),
        // `And`/`Or` never reach a well-formed CNF literal position; treated
        // as a bug rather than silently flattened here (the normalizer is
        // the only place that's allowed to do that).
        BooleanExpression::And(_) | BooleanExpression::Or(_) => {
            Err(ThingTalkError::type_error("unexpected compound boolean expression in CNF literal position"))
        }
    }
}
