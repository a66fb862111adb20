//! `BooleanExpression` parsing -- the inverse of `tt_nn::filter::cnf_filter_to_nn`
//! (spec §4.4/§4.5): `<andclause> and <andclause> ...`, each andclause
//! `<literal> or <literal> ...`. Unlike the compiler side this produces the
//! *raw* `BooleanExpression` tree the rest of the AST carries, not the
//! normalized `Cnf` shape -- `tt-filter::normalize` re-derives that from
//! whatever tree a caller builds, parser included.

use tt_ast::{BooleanExpression, Value};
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_cnf(p: &mut Parser) -> Result<BooleanExpression, ThingTalkError> {
    let mut conjuncts = vec![parse_disjunction(p)?];
    while p.at_kw("and") {
        p.bump();
        conjuncts.push(parse_disjunction(p)?);
    }
    if conjuncts.len() == 1 {
        Ok(conjuncts.into_iter().next().unwrap())
    } else {
        Ok(BooleanExpression::And(conjuncts))
    }
}

fn parse_disjunction(p: &mut Parser) -> Result<BooleanExpression, ThingTalkError> {
    let mut literals = vec![parse_literal(p)?];
    while p.at_kw("or") {
        p.bump();
        literals.push(parse_literal(p)?);
    }
    if literals.len() == 1 {
        Ok(literals.into_iter().next().unwrap())
    } else {
        Ok(BooleanExpression::Or(literals))
    }
}

fn parse_literal(p: &mut Parser) -> Result<BooleanExpression, ThingTalkError> {
    if p.at_kw("not") {
        p.bump();
        let inner = parse_literal(p)?;
        return Ok(BooleanExpression::Not(Box::new(inner)));
    }
    if p.at_kw("true") {
        if matches!(p.peek_n(1).map(|t| &t.terminal), Some(TerminalKind::Param)) {
            p.bump();
            let (name, _ty) = p.read_param_name_and_type()?;
            return Ok(BooleanExpression::DontCare { name });
        }
        p.bump();
        return Ok(BooleanExpression::True);
    }
    if p.at_kw("false") {
        p.bump();
        return Ok(BooleanExpression::False);
    }
    if matches!(p.peek_terminal(), Some(TerminalKind::FunctionRef)) {
        return parse_external(p);
    }
    if matches!(p.peek_terminal(), Some(TerminalKind::Param)) {
        let (name, _ty) = p.read_param_name_and_type()?;
        let op = parse_op(p)?;
        let value = crate::actions::value::parse_value(p)?;
        return Ok(BooleanExpression::Atom { name, op, value });
    }
    let lhs = crate::actions::value::parse_value(p)?;
    let op = parse_op(p)?;
    let rhs = crate::actions::value::parse_value(p)?;
    Ok(BooleanExpression::Compute { lhs, op, rhs })
}

/// The legacy `External` subquery head, always parenthesized, never
/// carrying `attribute:` selectors (spec §4.5 `cnf_filter_to_nn`).
fn parse_external(p: &mut Parser) -> Result<BooleanExpression, ThingTalkError> {
    let (kind, channel) = p.read_function_ref()?;
    p.eat_kw("(")?;
    let mut in_params: Vec<(String, Value)> = Vec::new();
    if !p.at_kw(")") {
        loop {
            let (name, _ty) = p.read_param_name_and_type()?;
            p.eat_kw("=")?;
            let value = crate::actions::value::parse_value(p)?;
            in_params.push((name, value));
            if p.at_kw(",") {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.eat_kw(")")?;
    p.eat_kw("{")?;
    let filter = parse_cnf(p)?;
    p.eat_kw("}")?;
    Ok(BooleanExpression::External { kind, channel, in_params, filter: Box::new(filter) })
}

/// Any plain keyword token in the operator position -- the NN wire form
/// never restricts these to a closed terminal kind of their own (spec §6.2
/// groups them under "comparison/arithmetic ops"), so this accepts whatever
/// spelling the compiler wrote there.
fn parse_op(p: &mut Parser) -> Result<String, ThingTalkError> {
    match p.peek_terminal() {
        Some(TerminalKind::Keyword(k)) => {
            let k = k.clone();
            p.bump();
            Ok(k)
        }
        _ => Err(p.unexpected("a comparison operator")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    fn param(name: &str) -> Token {
        Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name: name.to_string(), ty: None }, None)
    }

    #[test]
    fn single_atom() {
        let tokens = [param("power"), kw("=="), kw("true")];
        let mut p = Parser::new(&tokens);
        assert_eq!(
            parse_cnf(&mut p).unwrap(),
            BooleanExpression::Atom { name: "power".to_string(), op: "==".to_string(), value: Value::Boolean(true) }
        );
    }

    #[test]
    fn and_or_nest_correctly() {
        let tokens = [
            param("power"), kw("=="), kw("true"),
            kw("and"),
            param("x"), kw("=="), kw("1"), kw("or"), param("x"), kw("=="), kw("0"),
        ];
        let mut p = Parser::new(&tokens);
        match parse_cnf(&mut p).unwrap() {
            BooleanExpression::And(conjuncts) => {
                assert_eq!(conjuncts.len(), 2);
                assert!(matches!(conjuncts[0], BooleanExpression::Atom { .. }));
                assert!(matches!(conjuncts[1], BooleanExpression::Or(_)));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn dontcare_literal() {
        let tokens = [kw("true"), param("power")];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_cnf(&mut p).unwrap(), BooleanExpression::DontCare { name: "power".to_string() });
    }

    #[test]
    fn not_wraps_atom() {
        let tokens = [kw("not"), param("power"), kw("=="), kw("true")];
        let mut p = Parser::new(&tokens);
        match parse_cnf(&mut p).unwrap() {
            BooleanExpression::Not(inner) => assert!(matches!(*inner, BooleanExpression::Atom { .. })),
            other => panic!("expected Not, got {other:?}"),
        }
    }
}
