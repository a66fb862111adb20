//! The four-stage CNF normalization pipeline (spec §4.4).

use tt_ast::BooleanExpression;
use tt_common::ThingTalkError;

use crate::sort_key::{disjunction_key, literal_key};

/// The closed normal form a filter reaches after [`normalize`]: either
/// `True`, `False`, or a conjunction of disjunctions of literals, both
/// levels sorted canonically (spec §3 "Filter tree normal form").
#[derive(Debug, Clone, PartialEq)]
pub enum Cnf {
    True,
    False,
    And(Vec<Vec<BooleanExpression>>),
}

impl Cnf {
    /// Render the filter conjuncts already in their canonical,
    /// lexicographically-sorted order -- used directly by `tt-nn`.
    pub fn conjuncts(&self) -> &[Vec<BooleanExpression>] {
        match self {
            Cnf::And(conjuncts) => conjuncts,
            Cnf::True | Cnf::False => &[],
        }
    }
}

/// Run the full normalize pipeline: push negations, optimize, flatten to
/// CNF, sort.
pub fn normalize(expr: &BooleanExpression) -> Result<Cnf, ThingTalkError> {
    let pushed = push_negations(expr);
    let optimized = optimize(&pushed);
    match &optimized {
        BooleanExpression::True => return Ok(Cnf::True),
        BooleanExpression::False => return Ok(Cnf::False),
        _ => {}
    }
    let mut conjuncts = flatten_to_cnf(&optimized)?;
    for disjunction in conjuncts.iter_mut() {
        disjunction.sort_by_key(|lit| literal_key(lit));
    }
    conjuncts.sort_by_key(|d| disjunction_key(d));
    Ok(Cnf::And(conjuncts))
}

/// Stage 1: push `Not` down to the leaves via De Morgan's laws, collapsing
/// double negation and negating `True`/`False` directly. Leaves literal
/// negations (`Not(Atom)`, `Not(External)`, `Not(Compute)`, `Not(DontCare)`)
/// intact.
fn push_negations(expr: &BooleanExpression) -> BooleanExpression {
    match expr {
        BooleanExpression::Not(inner) => push_negation_into(inner),
        BooleanExpression::And(parts) => BooleanExpression::And(parts.iter().map(push_negations).collect()),
        BooleanExpression::Or(parts) => BooleanExpression::Or(parts.iter().map(push_negations).collect()),
        other => other.clone(),
    }
}

/// Push a negation one level into `inner`, which is the operand of a `Not`
/// being eliminated.
fn push_negation_into(inner: &BooleanExpression) -> BooleanExpression {
    match inner {
        BooleanExpression::Not(doubly_negated) => push_negations(doubly_negated),
        BooleanExpression::True => BooleanExpression::False,
        BooleanExpression::False => BooleanExpression::True,
        BooleanExpression::And(parts) => {
            BooleanExpression::Or(parts.iter().map(|p| push_negation_into_fresh(p)).collect())
        }
        BooleanExpression::Or(parts) => {
            BooleanExpression::And(parts.iter().map(|p| push_negation_into_fresh(p)).collect())
        }
        literal => BooleanExpression::Not(Box::new(push_negations(literal))),
    }
}

fn push_negation_into_fresh(expr: &BooleanExpression) -> BooleanExpression {
    push_negation_into(&push_negations(expr))
}

/// Stage 2: dedupe identical clauses and fold constant sub-expressions.
/// `And`/`Or` with a `False`/`True` member respectively collapse entirely;
/// a unary `And`/`Or` collapses to its single member.
fn optimize(expr: &BooleanExpression) -> BooleanExpression {
    match expr {
        BooleanExpression::And(parts) => {
            let mut optimized: Vec<BooleanExpression> = Vec::new();
            for part in parts {
                let p = optimize(part);
                if p == BooleanExpression::False {
                    return BooleanExpression::False;
                }
                if p != BooleanExpression::True && !optimized.contains(&p) {
                    optimized.push(p);
                }
            }
            match optimized.len() {
                0 => BooleanExpression::True,
                1 => optimized.into_iter().next().unwrap(),
                _ => BooleanExpression::And(optimized),
            }
        }
        BooleanExpression::Or(parts) => {
            let mut optimized: Vec<BooleanExpression> = Vec::new();
            for part in parts {
                let p = optimize(part);
                if p == BooleanExpression::True {
                    return BooleanExpression::True;
                }
                if p != BooleanExpression::False && !optimized.contains(&p) {
                    optimized.push(p);
                }
            }
            match optimized.len() {
                0 => BooleanExpression::False,
                1 => optimized.into_iter().next().unwrap(),
                _ => BooleanExpression::Or(optimized),
            }
        }
        other => other.clone(),
    }
}

/// Stage 3: flatten into `Vec<Vec<literal>>` (conjunction of disjunctions).
/// Treats the top node as a conjunction; `Or`-of-`Or` is flattened; an `And`
/// found nested under an `Or` after stage 2 is an error (spec §4.4 step 3).
fn flatten_to_cnf(expr: &BooleanExpression) -> Result<Vec<Vec<BooleanExpression>>, ThingTalkError> {
    match expr {
        BooleanExpression::And(parts) => {
            let mut conjuncts = Vec::new();
            for part in parts {
                conjuncts.push(flatten_disjunction(part)?);
            }
            Ok(conjuncts)
        }
        other => Ok(vec![flatten_disjunction(other)?]),
    }
}

fn flatten_disjunction(expr: &BooleanExpression) -> Result<Vec<BooleanExpression>, ThingTalkError> {
    match expr {
        BooleanExpression::Or(parts) => {
            let mut literals = Vec::new();
            for part in parts {
                match part {
                    BooleanExpression::Or(nested) => literals.extend(nested.iter().cloned()),
                    BooleanExpression::And(_) => {
                        return Err(ThingTalkError::unserializable("AND boolean expression"))
                    }
                    literal if literal.is_literal() => literals.push(literal.clone()),
                    _ => return Err(ThingTalkError::unserializable("AND boolean expression")),
                }
            }
            Ok(literals)
        }
        BooleanExpression::And(_) => Err(ThingTalkError::unserializable("AND boolean expression")),
        literal if literal.is_literal() => Ok(vec![literal.clone()]),
        _ => Err(ThingTalkError::type_error("unexpected boolean expression shape after optimize")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_ast::value::Value;

    fn atom(name: &str, op: &str, n: f64) -> BooleanExpression {
        BooleanExpression::Atom { name: name.into(), op: op.into(), value: Value::Number(n) }
    }

    #[test]
    fn double_negation_cancels() {
        let expr = BooleanExpression::Not(Box::new(BooleanExpression::Not(Box::new(atom("x", "==", 1.0)))));
        let cnf = normalize(&expr).unwrap();
        assert_eq!(cnf, Cnf::And(vec![vec![atom("x", "==", 1.0)]]));
    }

    #[test]
    fn demorgan_over_and() {
        let expr = BooleanExpression::Not(Box::new(BooleanExpression::and([atom("x", "==", 1.0), atom("y", "==", 2.0)])));
        let cnf = normalize(&expr).unwrap();
        // ¬(a∧b) -> ¬a ∨ ¬b, a single conjunct with two literals.
        match cnf {
            Cnf::And(conjuncts) => assert_eq!(conjuncts.len(), 1),
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn nested_or_is_flattened() {
        let inner = BooleanExpression::or([atom("x", "==", 1.0), atom("y", "==", 2.0)]);
        let outer = BooleanExpression::or([inner, atom("z", "==", 3.0)]);
        let cnf = normalize(&outer).unwrap();
        match cnf {
            Cnf::And(conjuncts) => assert_eq!(conjuncts[0].len(), 3),
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn and_nested_under_or_is_an_error() {
        let bad = BooleanExpression::or([BooleanExpression::and([atom("x", "==", 1.0), atom("y", "==", 2.0)])]);
        let result = normalize(&bad);
        assert!(result.is_err());
    }

    #[test]
    fn conjuncts_and_disjuncts_are_sorted() {
        let expr = BooleanExpression::and([atom("z", "==", 1.0), atom("a", "==", 1.0)]);
        let cnf = normalize(&expr).unwrap();
        match cnf {
            Cnf::And(conjuncts) => {
                assert_eq!(conjuncts[0][0], atom("a", "==", 1.0));
                assert_eq!(conjuncts[1][0], atom("z", "==", 1.0));
            }
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn true_and_false_short_circuit() {
        assert_eq!(normalize(&BooleanExpression::True).unwrap(), Cnf::True);
        assert_eq!(normalize(&BooleanExpression::False).unwrap(), Cnf::False);
        let always_false = BooleanExpression::and([BooleanExpression::False, atom("x", "==", 1.0)]);
        assert_eq!(normalize(&always_false).unwrap(), Cnf::False);
    }
}
