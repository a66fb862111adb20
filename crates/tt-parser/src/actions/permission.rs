//! `PermissionRule` parsing -- the inverse of
//! `tt_nn::permission::permission_rule_to_nn` (spec §4.5/§4.7): `policy
//! <principal-expr-or-true> : <query-fn> => <action-fn>`.

use tt_ast::{PermissionFunction, PermissionRule};
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_permission_rule(p: &mut Parser) -> Result<PermissionRule, ThingTalkError> {
    p.eat_kw("policy")?;
    let principal = if is_bare_true_principal(p) {
        p.bump();
        None
    } else {
        Some(crate::actions::filter::parse_cnf(p)?)
    };
    p.eat_kw(":")?;
    let query = parse_permission_function(p)?;
    p.eat_kw("=>")?;
    let action = parse_permission_function(p)?;
    p.expect_end()?;
    Ok(PermissionRule { principal, query, action })
}

/// `true` immediately followed by `:` means "no restriction" (spec §4.5);
/// any other continuation (`and`/`or`/...) is a real filter that happens to
/// start with the literal `true`.
fn is_bare_true_principal(p: &Parser) -> bool {
    p.at_kw("true") && matches!(p.peek_n(1).map(|t| t.to_surface_string()), Some(s) if s == ":")
}

fn parse_permission_function(p: &mut Parser) -> Result<PermissionFunction, ThingTalkError> {
    if p.at_kw("*") {
        p.bump();
        return Ok(PermissionFunction::Star);
    }
    if matches!(p.peek_terminal(), Some(TerminalKind::ClassStar)) {
        let kind = p.read_class_star_kind()?;
        return Ok(PermissionFunction::ClassStar(kind));
    }
    let (kind, channel) = p.read_function_ref()?;
    let filter = if p.at_kw("filter") {
        p.bump();
        Some(crate::actions::filter::parse_cnf(p)?)
    } else {
        None
    };
    Ok(PermissionFunction::Specific { kind, channel, filter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    fn function_ref(kind: &str, channel: &str) -> Token {
        Token::new(
            TerminalKind::FunctionRef,
            TerminalPayload::FunctionRef { kind: kind.to_string(), channel: channel.to_string() },
            None,
        )
    }

    fn class_star(kind: &str) -> Token {
        Token::new(
            TerminalKind::ClassStar,
            TerminalPayload::FunctionRef { kind: kind.to_string(), channel: "*".to_string() },
            None,
        )
    }

    #[test]
    fn bare_true_principal_is_none() {
        let tokens = [
            kw("policy"), kw("true"), kw(":"),
            kw("*"), kw("=>"), class_star("com.xkcd"),
        ];
        let mut p = Parser::new(&tokens);
        let rule = parse_permission_rule(&mut p).unwrap();
        assert!(rule.principal.is_none());
        assert!(matches!(rule.query, PermissionFunction::Star));
        assert!(matches!(rule.action, PermissionFunction::ClassStar(k) if k == "com.xkcd"));
    }

    #[test]
    fn specific_function_with_filter() {
        let tokens = [
            kw("policy"), kw("true"), kw(":"),
            function_ref("com.xkcd", "get_comic"), kw("filter"),
            Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name: "number".to_string(), ty: None }, None),
            kw(">="),
            kw("1"),
            kw("=>"), kw("*"),
        ];
        let mut p = Parser::new(&tokens);
        let rule = parse_permission_rule(&mut p).unwrap();
        match rule.query {
            PermissionFunction::Specific { filter: Some(_), .. } => {}
            other => panic!("expected a filtered specific function, got {other:?}"),
        }
    }
}
