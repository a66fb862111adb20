//! `Invocation` parsing -- the inverse of `tt_nn::context::invocation_to_nn`
//! (spec §4.5/§4.7): `@kind.channel` then sorted `attribute:`, then sorted
//! constant `param:`, then sorted `on param:` entries, in that fixed order.

use tt_ast::Invocation;
use tt_common::token::TerminalKind;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_invocation(p: &mut Parser) -> Result<Invocation, ThingTalkError> {
    let (kind, channel) = p.read_function_ref()?;
    let mut inv = Invocation::new(kind, channel);

    while matches!(p.peek_terminal(), Some(TerminalKind::Attribute)) {
        let name = p.read_attribute_name()?;
        p.eat_kw("=")?;
        let value = crate::actions::value::parse_value(p)?;
        inv.attributes.push((name, value));
    }

    while matches!(p.peek_terminal(), Some(TerminalKind::Param)) {
        let (name, _ty) = p.read_param_name_and_type()?;
        p.eat_kw("=")?;
        let value = crate::actions::value::parse_value(p)?;
        inv.in_params.push((name, value));
    }

    while p.at_kw("on") {
        p.bump();
        let (name, _ty) = p.read_param_name_and_type()?;
        p.eat_kw("=")?;
        let value = crate::actions::value::parse_value(p)?;
        inv.in_params.push((name, value));
    }

    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_ast::Value;
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

    fn param(name: &str) -> Token {
        Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name: name.to_string(), ty: None }, None)
    }

    #[test]
    fn attributes_then_constants_then_passed_params() {
        let tokens = [
            function_ref("security-camera", "set_power"),
            Token::new(TerminalKind::Attribute, TerminalPayload::Literal("attribute:name".to_string()), None),
            kw("="),
            kw("1"),
            param("power"),
            kw("="),
            kw("true"),
            kw("on"),
            param("target"),
            kw("="),
            kw("1"),
        ];
        let mut p = Parser::new(&tokens);
        let inv = parse_invocation(&mut p).unwrap();
        assert_eq!(inv.kind, "security-camera");
        assert_eq!(inv.channel, "set_power");
        assert_eq!(inv.attributes, vec![("name".to_string(), Value::Number(1.0))]);
        assert_eq!(inv.in_params, vec![("power".to_string(), Value::Boolean(true)), ("target".to_string(), Value::Number(1.0))]);
    }
}
