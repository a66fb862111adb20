//! `Action` parsing -- the inverse of `tt_nn::action::action_to_nn` (spec
//! §4.5): the literal `notify`, or an invocation.

use tt_ast::Action;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_action(p: &mut Parser) -> Result<Action, ThingTalkError> {
    if p.at_kw("notify") {
        p.bump();
        return Ok(Action::Notify);
    }
    let inv = crate::actions::invocation::parse_invocation(p)?;
    Ok(Action::Invocation(inv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::Token;

    #[test]
    fn notify_is_literal() {
        let tokens = [Token::keyword("notify", None)];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_action(&mut p).unwrap(), Action::Notify);
    }
}
