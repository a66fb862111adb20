//! `ControlCommand` parsing -- the inverse of
//! `tt_nn::bookkeeping::bookkeeping_to_nn` (spec §4.5/§4.7): `bookkeeping
//! special special:<t>` | `bookkeeping choice <n>` | `bookkeeping answer
//! <value>`.

use tt_ast::ControlCommand;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_bookkeeping(p: &mut Parser) -> Result<ControlCommand, ThingTalkError> {
    p.eat_kw("bookkeeping")?;
    if p.at_kw("special") {
        p.bump();
        let name = p.read_special_literal()?;
        p.expect_end()?;
        return Ok(ControlCommand::Special(name));
    }
    if p.at_kw("choice") {
        p.bump();
        let n = p.parse_plain_integer_literal()?;
        p.expect_end()?;
        return Ok(ControlCommand::Choice(n));
    }
    if p.at_kw("answer") {
        p.bump();
        let value = crate::actions::value::parse_value(p)?;
        p.expect_end()?;
        return Ok(ControlCommand::Answer(value));
    }
    Err(p.unexpected("`special`, `choice`, or `answer` after `bookkeeping`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_common::token::{TerminalKind, TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    #[test]
    fn special_literal() {
        let tokens = [
            kw("bookkeeping"), kw("special"),
            Token::new(TerminalKind::Special, TerminalPayload::Literal("special:yes".to_string()), None),
        ];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_bookkeeping(&mut p).unwrap(), ControlCommand::Special("yes".to_string()));
    }

    #[test]
    fn choice_literal() {
        let tokens = [kw("bookkeeping"), kw("choice"), kw("1")];
        let mut p = Parser::new(&tokens);
        assert_eq!(parse_bookkeeping(&mut p).unwrap(), ControlCommand::Choice(1));
    }
}
