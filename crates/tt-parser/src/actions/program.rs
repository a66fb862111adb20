//! `Program` parsing -- the inverse of `tt_nn::program::program_to_nn`
//! (spec §4.5/§4.7). The NN sublanguage carries exactly one statement; an
//! optional `executor = <value> :` prefix names the running principal.

use tt_ast::Program;
use tt_common::ThingTalkError;

use crate::driver::Parser;

pub fn parse_program(p: &mut Parser) -> Result<Program, ThingTalkError> {
    let mut executor = None;
    if p.at_kw("executor") {
        p.bump();
        p.eat_kw("=")?;
        executor = Some(crate::actions::value::parse_value(p)?);
        p.eat_kw(":")?;
    }
    let statement = crate::actions::rule::parse_statement(p)?;
    p.expect_end()?;
    Ok(Program { statements: vec![statement], executor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_ast::Statement;
    use tt_common::token::{TerminalKind, TerminalPayload, Token};

    fn kw(s: &str) -> Token {
        Token::keyword(s, None)
    }

    #[test]
    fn plain_command_program() {
        let tokens = [
            kw("now"), kw("=>"), kw("notify"),
        ];
        let mut p = Parser::new(&tokens);
        let program = parse_program(&mut p).unwrap();
        assert!(program.executor.is_none());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn executor_prefix_is_consumed() {
        let tokens = [
            kw("executor"), kw("="),
            Token::new(TerminalKind::QuotedString, TerminalPayload::Literal("\"\"".to_string()), None),
            kw(":"),
            kw("now"), kw("=>"), kw("notify"),
        ];
        let mut p = Parser::new(&tokens);
        let program = parse_program(&mut p).unwrap();
        assert!(matches!(program.executor, Some(_)));
        assert!(matches!(program.statements[0], Statement::Command(_)));
    }
}
