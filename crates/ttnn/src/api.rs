//! The top-level API (spec §6.1): `to_nn`, `from_nn`, `apply_compatibility`,
//! composing every crate below exactly as the System Overview's two
//! data-flow diagrams describe -- AST -> compiler -> lexer(reverse: never
//! used) / entity retriever -> flat tokens, and flat tokens -> lexer ->
//! parser -> AST.

use semver::Version;

use tt_ast::{ControlCommand, DialogueState, PermissionRule, Program, Scope};
use tt_common::token::Token;
use tt_common::ThingTalkError;
use tt_entities::bag::RetrievalBags;
use tt_entities::retriever::sentence::SentenceEntityRetriever;
use tt_entities::retriever::sequential::SequentialEntityAllocator;
use tt_entities::EntityBag;
use tt_lexer::{BagEntityResolver, Lexer};
use tt_nn::{NnContext, NnOptions as CompilerOptions};

/// Output-shaping flags for [`to_nn`] (spec §6.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct ToNnOptions {
    /// If true, `sentence` is ignored and `entities` is written with newly
    /// allocated placeholder names rather than matched against it.
    pub allocate_entities: bool,
    /// Use inline quoted-string tokens instead of placeholders, when
    /// `allocate_entities` is set (the sentence retriever already inlines
    /// sentence-verbatim literals regardless of this flag).
    pub explicit_strings: bool,
    /// Emit `param:<n>:<type>` rather than bare `param:<n>`.
    pub type_annotations: bool,
}

/// The four shapes a top-level NN sequence can parse into, distinguished by
/// leading keyword (spec §4.7/§4.5): `$dialogue`, `bookkeeping`, `policy`,
/// or (anything else) a `Program`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNn {
    Program(Program),
    Permission(PermissionRule),
    Dialogue(DialogueState),
    Bookkeeping(ControlCommand),
}

/// AST -> flat NN token sequence.
///
/// `sentence` is consulted by the sentence-entity retriever when
/// `opts.allocate_entities` is false; it is ignored (may be `None`) when
/// `opts.allocate_entities` is true, in which case `entities` is populated
/// with the freshly allocated placeholder names instead of being read.
pub fn to_nn(
    program: &Program,
    sentence: Option<&str>,
    entities: &mut EntityBag,
    opts: ToNnOptions,
) -> Result<Vec<String>, ThingTalkError> {
    let compiler_opts = CompilerOptions { type_annotations: opts.type_annotations };
    let tokens = if opts.allocate_entities {
        let mut retriever = SequentialEntityAllocator::new(std::mem::take(entities), opts.explicit_strings);
        let tokens = {
            let mut ctx = NnContext::new(&mut retriever, compiler_opts);
            tt_nn::program::program_to_nn(program, &mut ctx)?.flatten()
        };
        *entities = retriever.into_bag();
        tokens
    } else {
        let bags = RetrievalBags::new(std::mem::take(entities));
        let mut retriever = SentenceEntityRetriever::new(sentence.unwrap_or(""), bags);
        let mut ctx = NnContext::new(&mut retriever, compiler_opts);
        let tokens = tt_nn::program::program_to_nn(program, &mut ctx)?.flatten();
        let bags = retriever.into_bags();
        *entities = bags.available;
        tokens
    };
    Ok(tokens.iter().map(Token::to_surface_string).collect())
}

/// Flat NN token sequence -> AST, dispatching on the leading keyword (spec
/// §4.7). `sequence` may be pre-split (the common case) or, via
/// [`split_sequence`], a raw space-separated sentence.
pub fn from_nn(sequence: &[String], entities: &EntityBag) -> Result<ParsedNn, ThingTalkError> {
    let mut resolver = BagEntityResolver::new(entities);
    let lexer = Lexer::new(sequence, &mut resolver);
    let tokens: Vec<Token> = lexer.collect::<Result<_, _>>()?;
    let mut parser = tt_parser::Parser::new(&tokens);

    match sequence.first().map(String::as_str) {
        Some("$dialogue") => tt_parser::parse_dialogue_state(&mut parser).map(ParsedNn::Dialogue),
        Some("bookkeeping") => tt_parser::parse_bookkeeping(&mut parser).map(ParsedNn::Bookkeeping),
        Some("policy") => tt_parser::parse_permission_rule(&mut parser).map(ParsedNn::Permission),
        _ => tt_parser::parse_program(&mut parser).map(ParsedNn::Program),
    }
}

/// Splits a raw space-separated NN sentence into the token-string sequence
/// `from_nn` expects (spec §6.1: "accepts either a string (space-split) or
/// a pre-split sequence").
pub fn split_sequence(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_string).collect()
}

/// `Scope::root()` for callers (e.g. the CLI) that want to inspect the AST
/// without threading their own scope construction.
pub fn root_scope() -> Scope {
    Scope::root()
}

/// In-place, version-gated rewrite of a flat token sequence for an older
/// client (spec §4.8).
pub fn apply_compatibility(sequence: &mut Vec<String>, target: &Version) {
    tt_compat::apply_compatibility(sequence, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_ast::{Action, Command, Invocation, Statement};

    fn notify_program() -> Program {
        Program {
            statements: vec![Statement::Command(Command {
                table: Some(tt_ast::Table::Invocation(Invocation::new("com.xkcd", "get_comic"))),
                actions: vec![Action::Notify],
            })],
            executor: None,
        }
    }

    #[test]
    fn to_nn_then_from_nn_round_trips_a_plain_command() {
        let program = notify_program();
        let mut entities = EntityBag::new();
        let opts = ToNnOptions::default();
        let sequence = to_nn(&program, Some(""), &mut entities, opts).unwrap();
        assert_eq!(sequence, vec!["now", "=>", "@com.xkcd.get_comic", "=>", "notify"]);

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(parsed) => assert_eq!(parsed, program),
            other => panic!("expected a Program, got {other:?}"),
        }
    }

    #[test]
    fn split_sequence_splits_on_whitespace() {
        assert_eq!(split_sequence("now => notify"), vec!["now", "=>", "notify"]);
    }

    #[test]
    fn apply_compatibility_rewrites_in_place() {
        let mut sequence: Vec<String> =
            ["unit:defaultTemperature"].into_iter().map(str::to_string).collect();
        apply_compatibility(&mut sequence, &Version::parse("1.9.0").unwrap());
        assert_eq!(sequence, vec!["unit:F".to_string()]);
    }

    #[test]
    fn quoted_string_param_round_trips_through_the_bag() {
        use tt_entities::EntityValue;

        let mut invocation = Invocation::new("com.twitter", "post");
        invocation.in_params.push(("status".to_string(), tt_ast::Value::String("hello".to_string())));
        let program = Program {
            statements: vec![Statement::Command(Command {
                table: None,
                actions: vec![Action::Invocation(invocation)],
            })],
            executor: None,
        };

        let mut entities = EntityBag::new();
        entities.insert("QUOTED_STRING_0".to_string(), EntityValue::String("hello".to_string()));
        let sequence = to_nn(&program, Some(""), &mut entities, ToNnOptions::default()).unwrap();
        assert_eq!(
            sequence,
            vec!["now", "=>", "@com.twitter.post", "param:status", "=", "QUOTED_STRING_0"],
        );
        assert_eq!(entities.get("QUOTED_STRING_0"), Some(&EntityValue::String("hello".to_string())));

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(parsed) => assert_eq!(parsed, program),
            other => panic!("expected a Program, got {other:?}"),
        }
    }

    #[test]
    fn large_number_param_is_an_entity_not_a_small_integer() {
        use tt_entities::EntityValue;

        let mut invocation = Invocation::new("com.xkcd", "get_comic");
        invocation.in_params.push(("number".to_string(), tt_ast::Value::Number(1234.0)));
        let program = Program {
            statements: vec![Statement::Command(Command {
                table: Some(tt_ast::Table::Invocation(invocation)),
                actions: vec![Action::Notify],
            })],
            executor: None,
        };

        let mut entities = EntityBag::new();
        entities.insert("NUMBER_0".to_string(), EntityValue::Number(1234.0));
        let sequence = to_nn(&program, Some(""), &mut entities, ToNnOptions::default()).unwrap();
        assert_eq!(
            sequence,
            vec!["now", "=>", "@com.xkcd.get_comic", "param:number", "=", "NUMBER_0", "=>", "notify"],
        );

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(parsed) => assert_eq!(parsed, program),
            other => panic!("expected a Program, got {other:?}"),
        }
    }

    #[test]
    fn negative_large_number_prefers_the_positive_and_prefixed_form() {
        use tt_entities::EntityValue;

        let mut invocation = Invocation::new("com.xkcd", "get_comic");
        invocation.in_params.push(("number".to_string(), tt_ast::Value::Number(-1234.0)));
        let program = Program {
            statements: vec![Statement::Command(Command {
                table: Some(tt_ast::Table::Invocation(invocation)),
                actions: vec![Action::Notify],
            })],
            executor: None,
        };

        let mut entities = EntityBag::new();
        entities.insert("NUMBER_0".to_string(), EntityValue::Number(1234.0));
        let sequence = to_nn(&program, Some(""), &mut entities, ToNnOptions::default()).unwrap();
        assert_eq!(
            sequence,
            vec!["now", "=>", "@com.xkcd.get_comic", "param:number", "=", "-", "NUMBER_0", "=>", "notify"],
        );
        assert_eq!(entities.get("NUMBER_0"), Some(&EntityValue::Number(1234.0)));

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(parsed) => assert_eq!(parsed, program),
            other => panic!("expected a Program, got {other:?}"),
        }
    }

    #[test]
    fn date_param_round_trips_as_an_absolute_date_entity() {
        use tt_entities::EntityValue;
        use tt_entities::value::DateValue;

        let mut invocation = Invocation::new("org.thingpedia.weather", "sunrise");
        invocation.in_params.push((
            "date".to_string(),
            tt_ast::Value::Date(tt_ast::value::DateLiteral::Absolute(tt_ast::value::AbsoluteDate {
                year: 2018,
                month: 6,
                day: 23,
                time: None,
            })),
        ));
        let program = Program {
            statements: vec![Statement::Command(Command {
                table: Some(tt_ast::Table::Invocation(invocation)),
                actions: vec![Action::Notify],
            })],
            executor: None,
        };

        let mut entities = EntityBag::new();
        entities.insert(
            "DATE_0".to_string(),
            EntityValue::Date(DateValue::Fields { year: 2018, month: 6, day: 23, hour: None, minute: None, second: None }),
        );
        let sequence = to_nn(&program, Some(""), &mut entities, ToNnOptions::default()).unwrap();
        assert_eq!(
            sequence,
            vec!["now", "=>", "@org.thingpedia.weather.sunrise", "param:date", "=", "DATE_0", "=>", "notify"],
        );

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(parsed) => assert_eq!(parsed, program),
            other => panic!("expected a Program, got {other:?}"),
        }
    }

    #[test]
    fn table_slice_parses_base_and_limit() {
        let sequence: Vec<String> =
            ["(", "@com.gmail.inbox", ")", "[", "1", ":", "NUMBER_0", "]", "=>", "notify"]
                .into_iter()
                .map(str::to_string)
                .collect();
        let mut entities = EntityBag::new();
        entities.insert("NUMBER_0".to_string(), tt_entities::EntityValue::Number(15.0));

        match from_nn(&sequence, &entities).unwrap() {
            ParsedNn::Program(program) => {
                let table = match &program.statements[0] {
                    Statement::Command(cmd) => cmd.table.as_ref().expect("command has a table"),
                    other => panic!("expected a Command, got {other:?}"),
                };
                match table {
                    tt_ast::Table::Slice { table, base, limit } => {
                        assert!(matches!(**table, tt_ast::Table::Invocation(_)));
                        assert_eq!(*base, tt_ast::Value::Number(1.0));
                        assert_eq!(*limit, tt_ast::Value::Number(15.0));
                    }
                    other => panic!("expected a Slice table, got {other:?}"),
                }
            }
            other => panic!("expected a Program, got {other:?}"),
        }
    }
}
