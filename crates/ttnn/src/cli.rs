//! The `ttnn-cli` subcommands (spec §2.9): `to-nn`, `from-nn`, `compat`.
//! Errors render through `ariadne`, spanning the offending token by
//! `ThingTalkError::source_index` against the sequence rejoined with
//! spaces; plain progress notes use `eprintln!` (no `log`/`tracing`
//! dependency anywhere in this workspace).

use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

use ariadne::{Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use semver::Version;

use tt_common::ThingTalkError;
use tt_entities::EntityBag;
use tt_entities::EntityValue;

use crate::api::{self, ParsedNn, ToNnOptions};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "ttnn", version, about = "ThingTalk NN surface syntax toolkit")]
pub struct Cli {
    /// Optional ttnn.toml supplying default flag values; CLI flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an NN sequence, then re-serialize it (spec §8 round-trip law).
    ToNn {
        /// Space-separated NN token sequence.
        sequence: String,
        /// JSON file mapping placeholder name -> entity value.
        #[arg(long)]
        entities: Option<PathBuf>,
        /// Sentence text for the sentence-entity retriever.
        #[arg(long)]
        sentence: Option<String>,
        #[arg(long)]
        allocate_entities: bool,
        #[arg(long)]
        explicit_strings: bool,
        #[arg(long)]
        type_annotations: bool,
    },
    /// Parse an NN sequence and print the resulting AST.
    FromNn {
        sequence: String,
        #[arg(long)]
        entities: Option<PathBuf>,
    },
    /// Rewrite an NN sequence for an older client (spec §4.8).
    Compat {
        sequence: String,
        /// The client version the output must remain ingestible by.
        #[arg(long)]
        target: String,
    },
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::ToNn { sequence, entities, sentence, allocate_entities, explicit_strings, type_annotations } => {
            let mut opts = config.to_nn_options();
            opts.allocate_entities |= allocate_entities;
            opts.explicit_strings |= explicit_strings;
            opts.type_annotations |= type_annotations;
            run_to_nn(&sequence, entities.as_deref(), sentence.as_deref(), opts)
        }
        Commands::FromNn { sequence, entities } => run_from_nn(&sequence, entities.as_deref()),
        Commands::Compat { sequence, target } => run_compat(&sequence, &target),
    }
}

fn load_entities(path: Option<&std::path::Path>) -> Result<EntityBag, String> {
    let Some(path) = path else { return Ok(EntityBag::new()) };
    let content = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let map: BTreeMap<String, EntityValue> =
        serde_json::from_str(&content).map_err(|e| format!("failed to parse entities JSON: {e}"))?;
    let mut bag = EntityBag::new();
    for (name, value) in map {
        bag.insert(name, value);
    }
    Ok(bag)
}

fn print_entities(bag: &EntityBag) {
    let map: BTreeMap<&String, &EntityValue> = bag.entries().collect();
    match serde_json::to_string_pretty(&map) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to render entities as JSON: {e}"),
    }
}

fn run_to_nn(sequence: &str, entities_path: Option<&std::path::Path>, sentence: Option<&str>, opts: ToNnOptions) -> i32 {
    let words = api::split_sequence(sequence);
    let mut entities = match load_entities(entities_path) {
        Ok(bag) => bag,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };

    let parsed = match api::from_nn(&words, &entities) {
        Ok(p) => p,
        Err(err) => return report_error(&err, &words),
    };
    let program = match parsed {
        ParsedNn::Program(program) => program,
        other => {
            eprintln!("error: `to-nn` only re-serializes programs, got {other:?}");
            return 1;
        }
    };

    let output = match api::to_nn(&program, sentence, &mut entities, opts) {
        Ok(tokens) => tokens,
        Err(err) => return report_error(&err, &words),
    };
    println!("{}", output.join(" "));
    print_entities(&entities);
    0
}

fn run_from_nn(sequence: &str, entities_path: Option<&std::path::Path>) -> i32 {
    let words = api::split_sequence(sequence);
    let entities = match load_entities(entities_path) {
        Ok(bag) => bag,
        Err(e) => {
            eprintln!("error: {e}");
            return 1;
        }
    };
    match api::from_nn(&words, &entities) {
        Ok(parsed) => {
            println!("{parsed:#?}");
            0
        }
        Err(err) => report_error(&err, &words),
    }
}

fn run_compat(sequence: &str, target: &str) -> i32 {
    let target = match Version::parse(target) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: invalid target version `{target}`: {e}");
            return 1;
        }
    };
    let mut words = api::split_sequence(sequence);
    api::apply_compatibility(&mut words, &target);
    println!("{}", words.join(" "));
    0
}

/// Byte span of token `index` in `words` once rejoined with single spaces,
/// used to point `ariadne` at the offending token.
fn token_span(words: &[String], index: usize) -> Range<usize> {
    let mut offset = 0;
    for word in &words[..index.min(words.len())] {
        offset += word.chars().count() + 1;
    }
    let len = words.get(index).map(|w| w.chars().count()).unwrap_or(1).max(1);
    offset..offset + len
}

fn report_error(err: &ThingTalkError, words: &[String]) -> i32 {
    let source = words.join(" ");
    match err.source_index() {
        Some(index) => {
            let span = token_span(words, index);
            let _ = Report::<Range<usize>>::build(ReportKind::Error, span.clone())
                .with_message(err.to_string())
                .with_label(Label::new(span).with_message(err.to_string()))
                .finish()
                .eprint(Source::from(source));
        }
        None => eprintln!("error: {err}"),
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_span_accounts_for_preceding_words() {
        let words = api::split_sequence("now => notify");
        assert_eq!(token_span(&words, 0), 0..3);
        assert_eq!(token_span(&words, 1), 4..6);
        assert_eq!(token_span(&words, 2), 7..13);
    }
}
