//! Shared state threaded through every visitor (spec §4.5): the entity
//! retriever in use for this serialization and the output-shaping flags
//! carried in from the top-level API (spec §6.1).

use tt_ast::{Invocation, Scope, Value};
use tt_common::list::List;
use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;
use tt_entities::{EntityRetriever, EntityValue, FindEntityOpts, InlineTerm, RetrievedForm};

/// Output-shaping flags threaded from the top-level API. `allocate_entities`
/// only decides *which* retriever gets constructed -- that choice is made one
/// layer up, in `ttnn`, so it has no bearing on the visitors in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NnOptions {
    pub type_annotations: bool,
}

/// Threaded by value through every `*_to_nn` call.
pub struct NnContext<'a> {
    pub retriever: &'a mut dyn EntityRetriever,
    pub opts: NnOptions,
}

impl<'a> NnContext<'a> {
    pub fn new(retriever: &'a mut dyn EntityRetriever, opts: NnOptions) -> Self {
        Self { retriever, opts }
    }

    /// Look up `kind`/`value`, failing hard if no retrieval strategy
    /// succeeds -- the serializer has no fallback for a literal it cannot
    /// represent at all.
    pub fn emit_entity(
        &mut self,
        kind: &str,
        value: &EntityValue,
        source_index: Option<usize>,
    ) -> Result<List, ThingTalkError> {
        let form = self
            .retriever
            .find_entity(kind, value, FindEntityOpts::default())?
            .expect("find_entity with ignore_not_found = false always returns Some or Err");
        Ok(lower_retrieved_form(kind, value, form, source_index))
    }

    /// Look up `kind`/`value`, returning `None` rather than erroring when no
    /// strategy succeeds -- used by visitors that have a hand-written
    /// fallback spelling for the literal (spec §4.5 measure/currency rules).
    pub fn try_entity(
        &mut self,
        kind: &str,
        value: &EntityValue,
        source_index: Option<usize>,
    ) -> Result<Option<List>, ThingTalkError> {
        match self.retriever.find_entity(kind, value, FindEntityOpts { ignore_not_found: true })? {
            Some(form) => Ok(Some(lower_retrieved_form(kind, value, form, source_index))),
            None => Ok(None),
        }
    }
}

fn lower_retrieved_form(kind: &str, value: &EntityValue, form: RetrievedForm, source_index: Option<usize>) -> List {
    match form {
        RetrievedForm::Placeholder(name) => List::singleton(Token::new(
            terminal_kind_for(kind),
            TerminalPayload::Placeholder { name, value: value.clone() },
            source_index,
        )),
        RetrievedForm::Inline(terms) => {
            List::concat(terms.into_iter().map(|t| List::singleton(inline_term_to_token(t, source_index))))
        }
    }
}

fn inline_term_to_token(term: InlineTerm, source_index: Option<usize>) -> Token {
    match term {
        InlineTerm::Keyword(s) => Token::keyword(s, source_index),
        InlineTerm::Word(s) => Token::new(TerminalKind::Word, TerminalPayload::Literal(s), source_index),
        InlineTerm::EntityType(s) => {
            Token::new(TerminalKind::EntityTypeTag, TerminalPayload::Literal(format!("^^{s}")), source_index)
        }
    }
}

/// Map a placeholder kind string (`NUMBER`, `GENERIC_ENTITY_tt:device`, ...)
/// onto the closed `TerminalKind` family (spec §6.2) -- shared with
/// `tt-lexer` via `TerminalKind::from_placeholder_kind`.
pub fn terminal_kind_for(kind: &str) -> TerminalKind {
    TerminalKind::from_placeholder_kind(kind)
}

/// A handful of base units recognized well enough to pick `DURATION` /
/// `MEASURE_<unit>` over the `<NUMBER> unit:<unit>` fallback (spec §4.5).
/// The full Thingpedia unit registry is out of scope (spec §1 Non-goals);
/// this is a small, honestly partial stand-in.
const KNOWN_MEASURE_UNITS: &[&str] =
    &["C", "F", "m", "km", "mi", "kg", "lb", "mps", "kmph", "byte", "KB", "MB", "GB", "W", "kWh", "percent"];

pub fn is_known_measure_unit(unit: &str) -> bool {
    unit == "ms" || KNOWN_MEASURE_UNITS.contains(&unit)
}

/// A bare structural keyword/punctuation token with no source position --
/// used for tokens the compiler synthesizes rather than copies from input.
pub fn kw(s: &str) -> Token {
    Token::keyword(s, None)
}

/// A literal-payload token under a specific terminal kind, full spelling
/// carried verbatim (e.g. `unit:celsius`, `attribute:name`, `enum:off`).
pub fn literal_token(terminal: TerminalKind, spelling: impl Into<String>) -> Token {
    Token::new(terminal, TerminalPayload::Literal(spelling.into()), None)
}

/// `param:<name>[:<type>]` / `context:<name>:<type>`.
pub fn name_and_type_token(terminal: TerminalKind, name: impl Into<String>, ty: Option<String>) -> Token {
    Token::new(terminal, TerminalPayload::NameAndType { name: name.into(), ty }, None)
}

/// Whether `kind` equals the device id that would otherwise be redundantly
/// repeated as an `attribute:id` selector (spec §4.5 `action_to_nn`: "implicit
/// `id` omission when device id equals kind").
fn attribute_is_implicit_id(invocation: &Invocation, name: &str, value: &Value) -> bool {
    name == "id"
        && matches!(value, Value::String(s) if s == &invocation.kind || s == &format!("@{}", invocation.kind))
}

/// `@<kind>.<channel>` then sorted `attribute:` entries (with `all`/implicit
/// `id` handling), then sorted input parameters, param-passing parameters
/// last each prefixed `on` (spec §4.5 `action_to_nn`/invocation emission,
/// shared by table and stream joins too).
pub fn invocation_to_nn(invocation: &Invocation, scope: &Scope, ctx: &mut NnContext) -> Result<List, ThingTalkError> {
    let mut parts = vec![List::singleton(Token::new(
        TerminalKind::FunctionRef,
        TerminalPayload::FunctionRef { kind: invocation.kind.clone(), channel: invocation.channel.clone() },
        None,
    ))];

    let mut attributes: Vec<&(String, Value)> = invocation
        .attributes
        .iter()
        .filter(|(name, value)| !attribute_is_implicit_id(invocation, name, value))
        .collect();
    attributes.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in attributes {
        parts.push(List::singleton(literal_token(TerminalKind::Attribute, format!("attribute:{name}"))));
        parts.push(List::singleton(kw("=")));
        parts.push(crate::value_to_nn(value, scope, ctx)?);
    }

    let mut constants: Vec<&(String, Value)> =
        invocation.in_params.iter().filter(|(_, v)| !Invocation::is_param_passing(v)).collect();
    constants.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in constants {
        parts.push(invocation_param_name_token(invocation, name, ctx));
        parts.push(List::singleton(kw("=")));
        parts.push(crate::value_to_nn(value, scope, ctx)?);
    }

    let mut passed: Vec<&(String, Value)> =
        invocation.in_params.iter().filter(|(_, v)| Invocation::is_param_passing(v)).collect();
    passed.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, value) in passed {
        parts.push(List::singleton(kw("on")));
        parts.push(invocation_param_name_token(invocation, name, ctx));
        parts.push(List::singleton(kw("=")));
        parts.push(crate::value_to_nn(value, scope, ctx)?);
    }

    Ok(List::concat(parts))
}

/// `param:<name>[:<type>]`, the type looked up on the invocation's own
/// schema (not the enclosing lexical `Scope`, which only resolves `VarRef`
/// names) when `opts.type_annotations` is set.
fn invocation_param_name_token(invocation: &Invocation, name: &str, ctx: &NnContext) -> List {
    let ty = if ctx.opts.type_annotations {
        invocation.schema.as_ref().and_then(|s| s.arg_type(name)).map(|t| t.to_string())
    } else {
        None
    };
    List::singleton(name_and_type_token(TerminalKind::Param, name.to_string(), ty))
}

/// The legacy `External` subquery head: `@kind.channel ( param:p = v , ... )`,
/// `in_params` sorted lexicographically by name (spec §4.5 `cnf_filter_to_nn`).
/// Unlike a regular invocation this head always parenthesizes its parameter
/// list, even when empty, and never carries `attribute:` selectors -- the
/// legacy External form predates device attribute selection.
pub fn external_invocation_to_nn(
    kind: &str,
    channel: &str,
    in_params: &[(String, Value)],
    scope: &Scope,
    ctx: &mut NnContext,
) -> Result<List, ThingTalkError> {
    let mut parts = vec![
        List::singleton(Token::new(
            TerminalKind::FunctionRef,
            TerminalPayload::FunctionRef { kind: kind.to_string(), channel: channel.to_string() },
            None,
        )),
        List::singleton(kw("(")),
    ];
    let mut sorted: Vec<&(String, Value)> = in_params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    for (i, (name, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            parts.push(List::singleton(kw(",")));
        }
        let ty = if ctx.opts.type_annotations { scope.lookup(name).map(|t| t.to_string()) } else { None };
        parts.push(List::singleton(name_and_type_token(TerminalKind::Param, name.clone(), ty)));
        parts.push(List::singleton(kw("=")));
        parts.push(crate::value_to_nn(value, scope, ctx)?);
    }
    parts.push(List::singleton(kw(")")));
    Ok(List::concat(parts))
}
