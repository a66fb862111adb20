//! The NN token: the unit both the serializer emits and the lexer/parser
//! consume (spec §3, §6.2).

use serde::{Deserialize, Serialize};
use tt_entities::EntityValue;

/// Every kind of terminal the NN grammar recognizes. Closed per spec §6.2,
/// with one deliberate exception: `MeasureUnit` carries its base unit
/// (`MEASURE_ms`, `MEASURE_kg`, ...) as data rather than as one variant per
/// unit, since the set of units is open-ended (whatever Thingpedia schemas
/// declare) even though the *terminal family* is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminalKind {
    QuotedString,
    Number,
    Measure,
    MeasureUnit(String),
    Duration,
    Location,
    Date,
    Time,
    Currency,
    CurrencyCode,
    Picture,
    Username,
    Hashtag,
    Url,
    PhoneNumber,
    EmailAddress,
    PathName,
    GenericEntity,
    Slot,
    EntityTypeTag,
    Word,
    LiteralInteger,
    LiteralTime,
    FunctionRef,
    ClassStar,
    Enum,
    Param,
    Attribute,
    Unit,
    Device,
    Special,
    ContextRef,
    /// A structural keyword or punctuation token whose terminal and payload
    /// are the same literal spelling (`now`, `=>`, `monitor`, `(`, `,`, `==`, ...).
    Keyword(String),
    Eof,
}

impl TerminalKind {
    /// Map a placeholder kind string (`NUMBER`, `GENERIC_ENTITY_tt:device`,
    /// `MEASURE_kg`, ...) onto the closed `TerminalKind` family (spec §6.2).
    /// Shared by the NN compiler (emitting a placeholder) and the lexer
    /// (classifying one back) so the two directions never disagree.
    pub fn from_placeholder_kind(kind: &str) -> TerminalKind {
        match kind {
            "QUOTED_STRING" => TerminalKind::QuotedString,
            "NUMBER" => TerminalKind::Number,
            "MEASURE" => TerminalKind::Measure,
            "LOCATION" => TerminalKind::Location,
            "DATE" => TerminalKind::Date,
            "TIME" => TerminalKind::Time,
            "CURRENCY" => TerminalKind::Currency,
            "PICTURE" => TerminalKind::Picture,
            "USERNAME" => TerminalKind::Username,
            "HASHTAG" => TerminalKind::Hashtag,
            "URL" => TerminalKind::Url,
            "PHONE_NUMBER" => TerminalKind::PhoneNumber,
            "EMAIL_ADDRESS" => TerminalKind::EmailAddress,
            "PATH_NAME" => TerminalKind::PathName,
            "DURATION" => TerminalKind::Duration,
            "SLOT" => TerminalKind::Slot,
            k if k.starts_with("GENERIC_ENTITY") => TerminalKind::GenericEntity,
            k if k.starts_with("MEASURE_") => TerminalKind::MeasureUnit(k.trim_start_matches("MEASURE_").to_string()),
            _ => TerminalKind::GenericEntity,
        }
    }
}

/// The data a token carries, beyond its terminal kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminalPayload {
    /// A bare literal string -- a keyword spelling, a `WORD` piece inside a
    /// quoted string, an enum/device/special name, a context name.
    Literal(String),
    Integer(i64),
    /// A resolved entity placeholder: the surface spelling is `name`, the
    /// semantic value the parser/compiler actually consumes is `value`.
    Placeholder { name: String, value: EntityValue },
    /// `@kind.channel` / `@kind.*`.
    FunctionRef { kind: String, channel: String },
    /// `param:<name>[:type]` / `context:<name>:<type>`.
    NameAndType { name: String, ty: Option<String> },
    None,
}

/// A single NN token: `{ terminal, payload, source_index }` (spec §3).
///
/// `source_index` is the token's position in the flat `Vec<String>` the
/// lexer was constructed from -- used only for error reporting, never for
/// semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub terminal: TerminalKind,
    pub payload: TerminalPayload,
    pub source_index: Option<usize>,
}

impl Token {
    pub fn new(terminal: TerminalKind, payload: TerminalPayload, source_index: Option<usize>) -> Self {
        Self { terminal, payload, source_index }
    }

    /// A structural keyword/punctuation token: terminal and payload carry
    /// the same spelling.
    pub fn keyword(spelling: impl Into<String>, source_index: Option<usize>) -> Self {
        let s = spelling.into();
        Self {
            terminal: TerminalKind::Keyword(s.clone()),
            payload: TerminalPayload::Literal(s),
            source_index,
        }
    }

    /// Render this token back to its NN surface spelling. Used by the
    /// `flatten_into` consumer (`List::flatten_into`) to produce the final
    /// `Vec<String>`.
    pub fn to_surface_string(&self) -> String {
        match (&self.terminal, &self.payload) {
            (TerminalKind::Keyword(s), _) => s.clone(),
            (_, TerminalPayload::Literal(s)) => s.clone(),
            (_, TerminalPayload::Integer(n)) => n.to_string(),
            (TerminalKind::FunctionRef, TerminalPayload::FunctionRef { kind, channel }) => {
                format!("@{kind}.{channel}")
            }
            (TerminalKind::ClassStar, TerminalPayload::FunctionRef { kind, .. }) => format!("@{kind}.*"),
            (TerminalKind::Param, TerminalPayload::NameAndType { name, ty: Some(ty) }) => {
                format!("param:{name}:{ty}")
            }
            (TerminalKind::Param, TerminalPayload::NameAndType { name, ty: None }) => format!("param:{name}"),
            (TerminalKind::ContextRef, TerminalPayload::NameAndType { name, ty: Some(ty) }) => {
                format!("context:{name}:{ty}")
            }
            (_, TerminalPayload::Placeholder { name, .. }) => name.clone(),
            _ => String::new(),
        }
    }
}
