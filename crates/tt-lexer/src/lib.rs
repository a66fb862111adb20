//! The NN token-sequence lexer (spec §4.6): a single-pass pull iterator
//! that classifies each raw string token into a typed [`Token`], resolving
//! entity placeholders through an [`EntityResolver`].

pub mod resolver;

pub use resolver::{BagEntityResolver, EntityResolver};

use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;
use tt_entities::EntityValue;

/// Whether `s` is a run of ASCII digits (the lexer's "pure integer literal"
/// test, spec §4.6).
fn is_pure_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `time:H:M:S`.
fn parse_time_literal(s: &str) -> Option<(u8, u8, u8)> {
    let rest = s.strip_prefix("time:")?;
    let mut parts = rest.split(':');
    let h: u8 = parts.next()?.parse().ok()?;
    let m: u8 = parts.next()?.parse().ok()?;
    let sec: u8 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((h, m, sec))
}

/// `@kind.channel` / `@kind.*`.
fn parse_function_ref(s: &str) -> Option<(String, String)> {
    let rest = s.strip_prefix('@')?;
    let dot = rest.rfind('.')?;
    Some((rest[..dot].to_string(), rest[dot + 1..].to_string()))
}

/// `context:name:type`.
fn parse_context_ref(s: &str) -> Option<(String, String)> {
    let rest = s.strip_prefix("context:")?;
    let colon = rest.find(':')?;
    Some((rest[..colon].to_string(), rest[colon + 1..].to_string()))
}

/// `param:name[:type]`.
fn parse_param(s: &str) -> Option<(String, Option<String>)> {
    let rest = s.strip_prefix("param:")?;
    match rest.find(':') {
        Some(colon) => Some((rest[..colon].to_string(), Some(rest[colon + 1..].to_string()))),
        None => Some((rest.to_string(), None)),
    }
}

/// The single-pass pull iterator (spec §4.6). Not restartable -- callers
/// reconstruct it to re-lex (spec §5/§9).
pub struct Lexer<'a> {
    raw: &'a [String],
    pos: usize,
    resolver: &'a mut dyn EntityResolver,
    in_string: bool,
    last_param: Option<String>,
    last_function: Option<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(raw: &'a [String], resolver: &'a mut dyn EntityResolver) -> Self {
        Self { raw, pos: 0, resolver, in_string: false, last_param: None, last_function: None }
    }

    /// The raw token immediately after the one currently being classified,
    /// used only to peek a `unit:` suffix following an entity placeholder
    /// (spec §4.6: "the lexer peeks the *following* raw token").
    fn peek_unit(&self) -> Option<&str> {
        self.raw.get(self.pos + 1).and_then(|s| s.strip_prefix("unit:"))
    }

    fn classify(&mut self, idx: usize) -> Result<Token, ThingTalkError> {
        let raw = &self.raw[idx];

        if raw == "\"\"" && !self.in_string {
            return Ok(Token::new(TerminalKind::QuotedString, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }
        if raw == "\"" {
            self.in_string = !self.in_string;
            return Ok(Token::keyword("\"", Some(idx)));
        }
        if self.in_string {
            return Ok(Token::new(TerminalKind::Word, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if raw != "0" && raw != "1" && is_pure_integer(raw) {
            let n: i64 = raw.parse().map_err(|_| ThingTalkError::syntax(format!("malformed integer {raw}"), Some(idx)))?;
            return Ok(Token::new(TerminalKind::LiteralInteger, TerminalPayload::Integer(n), Some(idx)));
        }

        if let Some((h, m, s)) = parse_time_literal(raw) {
            let value = EntityValue::Time { hour: h, minute: m, second: s };
            return Ok(Token::new(
                TerminalKind::LiteralTime,
                TerminalPayload::Placeholder { name: raw.clone(), value },
                Some(idx),
            ));
        }

        if looks_like_placeholder(raw) {
            let kind = tt_entities::bag::placeholder_kind(raw)
                .ok_or_else(|| ThingTalkError::syntax(format!("malformed entity placeholder {raw}"), Some(idx)))?;
            let unit = self.peek_unit();
            let value = self
                .resolver
                .resolve(raw, self.last_param.as_deref(), self.last_function.as_deref(), unit)
                .map_err(|_| ThingTalkError::syntax(format!("invalid entity {raw}"), Some(idx)))?;
            return Ok(Token::new(
                TerminalKind::from_placeholder_kind(&kind),
                TerminalPayload::Placeholder { name: raw.clone(), value },
                Some(idx),
            ));
        }

        if let Some((kind, channel)) = parse_function_ref(raw) {
            self.last_function = Some(kind.clone());
            let terminal = if channel == "*" { TerminalKind::ClassStar } else { TerminalKind::FunctionRef };
            return Ok(Token::new(terminal, TerminalPayload::FunctionRef { kind, channel }, Some(idx)));
        }

        if raw.starts_with("enum:") {
            return Ok(Token::new(TerminalKind::Enum, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if let Some((name, ty)) = parse_param(raw) {
            self.last_param = Some(name.clone());
            return Ok(Token::new(TerminalKind::Param, TerminalPayload::NameAndType { name, ty }, Some(idx)));
        }

        if raw.starts_with("attribute:") {
            return Ok(Token::new(TerminalKind::Attribute, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if let Some(code) = raw.strip_prefix("unit:$") {
            return Ok(Token::new(
                TerminalKind::CurrencyCode,
                TerminalPayload::Literal(format!("unit:${code}")),
                Some(idx),
            ));
        }
        if raw.starts_with("unit:") {
            return Ok(Token::new(TerminalKind::Unit, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if raw.starts_with("device:") {
            return Ok(Token::new(TerminalKind::Device, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if raw.starts_with("special:") {
            return Ok(Token::new(TerminalKind::Special, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        if let Some((name, ty)) = parse_context_ref(raw) {
            return Ok(Token::new(
                TerminalKind::ContextRef,
                TerminalPayload::NameAndType { name, ty: Some(ty) },
                Some(idx),
            ));
        }

        if raw.starts_with("^^") {
            return Ok(Token::new(TerminalKind::EntityTypeTag, TerminalPayload::Literal(raw.clone()), Some(idx)));
        }

        Ok(Token::keyword(raw.clone(), Some(idx)))
    }
}

/// `/^[A-Z]+_/` -- an uppercase run followed by an underscore, the entity
/// placeholder shape (spec §4.6). Note this must be checked before the
/// `@`/`enum:`/`param:` prefix dispatch below: those prefixes never start
/// with an uppercase letter, so there's no ordering ambiguity in practice.
fn looks_like_placeholder(s: &str) -> bool {
    let upper_run_end = s.find('_').unwrap_or(0);
    upper_run_end > 0 && s[..upper_run_end].chars().all(|c| c.is_ascii_uppercase())
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, ThingTalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.raw.len() {
            return None;
        }
        let idx = self.pos;
        self.pos += 1;
        Some(self.classify(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_entities::EntityBag;

    fn lex_all(raw: &[&str]) -> Vec<Token> {
        let owned: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        let bag = EntityBag::new();
        let mut resolver = BagEntityResolver::new(&bag);
        let lexer = Lexer::new(&owned, &mut resolver);
        lexer.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn string_toggle_emits_word_tokens_inside() {
        let tokens = lex_all(&["\"", "hello", "world", "\""]);
        assert!(matches!(tokens[1].terminal, TerminalKind::Word));
        assert!(matches!(tokens[2].terminal, TerminalKind::Word));
    }

    #[test]
    fn zero_and_one_are_not_literal_integer() {
        let tokens = lex_all(&["0", "1", "2"]);
        assert!(matches!(tokens[0].terminal, TerminalKind::Keyword(_)));
        assert!(matches!(tokens[1].terminal, TerminalKind::Keyword(_)));
        assert!(matches!(tokens[2].terminal, TerminalKind::LiteralInteger));
    }

    #[test]
    fn time_literal_is_recognized() {
        let tokens = lex_all(&["time:14:30:0"]);
        assert!(matches!(tokens[0].terminal, TerminalKind::LiteralTime));
    }

    #[test]
    fn function_ref_records_last_function_and_class_star() {
        let tokens = lex_all(&["@com.xkcd.*"]);
        assert!(matches!(tokens[0].terminal, TerminalKind::ClassStar));
    }

    #[test]
    fn param_records_last_param_and_type() {
        let tokens = lex_all(&["param:status:String"]);
        match &tokens[0].payload {
            TerminalPayload::NameAndType { name, ty } => {
                assert_eq!(name, "status");
                assert_eq!(ty.as_deref(), Some("String"));
            }
            _ => panic!("expected NameAndType payload"),
        }
    }

    #[test]
    fn unknown_entity_placeholder_is_a_syntax_error() {
        let owned = vec!["NUMBER_0".to_string()];
        let bag = EntityBag::new();
        let mut resolver = BagEntityResolver::new(&bag);
        let mut lexer = Lexer::new(&owned, &mut resolver);
        assert!(lexer.next().unwrap().is_err());
    }

    #[test]
    fn empty_quoted_string_is_one_token_not_a_string_toggle() {
        let tokens = lex_all(&["\"\""]);
        assert!(matches!(tokens[0].terminal, TerminalKind::QuotedString));
        assert_eq!(tokens[0].to_surface_string(), "\"\"");
    }

    #[test]
    fn plain_keyword_passes_through_unchanged() {
        let tokens = lex_all(&["monitor", "(", ")", "=>", "notify"]);
        for (t, s) in tokens.iter().zip(["monitor", "(", ")", "=>", "notify"]) {
            assert_eq!(t.to_surface_string(), s);
        }
    }
}
