//! The token-stream parsing driver (spec §4.7 describes a table-driven
//! LR(1) shift-reduce loop over `PARSER_ACTION`/`GOTO`; this crate instead
//! walks the same grammar as a hand-written recursive-descent parser --
//! see the module doc on `lib.rs` for why). `Parser` owns the cursor into
//! the token slice and every primitive the `actions` modules build on:
//! lookahead, consumption, and the small per-shape readers for the
//! terminals that carry structured payloads (`param:`, `@kind.channel`,
//! `attribute:`, entity placeholders, ...).

use tt_common::token::{TerminalKind, TerminalPayload, Token};
use tt_common::ThingTalkError;
use tt_entities::EntityValue;

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    pub fn peek_terminal(&self) -> Option<&TerminalKind> {
        self.peek().map(|t| &t.terminal)
    }

    pub fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    pub fn at_kw(&self, s: &str) -> bool {
        matches!(self.peek_terminal(), Some(TerminalKind::Keyword(k)) if k == s)
    }

    pub fn eat_kw(&mut self, s: &str) -> Result<Token, ThingTalkError> {
        if self.at_kw(s) {
            Ok(self.bump().unwrap())
        } else {
            Err(self.unexpected(&format!("`{s}`")))
        }
    }

    pub fn expect_end(&self) -> Result<(), ThingTalkError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    pub fn unexpected(&self, expected: &str) -> ThingTalkError {
        match self.peek() {
            Some(t) => {
                ThingTalkError::syntax(format!("unexpected {}, expected {expected}", t.to_surface_string()), t.source_index)
            }
            None => ThingTalkError::syntax(format!("unexpected end of input, expected {expected}"), None),
        }
    }

    /// Any entity placeholder, regardless of which closed terminal kind
    /// dispatched to it -- the caller already knows the expected shape from
    /// the terminal it peeked, so this just extracts the carried value.
    pub fn read_placeholder_value(&mut self) -> Result<EntityValue, ThingTalkError> {
        match self.peek() {
            Some(Token { payload: TerminalPayload::Placeholder { value, .. }, .. }) => {
                let v = value.clone();
                self.bump();
                Ok(v)
            }
            _ => Err(self.unexpected("an entity placeholder")),
        }
    }

    pub fn read_function_ref(&mut self) -> Result<(String, String), ThingTalkError> {
        match self.peek() {
            Some(Token { terminal: TerminalKind::FunctionRef, payload: TerminalPayload::FunctionRef { kind, channel }, .. }) => {
                let (kind, channel) = (kind.clone(), channel.clone());
                self.bump();
                Ok((kind, channel))
            }
            _ => Err(self.unexpected("`@kind.channel`")),
        }
    }

    pub fn read_class_star_kind(&mut self) -> Result<String, ThingTalkError> {
        match self.peek() {
            Some(Token { terminal: TerminalKind::ClassStar, payload: TerminalPayload::FunctionRef { kind, .. }, .. }) => {
                let kind = kind.clone();
                self.bump();
                Ok(kind)
            }
            _ => Err(self.unexpected("`@kind.*`")),
        }
    }

    pub fn read_param_name_and_type(&mut self) -> Result<(String, Option<String>), ThingTalkError> {
        match self.peek() {
            Some(Token { terminal: TerminalKind::Param, payload: TerminalPayload::NameAndType { name, ty }, .. }) => {
                let (name, ty) = (name.clone(), ty.clone());
                self.bump();
                Ok((name, ty))
            }
            _ => Err(self.unexpected("`param:<name>`")),
        }
    }

    pub fn read_context_ref(&mut self) -> Result<(String, String), ThingTalkError> {
        match self.peek() {
            Some(Token { terminal: TerminalKind::ContextRef, payload: TerminalPayload::NameAndType { name, ty: Some(ty) }, .. }) => {
                let (name, ty) = (name.clone(), ty.clone());
                self.bump();
                Ok((name, ty))
            }
            _ => Err(self.unexpected("`context:<name>:<type>`")),
        }
    }

    fn read_prefixed_literal(&mut self, terminal_name: &str, matches_terminal: impl Fn(&TerminalKind) -> bool, prefix: &str) -> Result<String, ThingTalkError> {
        match self.peek() {
            Some(Token { terminal, payload: TerminalPayload::Literal(s), .. }) if matches_terminal(terminal) => {
                let rest = s.strip_prefix(prefix).unwrap_or(s).to_string();
                self.bump();
                Ok(rest)
            }
            _ => Err(self.unexpected(terminal_name)),
        }
    }

    pub fn read_attribute_name(&mut self) -> Result<String, ThingTalkError> {
        self.read_prefixed_literal("`attribute:<name>`", |t| matches!(t, TerminalKind::Attribute), "attribute:")
    }

    pub fn read_special_literal(&mut self) -> Result<String, ThingTalkError> {
        self.read_prefixed_literal("`special:<name>`", |t| matches!(t, TerminalKind::Special), "special:")
    }

    pub fn read_enum_name(&mut self) -> Result<String, ThingTalkError> {
        self.read_prefixed_literal("`enum:<name>`", |t| matches!(t, TerminalKind::Enum), "enum:")
    }

    pub fn read_unit_literal(&mut self) -> Result<String, ThingTalkError> {
        self.read_prefixed_literal("`unit:<u>`", |t| matches!(t, TerminalKind::Unit), "unit:")
    }

    pub fn read_currency_code_literal(&mut self) -> Result<String, ThingTalkError> {
        self.read_prefixed_literal("`unit:$<code>`", |t| matches!(t, TerminalKind::CurrencyCode), "unit:$")
    }

    /// Consumes an `EntityTypeTag` (`^^<type>`) if one is next, returning its
    /// bare type name. Used after an inline quoted wire form.
    pub fn try_read_entity_type_tag(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token { terminal: TerminalKind::EntityTypeTag, payload: TerminalPayload::Literal(s), .. }) => {
                let ty = s.strip_prefix("^^").unwrap_or(s).to_string();
                self.bump();
                Some(ty)
            }
            _ => None,
        }
    }

    /// `" <word> <word> ... "` -- the inline quoted-string wire form shared
    /// by `QUOTED_STRING`, `HASHTAG`, `USERNAME`, `LOCATION` and
    /// `GENERIC_ENTITY_*` sentence matches (spec §6.3). The opening `"` has
    /// already toggled the lexer's in-string mode, so every piece up to the
    /// closing `"` comes through as a `WORD` token.
    pub fn parse_quoted_text(&mut self) -> Result<String, ThingTalkError> {
        self.eat_kw("\"")?;
        let mut words = Vec::new();
        loop {
            match self.peek() {
                Some(Token { terminal: TerminalKind::Word, payload: TerminalPayload::Literal(s), .. }) => {
                    words.push(s.clone());
                    self.bump();
                }
                Some(t) if matches!(t.terminal, TerminalKind::Keyword(ref k) if k == "\"") => break,
                _ => return Err(self.unexpected("a word inside a quoted string")),
            }
        }
        self.eat_kw("\"")?;
        Ok(words.join(" "))
    }

    pub fn try_parse_plain_integer_literal(&mut self) -> Option<i64> {
        match self.peek_terminal() {
            Some(TerminalKind::Keyword(k)) if k == "0" => {
                self.bump();
                Some(0)
            }
            Some(TerminalKind::Keyword(k)) if k == "1" => {
                self.bump();
                Some(1)
            }
            Some(TerminalKind::LiteralInteger) => {
                let t = self.bump().unwrap();
                match t.payload {
                    TerminalPayload::Integer(n) => Some(n),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn parse_plain_integer_literal(&mut self) -> Result<i64, ThingTalkError> {
        self.try_parse_plain_integer_literal().ok_or_else(|| self.unexpected("an integer literal"))
    }
}
