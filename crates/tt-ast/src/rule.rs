//! `Rule`/`Command` -- top-level statements (spec §3/§4.5 `rule_to_nn`,
//! `command_to_nn`).

use crate::action::Action;
use crate::stream::Stream;
use crate::table::Table;

/// `rule: <stream> => <action>`. Multiple actions make a rule
/// unsynthesizable (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub stream: Stream,
    pub actions: Vec<Action>,
}

/// `command: now => [<table> =>] <action>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub table: Option<Table>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Rule(Rule),
    Command(Command),
}
