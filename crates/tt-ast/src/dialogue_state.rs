//! `DialogueState` -- the `$dialogue @policy.act ; <history-item> ; ...`
//! top-level shape (spec §3/§4.5 `dialogue_state_to_nn`).

use crate::rule::Statement;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmState {
    Accepted,
    Proposed,
    Confirmed,
}

/// Inline `#[ results = [...] ] [#[ count = N ]] [#[ more = true ]] [#[
/// error = ... ]]` annotation on a history item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsAnnotation {
    pub results: Vec<Vec<(String, Value)>>,
    pub count: Option<i64>,
    pub more: bool,
    pub error: Option<Value>,
}

/// One executed statement in the dialogue history, with its confirmation
/// state and (once executed) its results.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub statement: Statement,
    pub confirm: ConfirmState,
    pub results: Option<ResultsAnnotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueState {
    pub policy: String,
    pub act: String,
    pub args: Vec<(String, Value)>,
    pub history: Vec<HistoryItem>,
}
