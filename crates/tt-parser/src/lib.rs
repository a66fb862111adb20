//! `Vec<String>` -> AST, the inverse of `tt-nn` (spec §4.7).
//!
//! Spec §3/§4.7 describe the parser as a table-driven LR(1) shift-reduce
//! loop over `TERMINAL_IDS`/`GOTO`/`PARSER_ACTION`/`SEMANTIC_ACTION`. This
//! crate instead hand-writes the same grammar as a recursive-descent
//! parser: every other parser in this ecosystem is written this way, and
//! the NN grammar has no ambiguity an LR(1) table buys anything for --
//! every production is
//! resolved by one token of lookahead at worst (the `Table`/`Action`
//! invocation overlap in `actions::rule`, the object-vs-recurrent-time-spec
//! brace in `actions::value`). Generating a real canonical LR(1) table pair
//! for this grammar would mean carrying a table generator nowhere else in
//! this workspace has a use for, just to re-derive, by construction, the
//! same recursive structure a human reading the grammar writes directly.
//! `driver.rs` owns the cursor and shared terminal readers; `actions/`
//! mirrors `tt-ast`'s module split, one parser per AST category, each the
//! inverse of its `tt-nn` counterpart.
//!
//! The four shapes a top-level NN sequence can take are distinguished by
//! their leading keyword: `$dialogue` (a [`DialogueState`]), `bookkeeping`
//! (a [`ControlCommand`]), `policy` (a [`PermissionRule`]), anything else
//! (a [`Program`]).

pub mod actions;
pub mod driver;

use tt_ast::{ControlCommand, DialogueState, PermissionRule, Program};
use tt_common::ThingTalkError;

pub use driver::Parser;

pub fn parse_program(p: &mut Parser) -> Result<Program, ThingTalkError> {
    actions::program::parse_program(p)
}

pub fn parse_permission_rule(p: &mut Parser) -> Result<PermissionRule, ThingTalkError> {
    actions::permission::parse_permission_rule(p)
}

pub fn parse_dialogue_state(p: &mut Parser) -> Result<DialogueState, ThingTalkError> {
    actions::dialogue_state::parse_dialogue_state(p)
}

pub fn parse_bookkeeping(p: &mut Parser) -> Result<ControlCommand, ThingTalkError> {
    actions::bookkeeping::parse_bookkeeping(p)
}
