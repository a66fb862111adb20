//! `ControlCommand` -- bookkeeping sentences (spec §3/§4.5 `bookkeeping_to_nn`).

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// `bookkeeping special special:<t>`.
    Special(String),
    /// `bookkeeping choice <n>`.
    Choice(i64),
    /// `bookkeeping answer <value>`.
    Answer(Value),
}
