//! `Stream` -- event sources (spec §3/§4.5 `stream_to_nn`).

use crate::filter::BooleanExpression;
use crate::table::Table;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Stream {
    /// `monitor (table)`, optionally restricted to changes of specific
    /// output parameters (`on new param:x`).
    Monitor { table: Box<Table>, args: Option<Vec<String>> },
    /// `edge (stream) on <filter>`.
    Edge { stream: Box<Stream>, filter: BooleanExpression },
    /// `attimer time = <t>, ... [, expiration_date = <d>]`.
    AtTimer { times: Vec<Value>, expiration_date: Option<Value> },
    /// `timer base = <d>, interval = <d> [, frequency = <n>]`.
    Timer { base: Value, interval: Value, frequency: Option<Value> },
    Filter { stream: Box<Stream>, filter: BooleanExpression },
    /// `(lhs) => (rhs) [on param:p=v]*`, lexicographically sorted `in_params`.
    Join { lhs: Box<Stream>, rhs: Box<Table>, in_params: Vec<(String, Value)> },
}
