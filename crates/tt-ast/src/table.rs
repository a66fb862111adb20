//! `Table` -- queries (spec §3/§4.5 `table_to_nn`).

use crate::filter::BooleanExpression;
use crate::invocation::Invocation;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Invocation(Invocation),
    Filter { table: Box<Table>, filter: BooleanExpression },
    /// `( table ) [ base : limit ]`.
    Slice { table: Box<Table>, base: Value, limit: Value },
    /// `( lhs ) =>|join ( rhs ) [on param:p=v]*`.
    Join { lhs: Box<Table>, rhs: Box<Table>, in_params: Vec<(String, Value)> },
    /// Projections are part of the legacy surface dialect and are
    /// unsynthesizable in the NN sublanguage except where the compiler
    /// chooses to flatten them away before serialization (spec §4.5
    /// failure semantics mentions "projections on streams in older
    /// dialects" explicitly).
    Projection { table: Box<Table>, args: Vec<String> },
    Aggregation { table: Box<Table>, field: String, operator: String },
}
