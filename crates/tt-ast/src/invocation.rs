//! `Invocation` -- a single `@kind.channel(...)` call, shared by table,
//! action and permission-function AST nodes.

use crate::types::FunctionSignature;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub kind: String,
    pub channel: String,
    /// `attribute:name = value` entries (device selectors). Sorted
    /// lexicographically by name when serialized (spec §4.5).
    pub attributes: Vec<(String, Value)>,
    /// Constant and `VarRef`/`Event`-backed input parameters. Sorted
    /// lexicographically by name when serialized; param-passing parameters
    /// are emitted after constant ones, each prefixed by `on` (spec §4.5).
    pub in_params: Vec<(String, Value)>,
    pub schema: Option<FunctionSignature>,
}

impl Invocation {
    pub fn new(kind: impl Into<String>, channel: impl Into<String>) -> Self {
        Self { kind: kind.into(), channel: channel.into(), attributes: Vec::new(), in_params: Vec::new(), schema: None }
    }

    /// Whether a parameter's value is passed through from an enclosing
    /// stream/table (`VarRef` or `Event`) rather than being a constant.
    pub fn is_param_passing(value: &Value) -> bool {
        matches!(value, Value::VarRef { .. } | Value::Event(_))
    }
}
