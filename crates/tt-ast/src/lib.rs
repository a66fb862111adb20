//! The closed ThingTalk AST: values, filters, streams, tables, actions,
//! invocations, rules/commands, programs, permission rules, dialogue states
//! and bookkeeping (spec §3 AST).
//!
//! Every node category is a sum type with exhaustive matches downstream --
//! no inheritance, no runtime ADT library (spec §9).

pub mod action;
pub mod bookkeeping;
pub mod dialogue_state;
pub mod filter;
pub mod invocation;
pub mod permission;
pub mod program;
pub mod rule;
pub mod scope;
pub mod stream;
pub mod table;
pub mod types;
pub mod value;

pub use action::Action;
pub use bookkeeping::ControlCommand;
pub use dialogue_state::{ConfirmState, DialogueState, HistoryItem, ResultsAnnotation};
pub use filter::BooleanExpression;
pub use invocation::Invocation;
pub use permission::{PermissionFunction, PermissionRule};
pub use program::Program;
pub use rule::{Command, Rule, Statement};
pub use scope::Scope;
pub use stream::Stream;
pub use table::Table;
pub use types::{FunctionSignature, ThingTalkType};
pub use value::{AbsoluteDate, DateLiteral, EventValue, LocationValue, RecurrentTimeRule, TimeOfDay, Value};
