//! The AST -> NN-token compiler (spec §4.5): one visitor per AST category,
//! composed by the four top-level entry points (`program`, `permission_rule`,
//! `dialogue_state`, `bookkeeping`) that `ttnn::to_nn` drives.

pub mod action;
pub mod bookkeeping;
pub mod context;
pub mod dialogue_state;
pub mod filter;
pub mod permission;
pub mod program;
pub mod rule;
pub mod stream;
pub mod table;
pub mod value;

pub use context::{NnContext, NnOptions};
pub use value::value_to_nn;
