//! The top-level ThingTalk NN API (spec §6.1): composes `tt-ast` through
//! `tt-compat` into the three entry points every other crate in this
//! workspace exists to serve -- `to_nn`, `from_nn`, `apply_compatibility` --
//! plus the `ttnn-cli` binary that wraps them behind `clap`.

pub mod api;
pub mod cli;
pub mod config;

pub use api::{apply_compatibility, from_nn, root_scope, split_sequence, to_nn, ParsedNn, ToNnOptions};
