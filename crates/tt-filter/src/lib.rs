//! CNF normalization for ThingTalk filter trees (spec §3 "Filter tree
//! normal form", §4.4).

pub mod normalize;
pub mod sort_key;

pub use normalize::{normalize, Cnf};
