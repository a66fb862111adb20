//! `Action` -- the terminal effect of a rule/command (spec §3/§4.5 `action_to_nn`).

use crate::invocation::Invocation;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The literal `notify` action.
    Notify,
    Invocation(Invocation),
}
