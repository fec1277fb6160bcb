//! Shared transition result for the pure state machines.

use crate::error::Discarded;

/// Next state plus the side effects the orchestrator must perform.
///
/// `discarded` is set when the event was recognised but intentionally
/// ignored; `next` is then identical to the input state.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, A> {
    pub next: S,
    pub actions: Vec<A>,
    pub discarded: Option<Discarded>,
}

impl<S, A> Transition<S, A> {
    pub fn to(next: S, actions: Vec<A>) -> Self {
        Self {
            next,
            actions,
            discarded: None,
        }
    }

    pub fn stay(state: S) -> Self {
        Self::to(state, Vec::new())
    }

    pub fn discard(state: S, reason: Discarded) -> Self {
        Self {
            next: state,
            actions: Vec::new(),
            discarded: Some(reason),
        }
    }

    pub fn with_actions(mut self, actions: Vec<A>) -> Self {
        self.actions = actions;
        self
    }
}
