//! Camera session state machine.
//!
//! A session owns at most one device handle. Acquisition is asynchronous, so
//! every request carries a [`CameraTicket`]; a settle event whose ticket does
//! not match the pending request is stale and its handle must be released
//! without ever being attached.

use serde::{Deserialize, Serialize};

use crate::error::{CameraError, Discarded};
use crate::ids::{CameraTicket, StageId};
use crate::transition::Transition;

/// Opaque handle to a live video capture stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraHandle {
    pub id: String,
}

impl CameraHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraState {
    Idle,
    Requesting { ticket: CameraTicket },
    Active { ticket: CameraTicket, handle: CameraHandle },
    Denied { error: CameraError },
    Stopped,
}

impl CameraState {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraState::Active { .. })
    }

    pub fn handle(&self) -> Option<&CameraHandle> {
        match self {
            CameraState::Active { handle, .. } => Some(handle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    Request { ticket: CameraTicket },
    Settled {
        ticket: CameraTicket,
        result: Result<CameraHandle, CameraError>,
    },
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraAction {
    /// Start the asynchronous device acquisition.
    Acquire { ticket: CameraTicket },
    /// Attach the handle to the live preview surface.
    Attach { handle: CameraHandle },
    /// Detach the live preview surface.
    Detach,
    /// Release the device handle.
    Release { handle: CameraHandle },
}

pub type CameraTransition = Transition<CameraState, CameraAction>;

/// A camera session bound to the stage that requested it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSession {
    pub owner: StageId,
    pub state: CameraState,
}

impl CameraSession {
    pub fn new(owner: StageId) -> Self {
        Self {
            owner,
            state: CameraState::Idle,
        }
    }
}

pub struct CameraStateMachine;

impl CameraStateMachine {
    pub fn transition(state: CameraState, event: CameraEvent) -> CameraTransition {
        match (state, event) {
            (
                CameraState::Idle | CameraState::Stopped | CameraState::Denied { .. },
                CameraEvent::Request { ticket },
            ) => CameraTransition::to(
                CameraState::Requesting { ticket },
                vec![CameraAction::Acquire { ticket }],
            ),
            // Already pending or live: the existing request stands.
            (state @ (CameraState::Requesting { .. } | CameraState::Active { .. }), CameraEvent::Request { .. }) => {
                CameraTransition::discard(state, Discarded::ReentrantTrigger)
            }

            (CameraState::Requesting { ticket: pending }, CameraEvent::Settled { ticket, result })
                if pending == ticket =>
            {
                match result {
                    Ok(handle) => CameraTransition::to(
                        CameraState::Active {
                            ticket,
                            handle: handle.clone(),
                        },
                        vec![CameraAction::Attach { handle }],
                    ),
                    Err(error) => CameraTransition::stay(CameraState::Denied { error }),
                }
            }
            (state, CameraEvent::Settled { result, .. }) => {
                let mut transition = CameraTransition::discard(state, Discarded::StaleCompletion);
                if let Ok(handle) = result {
                    transition.actions.push(CameraAction::Release { handle });
                }
                transition
            }

            (CameraState::Active { handle, .. }, CameraEvent::Stop) => CameraTransition::to(
                CameraState::Stopped,
                vec![CameraAction::Detach, CameraAction::Release { handle }],
            ),
            // The pending grant will arrive with a ticket nobody waits for.
            (CameraState::Requesting { .. } | CameraState::Denied { .. }, CameraEvent::Stop) => {
                CameraTransition::stay(CameraState::Stopped)
            }
            (state @ (CameraState::Idle | CameraState::Stopped), CameraEvent::Stop) => {
                CameraTransition::stay(state)
            }
        }
    }
}
