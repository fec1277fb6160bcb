//! Two-phase scripted verification run.
//!
//! The outcome never depends on camera content: within one arming the first
//! completed window always reports issues and every later one succeeds.
//! 第一次扫描总是报告问题，第二次总是成功。结果与相机画面无关。

mod status;

use serde::{Deserialize, Serialize};

pub use status::StatusKind;

use crate::error::Discarded;
use crate::ids::ArmingId;
use crate::transition::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    Idle,
    RequestingCamera,
    AwaitingTrigger,
    Running,
    IssuesFound,
    Succeeded,
}

/// One verification run. Phases only move forward within an arming; a new
/// arming (via [`VerificationEvent::Reset`]) starts again from `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRun {
    pub arming: ArmingId,
    pub phase: VerificationPhase,
    /// Number of the current (or last completed) running window; 0 before the first.
    pub attempt: u32,
}

impl VerificationRun {
    pub fn armed(arming: ArmingId) -> Self {
        Self {
            arming,
            phase: VerificationPhase::Idle,
            attempt: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == VerificationPhase::Running
    }

    pub fn has_succeeded(&self) -> bool {
        self.phase == VerificationPhase::Succeeded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEvent {
    /// User pressed the check/scan control.
    Trigger { camera_live: bool },
    /// Camera acquisition settled, granted or not.
    CameraSettled { arming: ArmingId, available: bool },
    /// The fixed analysis window finished.
    WindowElapsed { arming: ArmingId, attempt: u32 },
    /// Discard everything and re-arm with a fresh token.
    Reset { arming: ArmingId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationAction {
    RequestCamera,
    StartWindow { arming: ArmingId, attempt: u32 },
    StopCamera,
    Status(StatusKind),
    NotifySuccess,
    UnlockForward,
}

pub type VerificationTransition = Transition<VerificationRun, VerificationAction>;

pub struct VerificationStateMachine;

impl VerificationStateMachine {
    pub fn transition(run: VerificationRun, event: VerificationEvent) -> VerificationTransition {
        use VerificationAction as A;
        use VerificationPhase as P;

        match (run.phase, event) {
            (_, VerificationEvent::Reset { arming }) => {
                VerificationTransition::stay(VerificationRun::armed(arming))
            }

            (P::Idle, VerificationEvent::Trigger { camera_live: false }) => {
                VerificationTransition::to(
                    VerificationRun {
                        phase: P::RequestingCamera,
                        ..run
                    },
                    vec![A::Status(StatusKind::OpeningCamera), A::RequestCamera],
                )
            }
            (P::Idle, VerificationEvent::Trigger { camera_live: true }) => {
                VerificationTransition::to(
                    VerificationRun {
                        phase: P::AwaitingTrigger,
                        ..run
                    },
                    vec![A::Status(StatusKind::CameraReady)],
                )
            }

            (P::RequestingCamera, VerificationEvent::CameraSettled { arming, available })
                if arming == run.arming =>
            {
                let status = if available {
                    StatusKind::CameraReady
                } else {
                    StatusKind::CameraUnavailable
                };
                VerificationTransition::to(
                    VerificationRun {
                        phase: P::AwaitingTrigger,
                        ..run
                    },
                    vec![A::Status(status)],
                )
            }

            (P::AwaitingTrigger | P::IssuesFound, VerificationEvent::Trigger { .. }) => {
                let attempt = run.attempt + 1;
                let arming = run.arming;
                VerificationTransition::to(
                    VerificationRun {
                        phase: P::Running,
                        attempt,
                        arming,
                    },
                    vec![
                        A::Status(StatusKind::Scanning),
                        A::StartWindow { arming, attempt },
                    ],
                )
            }

            (P::Running, VerificationEvent::WindowElapsed { arming, attempt })
                if arming == run.arming && attempt == run.attempt =>
            {
                if attempt <= 1 {
                    VerificationTransition::to(
                        VerificationRun {
                            phase: P::IssuesFound,
                            ..run
                        },
                        vec![A::Status(StatusKind::IssuesFound)],
                    )
                } else {
                    VerificationTransition::to(
                        VerificationRun {
                            phase: P::Succeeded,
                            ..run
                        },
                        vec![
                            A::StopCamera,
                            A::Status(StatusKind::Succeeded),
                            A::NotifySuccess,
                            A::UnlockForward,
                        ],
                    )
                }
            }

            (
                P::RequestingCamera | P::Running | P::Succeeded,
                VerificationEvent::Trigger { .. },
            ) => VerificationTransition::discard(run, Discarded::ReentrantTrigger),

            (
                _,
                VerificationEvent::CameraSettled { .. } | VerificationEvent::WindowElapsed { .. },
            ) => VerificationTransition::discard(run, Discarded::StaleCompletion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_through(run: VerificationRun, events: &[VerificationEvent]) -> VerificationRun {
        events.iter().fold(run, |run, event| {
            VerificationStateMachine::transition(run, *event).next
        })
    }

    fn trigger(camera_live: bool) -> VerificationEvent {
        VerificationEvent::Trigger { camera_live }
    }

    #[test]
    fn first_window_reports_issues_second_succeeds() {
        let arming = ArmingId(3);
        let run = run_through(
            VerificationRun::armed(arming),
            &[
                trigger(false),
                VerificationEvent::CameraSettled {
                    arming,
                    available: false,
                },
                trigger(false),
            ],
        );
        assert_eq!(run.phase, VerificationPhase::Running);
        assert_eq!(run.attempt, 1);

        let t = VerificationStateMachine::transition(
            run,
            VerificationEvent::WindowElapsed { arming, attempt: 1 },
        );
        assert_eq!(t.next.phase, VerificationPhase::IssuesFound);
        assert_eq!(
            t.actions,
            vec![VerificationAction::Status(StatusKind::IssuesFound)]
        );

        let run = VerificationStateMachine::transition(t.next, trigger(false)).next;
        assert_eq!(run.attempt, 2);
        let t = VerificationStateMachine::transition(
            run,
            VerificationEvent::WindowElapsed { arming, attempt: 2 },
        );
        assert!(t.next.has_succeeded());
        assert_eq!(
            t.actions,
            vec![
                VerificationAction::StopCamera,
                VerificationAction::Status(StatusKind::Succeeded),
                VerificationAction::NotifySuccess,
                VerificationAction::UnlockForward,
            ]
        );
    }

    #[test]
    fn trigger_with_live_camera_skips_acquisition() {
        let t = VerificationStateMachine::transition(VerificationRun::armed(ArmingId(1)), trigger(true));
        assert_eq!(t.next.phase, VerificationPhase::AwaitingTrigger);
        assert!(!t.actions.contains(&VerificationAction::RequestCamera));
    }

    #[test]
    fn denied_camera_still_reaches_awaiting_trigger() {
        let arming = ArmingId(1);
        let run = VerificationStateMachine::transition(VerificationRun::armed(arming), trigger(false)).next;
        let t = VerificationStateMachine::transition(
            run,
            VerificationEvent::CameraSettled {
                arming,
                available: false,
            },
        );
        assert_eq!(t.next.phase, VerificationPhase::AwaitingTrigger);
        assert_eq!(
            t.actions,
            vec![VerificationAction::Status(StatusKind::CameraUnavailable)]
        );
    }

    #[test]
    fn reentrant_trigger_while_running_is_discarded() {
        let arming = ArmingId(1);
        let run = VerificationRun {
            arming,
            phase: VerificationPhase::Running,
            attempt: 1,
        };
        let t = VerificationStateMachine::transition(run.clone(), trigger(true));
        assert_eq!(t.discarded, Some(Discarded::ReentrantTrigger));
        assert_eq!(t.next, run);
        assert!(t.actions.is_empty());
    }

    #[test]
    fn window_from_previous_arming_is_stale() {
        let run = VerificationRun {
            arming: ArmingId(2),
            phase: VerificationPhase::Running,
            attempt: 1,
        };
        let t = VerificationStateMachine::transition(
            run.clone(),
            VerificationEvent::WindowElapsed {
                arming: ArmingId(1),
                attempt: 1,
            },
        );
        assert_eq!(t.discarded, Some(Discarded::StaleCompletion));
        assert_eq!(t.next, run);
    }

    #[test]
    fn reset_returns_to_idle_with_new_arming() {
        let run = VerificationRun {
            arming: ArmingId(2),
            phase: VerificationPhase::IssuesFound,
            attempt: 1,
        };
        let t = VerificationStateMachine::transition(
            run,
            VerificationEvent::Reset {
                arming: ArmingId(3),
            },
        );
        assert_eq!(t.next, VerificationRun::armed(ArmingId(3)));
    }

    #[test]
    fn fresh_arming_reports_issues_again() {
        let arming = ArmingId(9);
        let run = run_through(
            VerificationRun::armed(arming),
            &[trigger(true), trigger(true)],
        );
        let t = VerificationStateMachine::transition(
            run,
            VerificationEvent::WindowElapsed { arming, attempt: 1 },
        );
        assert_eq!(t.next.phase, VerificationPhase::IssuesFound);
    }
}
