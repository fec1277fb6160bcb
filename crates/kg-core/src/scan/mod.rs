//! One-shot scan that reveals the treatment preview.
//!
//! Trigger opens the camera; once it is live the scan starts after a short
//! settle delay and runs for a fixed window, then the camera is stopped and
//! the preview revealed. Without a camera the preview is revealed at once
//! with a sample piece.
//! 扫描完成（或无相机时直接）显示釉色预览。

use serde::{Deserialize, Serialize};

use crate::error::Discarded;
use crate::ids::ArmingId;
use crate::transition::Transition;
use crate::verification::StatusKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Idle,
    OpeningCamera,
    Settling,
    Scanning,
    Complete,
}

/// The two fixed timers of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanTimer {
    Settle,
    Window,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRun {
    pub arming: ArmingId,
    pub phase: ScanPhase,
    /// Whether the last completion used the camera or the sample fallback.
    pub used_camera: bool,
}

impl ScanRun {
    pub fn armed(arming: ArmingId) -> Self {
        Self {
            arming,
            phase: ScanPhase::Idle,
            used_camera: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == ScanPhase::Complete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    Trigger { camera_live: bool },
    CameraSettled { arming: ArmingId, available: bool },
    TimerElapsed { arming: ArmingId, timer: ScanTimer },
    Reset { arming: ArmingId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    RequestCamera,
    StartTimer { arming: ArmingId, timer: ScanTimer },
    StopCamera,
    Status(StatusKind),
    RevealPreview,
}

pub type ScanTransition = Transition<ScanRun, ScanAction>;

pub struct ScanStateMachine;

impl ScanStateMachine {
    pub fn transition(run: ScanRun, event: ScanEvent) -> ScanTransition {
        use ScanAction as A;
        use ScanPhase as P;

        let settle = |run: ScanRun| {
            let arming = run.arming;
            ScanTransition::to(
                ScanRun {
                    phase: P::Settling,
                    ..run
                },
                vec![
                    A::Status(StatusKind::ScanHold),
                    A::StartTimer {
                        arming,
                        timer: ScanTimer::Settle,
                    },
                ],
            )
        };

        match (run.phase, event) {
            (_, ScanEvent::Reset { arming }) => ScanTransition::stay(ScanRun::armed(arming)),

            (P::Idle, ScanEvent::Trigger { camera_live: true }) => settle(run),
            (P::Idle, ScanEvent::Trigger { camera_live: false }) => ScanTransition::to(
                ScanRun {
                    phase: P::OpeningCamera,
                    ..run
                },
                vec![A::Status(StatusKind::OpeningCamera), A::RequestCamera],
            ),

            (P::OpeningCamera, ScanEvent::CameraSettled { arming, available })
                if arming == run.arming =>
            {
                if available {
                    settle(run)
                } else {
                    ScanTransition::to(
                        ScanRun {
                            phase: P::Complete,
                            used_camera: false,
                            ..run
                        },
                        vec![A::Status(StatusKind::SampleShown), A::RevealPreview],
                    )
                }
            }

            (
                P::Settling,
                ScanEvent::TimerElapsed {
                    arming,
                    timer: ScanTimer::Settle,
                },
            ) if arming == run.arming => ScanTransition::to(
                ScanRun {
                    phase: P::Scanning,
                    ..run
                },
                vec![
                    A::Status(StatusKind::Scanning),
                    A::StartTimer {
                        arming,
                        timer: ScanTimer::Window,
                    },
                ],
            ),

            (
                P::Scanning,
                ScanEvent::TimerElapsed {
                    arming,
                    timer: ScanTimer::Window,
                },
            ) if arming == run.arming => ScanTransition::to(
                ScanRun {
                    phase: P::Complete,
                    used_camera: true,
                    ..run
                },
                vec![
                    A::StopCamera,
                    A::Status(StatusKind::ScanComplete),
                    A::RevealPreview,
                ],
            ),

            (_, ScanEvent::Trigger { .. }) => {
                ScanTransition::discard(run, Discarded::ReentrantTrigger)
            }
            (_, ScanEvent::CameraSettled { .. } | ScanEvent::TimerElapsed { .. }) => {
                ScanTransition::discard(run, Discarded::StaleCompletion)
            }
        }
    }
}
