//! Per-stage step cursor.
//!
//! Pure transition function: bounds are clamped, never reported as errors.
//! 纯状态迁移：越界时钳制而不是报错。

use serde::{Deserialize, Serialize};

use crate::ids::StageId;
use crate::registry::StepTarget;

/// Position within one stage. `index < count` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCursor {
    stage_id: StageId,
    index: usize,
    count: usize,
}

impl StepCursor {
    /// Create a cursor at `index`, clamped into range. A zero `count` is
    /// treated as a single step.
    pub fn new(stage_id: StageId, index: usize, count: usize) -> Self {
        let count = count.max(1);
        Self {
            stage_id,
            index: index.min(count - 1),
            count,
        }
    }

    pub fn stage_id(&self) -> &StageId {
        &self.stage_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    pub fn with_index(&self, index: usize) -> Self {
        Self::new(self.stage_id.clone(), index, self.count)
    }
}

/// Commands accepted by the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCommand {
    Advance,
    Retreat,
    JumpTo(usize),
}

/// Stage-level context the stepper needs to decide on the terminal edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepContext<'a> {
    /// Cross-stage edge taken when advancing from the last step.
    pub next: Option<&'a StepTarget>,
    /// The edge exists but is locked (verification not yet succeeded).
    pub forward_locked: bool,
}

/// Result of applying a [`StepCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { from: usize, to: usize },
    Unchanged,
    /// Advance at the last step of a stage with a `next` edge.
    LeaveStage { target: StepTarget },
    /// Advance at the last step while the edge is gated.
    ForwardLocked,
}

pub struct StepperStateMachine;

impl StepperStateMachine {
    pub fn transition(
        cursor: StepCursor,
        command: StepCommand,
        ctx: StepContext<'_>,
    ) -> (StepCursor, StepOutcome) {
        let from = cursor.index();
        let next_cursor = match command {
            StepCommand::Advance if cursor.is_last() => {
                return match ctx.next {
                    Some(_) if ctx.forward_locked => (cursor, StepOutcome::ForwardLocked),
                    Some(target) => (
                        cursor,
                        StepOutcome::LeaveStage {
                            target: target.clone(),
                        },
                    ),
                    None => (cursor, StepOutcome::Unchanged),
                };
            }
            StepCommand::Advance => cursor.with_index(from + 1),
            StepCommand::Retreat => cursor.with_index(from.saturating_sub(1)),
            StepCommand::JumpTo(n) => cursor.with_index(n),
        };

        let to = next_cursor.index();
        if to == from {
            (next_cursor, StepOutcome::Unchanged)
        } else {
            (next_cursor, StepOutcome::Moved { from, to })
        }
    }
}
