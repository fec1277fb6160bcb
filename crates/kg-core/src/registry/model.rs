//! Static registry data structures.
//!
//! Loaded once at startup and immutable afterwards.
//! 启动时加载一次，之后不可变。

use serde::{Deserialize, Serialize};

use crate::ids::{StageId, TreatmentId};
use crate::preview::Rgb;

pub const DEFAULT_VERIFICATION_WINDOW_MS: u64 = 2_500;
pub const DEFAULT_CONFIRMATION_NOTICE_MS: u64 = 1_200;
pub const DEFAULT_APPOINTMENT_ADVANCE_MS: u64 = 1_600;
pub const DEFAULT_SCAN_SETTLE_MS: u64 = 800;
pub const DEFAULT_SCAN_WINDOW_MS: u64 = 2_000;

/// Fixed timer durations. These model simulated work and are never
/// influenced by external conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "default_verification_window_ms")]
    pub verification_window_ms: u64,
    #[serde(default = "default_confirmation_notice_ms")]
    pub confirmation_notice_ms: u64,
    #[serde(default = "default_appointment_advance_ms")]
    pub appointment_advance_ms: u64,
    /// Pause between the camera going live and the scan starting.
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,
    #[serde(default = "default_scan_window_ms")]
    pub scan_window_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            verification_window_ms: DEFAULT_VERIFICATION_WINDOW_MS,
            confirmation_notice_ms: DEFAULT_CONFIRMATION_NOTICE_MS,
            appointment_advance_ms: DEFAULT_APPOINTMENT_ADVANCE_MS,
            scan_settle_ms: DEFAULT_SCAN_SETTLE_MS,
            scan_window_ms: DEFAULT_SCAN_WINDOW_MS,
        }
    }
}

fn default_verification_window_ms() -> u64 {
    DEFAULT_VERIFICATION_WINDOW_MS
}

fn default_confirmation_notice_ms() -> u64 {
    DEFAULT_CONFIRMATION_NOTICE_MS
}

fn default_appointment_advance_ms() -> u64 {
    DEFAULT_APPOINTMENT_ADVANCE_MS
}

fn default_scan_settle_ms() -> u64 {
    DEFAULT_SCAN_SETTLE_MS
}

fn default_scan_window_ms() -> u64 {
    DEFAULT_SCAN_WINDOW_MS
}

/// What happens to a stage's step cursor when the stage is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPolicy {
    /// Remember the index from the previous visit.
    #[default]
    Preserve,
    /// Start again from the first step.
    ResetOnEntry,
}

/// What the resource-bearing step runs once triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Two-phase scripted check, re-triggered by the user.
    #[default]
    Verification,
    /// One-shot scan that ends by revealing the treatment preview.
    Scan,
}

/// A `(stage, step)` destination for cross-stage edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTarget {
    pub stage: StageId,
    #[serde(default)]
    pub step: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub id: StageId,
    #[serde(default)]
    pub title: String,
    /// Ordered step ids; the stage's step count is `steps.len()`.
    pub steps: Vec<String>,
    #[serde(default)]
    pub cursor_policy: CursorPolicy,
    /// Index of the step that owns a camera session and a verification run
    /// or scan.
    #[serde(default)]
    pub resource_step: Option<usize>,
    #[serde(default)]
    pub resource_kind: ResourceKind,
    /// Refuse the cross-stage edge until verification has succeeded.
    #[serde(default)]
    pub gate_on_verification: bool,
    /// Where `advance` on the last step leads.
    #[serde(default)]
    pub next: Option<StepTarget>,
    /// Where a submitted appointment leads.
    #[serde(default)]
    pub appointment: Option<StepTarget>,
    #[serde(default)]
    pub hosts_preview: bool,
}

impl StageDefinition {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_resource_step(&self, index: usize) -> bool {
        self.resource_step == Some(index)
    }

    pub fn runs_verification(&self) -> bool {
        self.resource_step.is_some() && self.resource_kind == ResourceKind::Verification
    }

    pub fn runs_scan(&self) -> bool {
        self.resource_step.is_some() && self.resource_kind == ResourceKind::Scan
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentDefinition {
    pub id: TreatmentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub note: String,
    pub unprocessed: Rgb,
    #[serde(default)]
    pub processed: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRegistry {
    #[serde(default)]
    pub timings: Timings,
    pub initial_stage: StageId,
    pub stages: Vec<StageDefinition>,
    #[serde(default)]
    pub treatments: Vec<TreatmentDefinition>,
}
