//! Key-value snapshot of walkthrough progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::StageId;

/// Active stage plus the remembered cursor index of every visited stage.
///
/// Camera and verification state are deliberately absent: they never
/// survive a stage exit, let alone a restart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub active_stage: Option<StageId>,
    #[serde(default)]
    pub cursors: BTreeMap<StageId, usize>,
}
