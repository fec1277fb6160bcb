use kg_core::WorkflowError;

/// Errors produced by the walkthrough orchestrator.
///
/// Only programming/configuration errors surface here. Camera denial, stale
/// completions and invalid toggles are handled inside the flow.
#[derive(Debug, thiserror::Error)]
pub enum WalkthroughError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
