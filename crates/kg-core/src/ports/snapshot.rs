//! Progress snapshot port
//!
//! Persists the [`WorkflowSnapshot`] key-value record. Implementations are
//! provided by the infrastructure layer (e.g. a JSON file).

use async_trait::async_trait;

use crate::snapshot::WorkflowSnapshot;

#[async_trait]
pub trait SnapshotPort: Send + Sync {
    /// Load the last snapshot, or `None` if nothing was saved yet.
    async fn load(&self) -> anyhow::Result<Option<WorkflowSnapshot>>;

    async fn save(&self, snapshot: &WorkflowSnapshot) -> anyhow::Result<()>;

    /// Forget saved progress.
    async fn clear(&self) -> anyhow::Result<()>;
}
