//! File-based walkthrough snapshot repository
//!
//! Persists the [`WorkflowSnapshot`] as a small JSON file in the application
//! data directory.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use kg_core::ports::SnapshotPort;
use kg_core::WorkflowSnapshot;

use crate::paths::DEFAULT_SNAPSHOT_FILE;

pub struct FileSnapshotRepository {
    snapshot_file_path: PathBuf,
}

impl FileSnapshotRepository {
    /// Create repository with custom file path
    pub fn new(snapshot_file_path: PathBuf) -> Self {
        Self { snapshot_file_path }
    }

    /// Create repository with defaults
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            snapshot_file_path: base_dir.join(DEFAULT_SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.snapshot_file_path
    }

    async fn ensure_parent_dir(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.snapshot_file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotPort for FileSnapshotRepository {
    async fn load(&self) -> anyhow::Result<Option<WorkflowSnapshot>> {
        if !self.snapshot_file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.snapshot_file_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to read snapshot file: {}",
                    self.snapshot_file_path.display()
                )
            })?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let snapshot: WorkflowSnapshot =
            serde_json::from_str(&content).context("Failed to parse walkthrough snapshot")?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &WorkflowSnapshot) -> anyhow::Result<()> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(snapshot)
            .context("Failed to serialize walkthrough snapshot")?;

        let mut file = fs::File::create(&self.snapshot_file_path)
            .await
            .context("Failed to create snapshot file")?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write snapshot file")?;
        file.sync_all()
            .await
            .context("Failed to sync snapshot file")?;

        debug!(path = %self.snapshot_file_path.display(), "walkthrough snapshot written");
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        if self.snapshot_file_path.exists() {
            fs::remove_file(&self.snapshot_file_path).await?;
        }
        Ok(())
    }
}
