//! Workflow registry loading.
//!
//! The registry is read once at startup and immutable thereafter.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use kg_core::WorkflowRegistry;

const DEFAULT_REGISTRY: &str = include_str!("../../assets/default_registry.toml");

/// Load and validate a registry from a TOML file.
pub fn load_registry(path: &Path) -> anyhow::Result<WorkflowRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry file: {}", path.display()))?;
    let registry = WorkflowRegistry::from_toml_str(&content)
        .with_context(|| format!("Invalid registry file: {}", path.display()))?;
    info!(path = %path.display(), stages = registry.stages.len(), "workflow registry loaded");
    Ok(registry)
}

/// The built-in pottery walkthrough.
pub fn default_registry() -> anyhow::Result<WorkflowRegistry> {
    WorkflowRegistry::from_toml_str(DEFAULT_REGISTRY).context("Built-in registry is invalid")
}
