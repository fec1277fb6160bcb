//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value calculation / 禁止默认值计算**

use std::path::PathBuf;

use kg_infra::paths::{DEFAULT_LOG_DIR, DEFAULT_SNAPSHOT_FILE};

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Workflow registry TOML. Empty means the built-in pottery walkthrough.
    /// 流程注册表路径，为空表示使用内置流程
    pub registry_path: PathBuf,

    /// Progress snapshot file (path info only, no existence check)
    pub snapshot_path: PathBuf,

    pub log_dir: PathBuf,

    /// `EnvFilter` directive, e.g. `info` or `kg_app=debug`. Empty = build default.
    pub log_level: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Missing keys map to empty values; they are facts, not errors.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            registry_path: PathBuf::from(str_at("workflow", "registry_path")),
            snapshot_path: PathBuf::from(str_at("storage", "snapshot_path")),
            log_dir: PathBuf::from(str_at("logging", "dir")),
            log_level: str_at("logging", "level"),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            registry_path: PathBuf::new(),
            snapshot_path: PathBuf::new(),
            log_dir: PathBuf::new(),
            log_level: String::new(),
        }
    }

    /// Create AppConfig with system-default paths for production use
    /// 生产环境使用：创建具有系统默认路径的 AppConfig
    ///
    /// `data_dir` is computed by the caller (see `kg_infra::paths::default_data_dir`).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            registry_path: PathBuf::new(),
            snapshot_path: data_dir.join(DEFAULT_SNAPSHOT_FILE),
            log_dir: data_dir.join(DEFAULT_LOG_DIR),
            log_level: String::new(),
        }
    }
}
