//! KilnGuide
//!
//! 陶艺引导流程：阶段/步骤导航、相机检查、釉色预览与预约。
//!
//! The walkthrough core lives in the `kg-*` crates; this crate only boots
//! it: configuration, tracing, and wiring adapters into a ready
//! [`kg_app::WalkthroughOrchestrator`].

pub mod bootstrap;
pub mod config;

pub use bootstrap::{init_tracing_subscriber, load_config, wire_headless, wire_walkthrough};
pub use config::AppConfig;
