//! KilnGuide Application Orchestration Layer
//!
//! This crate drives the guided walkthrough: stage navigation, the step
//! cursor, camera lifecycle, the scripted verification pipeline, the
//! treatment preview and the appointment flow.

pub mod deps;
pub mod usecases;

pub use deps::WalkthroughDeps;
pub use usecases::walkthrough::{
    UserIntent, WalkthroughError, WalkthroughOrchestrator, WalkthroughView,
};
