pub mod walkthrough;

pub use walkthrough::WalkthroughOrchestrator;
