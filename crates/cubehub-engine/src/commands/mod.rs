//! Command orchestration over the core interfaces and the store

pub mod build;
pub mod engine_command;

pub use build::{BuildOutcome, CubeSnapshotBuilder};
pub use engine_command::{
    apply_engine_command, CubeSummary, EngineCommand, EngineCommandResult, EngineDeps,
};
