//! # Signline World
//!
//! A small host for `signline-kernel`: named blocks in memory, the events a
//! handler runs for, and a JSON scenario runner that drives bindings against
//! them.
//!
//! The world can pose as an older host without the extended commit shape,
//! which is how the commit fallback is exercised end to end.

pub mod event;
pub mod scenario;
pub mod world;

pub use event::WorldEvent;
pub use scenario::{
    ExpectedChange, Scenario, ScenarioError, ScenarioReport, Step, StepOutcome, StepResult,
};
pub use world::{Block, BlockId, CommitStats, HostVersion, MemorySign, MemoryWorld};
