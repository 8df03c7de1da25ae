// mixline/src/pipeline/mod.rs

//! The named-step pipeline: construction, hook registration and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::{Phase, Pipeline};
