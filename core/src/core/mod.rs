// mixline/src/core/mod.rs

//! Building blocks shared by the step pipeline: the lockable context wrapper,
//! flow-control signals, step definitions and the handler type.

pub mod context_data;
pub mod control;
pub mod handler;
pub mod step;

pub use context_data::ContextData;
pub use control::{RunOutcome, StepControl};
pub use handler::Handler;
pub use step::StepDef;
