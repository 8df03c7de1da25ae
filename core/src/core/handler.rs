// mixline/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future every step handler resolves to.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>;

/// An async step handler.
///
/// Receives its own clone of the run's `ContextData<TData>`. Read what it
/// needs, drop the guard, await collaborators, then take a write guard to
/// store results.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;
