//! Boundary contracts for the platform services consumed by the schedulers.
//!
//! Everything here is specified at the contract boundary only; the crate
//! consumes these services and never reimplements them inside the core.
//! Standard-library-backed implementations live in [`crate::std`].

mod concurrency_layer;
mod dispatch_context;
mod stopwatch;
mod timer_service;
mod work_item;

pub use concurrency_layer::ConcurrencyLayer;
pub use dispatch_context::{DispatchContext, DispatchContextProvider};
pub use stopwatch::Stopwatch;
pub use timer_service::{TimerId, TimerService};
pub use work_item::{RepeatingWork, WorkItem};
