//! Concurrency layers and the monotonic stopwatch.

mod cooperative_concurrency_layer;
mod std_concurrency_layer;
mod std_stopwatch;

pub use cooperative_concurrency_layer::CooperativeConcurrencyLayer;
pub use std_concurrency_layer::StdConcurrencyLayer;
pub use std_stopwatch::StdStopwatch;
