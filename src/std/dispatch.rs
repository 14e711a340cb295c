//! Dispatch contexts for standard environments.

mod event_loop_context;

pub use event_loop_context::EventLoopContext;
