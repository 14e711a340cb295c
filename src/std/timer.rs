//! Timer services backed by OS threads or a Tokio runtime.

mod thread_timer_service;
mod tokio_timer_service;

pub use thread_timer_service::ThreadTimerService;
pub use tokio_timer_service::TokioTimerService;
