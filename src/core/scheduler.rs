//! Public scheduling contracts and the scheduler implementations.

mod base;
mod dispatch_scheduler;
mod timeout_scheduler;

pub use base::{PeriodicScheduler, PeriodicSchedulerExt, ScheduledAction, Scheduler, SchedulerExt};
pub use dispatch_scheduler::DispatchScheduler;
pub use timeout_scheduler::{PERIODIC_FLOOR, TimeoutScheduler};
