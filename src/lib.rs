#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::print_stdout)]
#![deny(clippy::dbg_macro)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Scheduling and cancellation core for deferred, delayed, and periodic work.
//!
//! The crate targets execution environments with a constrained or cooperative
//! threading model: a host that offers real OS threads, one that offers only a
//! single dispatch queue, or one whose sole primitive is "set a timeout, get a
//! callback". Callers get three primitives — run now, run after a delay, run
//! repeatedly at a period — and every one of them returns a [`CancelHandle`]
//! that revokes the pending or recurring work.
//!
//! Layout follows the platform split:
//!
//! - [`crate::core`] holds the platform-neutral contracts and machinery:
//!   cancellation handles and slots, the serialization gate, the timer
//!   adapters, and the scheduler implementations, all expressed against the
//!   consumed platform contracts in [`crate::core::platform`].
//! - [`crate::std`] provides standard-library-backed platform services: a
//!   dedicated-thread timer service, a Tokio-backed timer service, thread
//!   and cooperative concurrency layers, and a single-threaded event loop
//!   usable as a dispatch context.

pub mod core;
pub mod std;

pub use crate::core::{
  cancel::{CancelHandle, Cancellable, MultiAssignCancel, SingleAssignCancel},
  error::ScheduleError,
  gate::SerialGate,
  platform::{
    ConcurrencyLayer, DispatchContext, DispatchContextProvider, RepeatingWork, Stopwatch, TimerId, TimerService,
    WorkItem,
  },
  scheduler::{
    DispatchScheduler, PeriodicScheduler, PeriodicSchedulerExt, ScheduledAction, Scheduler, SchedulerExt,
    TimeoutScheduler,
  },
  timer::{BusyLoopTimer, IntervalTimer, OneShotTimer},
};
