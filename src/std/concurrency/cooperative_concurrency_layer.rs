//! Concurrency layer for cooperative, thread-less platforms.


use core::time::Duration;
use std::{sync::Arc, thread};

use tracing::{event, Level};

use crate::{
  core::{
    cancel::CancelHandle,
    error::ScheduleError,
    platform::{ConcurrencyLayer, DispatchContext, Stopwatch, WorkItem},
  },
  std::concurrency::StdStopwatch,
};

const TARGET: &str = "cadence::std::concurrency";

/// Concurrency layer for platforms without dedicated execution units.
///
/// Pool work is marshaled onto the dispatch context instead of a thread, so
/// it shares the context's single-threaded ordering. Long-running work is
/// refused outright; a busy loop would starve the context forever.
pub struct CooperativeConcurrencyLayer {
  context: Arc<dyn DispatchContext>,
}

impl CooperativeConcurrencyLayer {
  /// Creates a layer posting all pool work to `context`.
  pub fn new(context: Arc<dyn DispatchContext>) -> Self {
    Self { context }
  }
}

impl ConcurrencyLayer for CooperativeConcurrencyLayer {
  fn supports_long_running(&self) -> bool {
    false
  }

  fn queue_work(&self, work: WorkItem) -> CancelHandle {
    self.context.post(work);
    CancelHandle::empty()
  }

  fn start_long_running(&self, _work: WorkItem) -> Result<(), ScheduleError> {
    event!(target: TARGET, Level::DEBUG, "long-running work refused on cooperative layer");
    Err(ScheduleError::LongRunningUnsupported)
  }

  fn sleep(&self, timeout: Duration) {
    thread::sleep(timeout);
  }

  fn start_stopwatch(&self) -> Box<dyn Stopwatch> {
    Box::new(StdStopwatch::start())
  }
}
