//! Thread-backed concurrency layer.


use core::time::Duration;
use std::thread;

use tracing::{event, Level};

use crate::{
  core::{
    cancel::CancelHandle,
    error::ScheduleError,
    platform::{ConcurrencyLayer, Stopwatch, WorkItem},
  },
  std::concurrency::StdStopwatch,
};

const TARGET: &str = "cadence::std::concurrency";

/// Concurrency layer backed by OS threads.
///
/// Pool work and long-running work both get a freshly spawned named thread;
/// already-submitted work cannot be revoked, so `queue_work` returns an
/// inert handle.
pub struct StdConcurrencyLayer;

impl ConcurrencyLayer for StdConcurrencyLayer {
  fn supports_long_running(&self) -> bool {
    true
  }

  fn queue_work(&self, work: WorkItem) -> CancelHandle {
    let spawned = thread::Builder::new().name("cadence-pool".into()).spawn(work);
    if let Err(error) = spawned {
      event!(target: TARGET, Level::WARN, %error, "pool thread spawn failed; work dropped");
    }
    CancelHandle::empty()
  }

  fn start_long_running(&self, work: WorkItem) -> Result<(), ScheduleError> {
    thread::Builder::new()
      .name("cadence-worker".into())
      .spawn(work)
      .map(|_| ())
      .map_err(|_| ScheduleError::LongRunningUnsupported)
  }

  fn sleep(&self, timeout: Duration) {
    thread::sleep(timeout);
  }

  fn start_stopwatch(&self) -> Box<dyn Stopwatch> {
    Box::new(StdStopwatch::start())
  }
}
