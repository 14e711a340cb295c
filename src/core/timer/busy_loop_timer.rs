//! Busy-loop periodic mode driven by a dedicated execution unit.


use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use crate::core::{
  cancel::{CancelHandle, Cancellable},
  error::ScheduleError,
  platform::{ConcurrencyLayer, RepeatingWork},
};

/// Invokes an action back to back with no enforced inter-tick delay.
///
/// The loop runs on a dedicated execution unit and checks a shared stop flag
/// once per iteration; cancellation is cooperative, so the loop exits at the
/// next iteration boundary rather than preemptively.
pub struct BusyLoopTimer {
  stopped: AtomicBool,
}

impl BusyLoopTimer {
  /// Starts the loop on an execution unit obtained from `layer`.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError::LongRunningUnsupported`] when the platform
  /// cannot create dedicated execution units.
  pub fn start(layer: &dyn ConcurrencyLayer, mut action: RepeatingWork) -> Result<CancelHandle, ScheduleError> {
    if !layer.supports_long_running() {
      return Err(ScheduleError::LongRunningUnsupported);
    }
    let timer = Arc::new(Self { stopped: AtomicBool::new(false) });
    let looping = timer.clone();
    layer.start_long_running(Box::new(move || {
      while !looping.stopped.load(Ordering::Acquire) {
        action();
      }
    }))?;
    Ok(CancelHandle::new(timer))
  }
}

impl Cancellable for BusyLoopTimer {
  fn cancel(&self) {
    self.stopped.store(true, Ordering::Release);
  }

  fn is_cancelled(&self) -> bool {
    self.stopped.load(Ordering::Acquire)
  }
}
