//! Fixed-rate adapter over the platform interval primitive.


use core::time::Duration;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{
  cancel::{CancelHandle, Cancellable},
  platform::{RepeatingWork, TimerId, TimerService},
};

/// Wraps one recurring platform registration into a cancellable resource.
///
/// Each platform firing invokes the user action directly; there is no gate,
/// so this mode is only appropriate when the period is comfortably larger
/// than the body's expected duration. Cancellation drops the user action and
/// releases the platform interval exactly once.
pub struct IntervalTimer {
  service: Arc<dyn TimerService>,
  action:  Arc<Mutex<Option<RepeatingWork>>>,
  id:      Mutex<Option<TimerId>>,
}

impl IntervalTimer {
  /// Registers `action` to run every `period` and returns the handle that
  /// cancels it.
  pub fn start(service: Arc<dyn TimerService>, period: Duration, action: RepeatingWork) -> CancelHandle {
    let shared = Arc::new(Mutex::new(Some(action)));
    let ticking = shared.clone();
    let id = service.register_periodic(
      period,
      Box::new(move || {
        if let Some(action) = ticking.lock().as_mut() {
          action();
        }
      }),
    );
    CancelHandle::new(Arc::new(Self { service, action: shared, id: Mutex::new(Some(id)) }))
  }
}

impl Cancellable for IntervalTimer {
  fn cancel(&self) {
    *self.action.lock() = None;
    let pending = self.id.lock().take();
    if let Some(id) = pending {
      self.service.cancel(id);
    }
  }

  fn is_cancelled(&self) -> bool {
    self.id.lock().is_none()
  }
}
