//! One-shot adapter over the platform timeout primitive.


use core::time::Duration;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{
  cancel::{CancelHandle, Cancellable},
  platform::{TimerId, TimerService, WorkItem},
};

/// Wraps one platform timeout registration into a cancellable resource.
///
/// The platform callback captures the adapter itself, so the pending
/// registration keeps the adapter alive until it fires or is cancelled; no
/// external rooting table is involved. After firing, the adapter marks its
/// registration spent without a platform-level cancel call, and repeated
/// cancellation stays a cheap no-op.
pub struct OneShotTimer {
  service: Arc<dyn TimerService>,
  action:  Mutex<Option<WorkItem>>,
  slot:    Mutex<RegistrationSlot>,
}

enum RegistrationSlot {
  /// Registration id not yet written back by the constructing thread.
  Arming,
  /// Live platform registration.
  Pending(TimerId),
  /// Fired or cancelled; nothing left to release.
  Spent,
}

impl OneShotTimer {
  /// Registers `action` to run once after `delay` and returns the handle
  /// that cancels it.
  pub fn start(service: Arc<dyn TimerService>, delay: Duration, action: WorkItem) -> CancelHandle {
    let timer = Arc::new(Self {
      service: service.clone(),
      action:  Mutex::new(Some(action)),
      slot:    Mutex::new(RegistrationSlot::Arming),
    });
    let pending = timer.clone();
    let id = service.register(delay, Box::new(move || pending.fire()));
    let stale = {
      let mut slot = timer.slot.lock();
      match *slot {
        | RegistrationSlot::Arming => {
          *slot = RegistrationSlot::Pending(id);
          None
        },
        // Cancelled while the registration was still in flight; the id was
        // never observable by `cancel`, so release it here.
        | RegistrationSlot::Spent => Some(id),
        | RegistrationSlot::Pending(_) => None,
      }
    };
    if let Some(id) = stale {
      service.cancel(id);
    }
    CancelHandle::new(timer)
  }

  fn fire(&self) {
    // Guards the narrow construction race where the platform fires before
    // `start` wrote the registration id back.
    loop {
      {
        if !matches!(*self.slot.lock(), RegistrationSlot::Arming) {
          break;
        }
      }
      core::hint::spin_loop();
    }
    let action = self.action.lock().take();
    if let Some(action) = action {
      action();
    }
    *self.slot.lock() = RegistrationSlot::Spent;
  }
}

impl Cancellable for OneShotTimer {
  fn cancel(&self) {
    *self.action.lock() = None;
    let pending = {
      let mut slot = self.slot.lock();
      match *slot {
        | RegistrationSlot::Pending(id) => {
          *slot = RegistrationSlot::Spent;
          Some(id)
        },
        | RegistrationSlot::Arming => {
          *slot = RegistrationSlot::Spent;
          None
        },
        | RegistrationSlot::Spent => None,
      }
    };
    if let Some(id) = pending {
      self.service.cancel(id);
    }
  }

  fn is_cancelled(&self) -> bool {
    self.action.lock().is_none()
  }
}
