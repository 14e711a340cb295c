//! Single-assignment cancellation slot.


use core::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{CancelHandle, Cancellable};

/// Cancellation slot whose inner resource is set at most once.
///
/// The first writer wins: assigning after cancellation, or assigning a second
/// time, cancels the incoming resource immediately instead of storing it.
/// Query-then-set happens under one lock, so a resource can never slip into
/// the slot after the slot was cancelled.
pub struct SingleAssignCancel {
  state: Mutex<SlotState>,
}

enum SlotState {
  Unassigned,
  Assigned(CancelHandle),
  Cancelled,
}

impl SingleAssignCancel {
  /// Creates an empty slot.
  #[must_use]
  pub fn new() -> Self {
    Self { state: Mutex::new(SlotState::Unassigned) }
  }

  /// Creates an empty slot behind a shared pointer.
  #[must_use]
  pub fn shared() -> Arc<Self> {
    Arc::new(Self::new())
  }

  /// Stores the inner resource, or cancels it when the slot is already
  /// cancelled or occupied.
  pub fn set(&self, inner: CancelHandle) {
    let rejected = {
      let mut state = self.state.lock();
      match &*state {
        | SlotState::Unassigned => {
          *state = SlotState::Assigned(inner);
          None
        },
        | SlotState::Assigned(_) | SlotState::Cancelled => Some(inner),
      }
    };
    // Cancel outside the lock; the incoming handle may run foreign cleanup.
    if let Some(inner) = rejected {
      inner.cancel();
    }
  }

  /// Returns a [`CancelHandle`] view of this slot.
  #[must_use]
  pub fn handle(self: &Arc<Self>) -> CancelHandle {
    CancelHandle::new(self.clone())
  }
}

impl Cancellable for SingleAssignCancel {
  fn cancel(&self) {
    let previous = {
      let mut state = self.state.lock();
      mem::replace(&mut *state, SlotState::Cancelled)
    };
    if let SlotState::Assigned(inner) = previous {
      inner.cancel();
    }
  }

  fn is_cancelled(&self) -> bool {
    matches!(*self.state.lock(), SlotState::Cancelled)
  }
}

impl Default for SingleAssignCancel {
  fn default() -> Self {
    Self::new()
  }
}
