//! Multiple-assignment cancellation slot.


use std::sync::Arc;

use parking_lot::Mutex;

use super::{CancelHandle, Cancellable};

/// Cancellation slot whose inner resource can be replaced repeatedly.
///
/// Replacing releases the previous occupant without cancelling it; cancelling
/// the slot always cancels whatever is currently assigned, and any later
/// assignment is cancelled immediately. Query-then-set happens under one
/// lock.
pub struct MultiAssignCancel {
  state: Mutex<MultiState>,
}

struct MultiState {
  current:   Option<CancelHandle>,
  cancelled: bool,
}

impl MultiAssignCancel {
  /// Creates an empty slot.
  #[must_use]
  pub fn new() -> Self {
    Self { state: Mutex::new(MultiState { current: None, cancelled: false }) }
  }

  /// Creates an empty slot behind a shared pointer.
  #[must_use]
  pub fn shared() -> Arc<Self> {
    Arc::new(Self::new())
  }

  /// Stores the inner resource, replacing the previous occupant, or cancels
  /// it when the slot is already cancelled.
  pub fn set(&self, inner: CancelHandle) {
    let rejected = {
      let mut state = self.state.lock();
      if state.cancelled {
        Some(inner)
      } else {
        state.current = Some(inner);
        None
      }
    };
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

impl Cancellable for MultiAssignCancel {
  fn cancel(&self) {
    let current = {
      let mut state = self.state.lock();
      state.cancelled = true;
      state.current.take()
    };
    if let Some(inner) = current {
      inner.cancel();
    }
  }

  fn is_cancelled(&self) -> bool {
    self.state.lock().cancelled
  }
}

impl Default for MultiAssignCancel {
  fn default() -> Self {
    Self::new()
  }
}
