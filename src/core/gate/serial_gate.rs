//! Queue-draining gate that never lets two guarded bodies overlap.


use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::core::cancel::Cancellable;

type GateAction = Box<dyn FnOnce() + Send + 'static>;

/// Serializes actions so a slow tick can never overlap the next one.
///
/// An action submitted while the gate is free runs inline on the submitting
/// thread. Actions submitted while another action is running are queued and
/// drained by the thread that currently owns the gate, strictly in
/// submission order. Cancelling the gate lets the in-flight action finish,
/// drops everything still queued, and rejects later submissions.
pub struct SerialGate {
  state: Mutex<GateState>,
}

struct GateState {
  queue:     VecDeque<GateAction>,
  owned:     bool,
  cancelled: bool,
}

impl SerialGate {
  /// Creates an open gate.
  #[must_use]
  pub fn new() -> Self {
    Self { state: Mutex::new(GateState { queue: VecDeque::new(), owned: false, cancelled: false }) }
  }

  /// Runs `action` under the gate, or queues it when a body is in flight.
  pub fn enter(&self, action: GateAction) {
    let owner = {
      let mut state = self.state.lock();
      if state.cancelled {
        return;
      }
      state.queue.push_back(action);
      if state.owned {
        false
      } else {
        state.owned = true;
        true
      }
    };
    if !owner {
      return;
    }
    loop {
      let next = {
        let mut state = self.state.lock();
        if state.cancelled {
          state.queue.clear();
          state.owned = false;
          return;
        }
        match state.queue.pop_front() {
          | Some(action) => action,
          | None => {
            state.owned = false;
            return;
          },
        }
      };
      next();
    }
  }
}

impl Cancellable for SerialGate {
  fn cancel(&self) {
    let mut state = self.state.lock();
    state.cancelled = true;
    state.queue.clear();
  }

  fn is_cancelled(&self) -> bool {
    self.state.lock().cancelled
  }
}

impl Default for SerialGate {
  fn default() -> Self {
    Self::new()
  }
}
