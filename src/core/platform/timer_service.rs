//! Host timer primitive consumed by the timer adapters.

use core::time::Duration;

use super::{RepeatingWork, WorkItem};

/// Identifier for one timer registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
  /// Creates an identifier from its raw value.
  #[must_use]
  pub const fn new(raw: u64) -> Self {
    Self(raw)
  }

  /// Returns the raw identifier.
  #[must_use]
  pub const fn raw(&self) -> u64 {
    self.0
  }
}

/// Platform service able to invoke callbacks after a delay.
///
/// One-shot callbacks fire at most once per registration; cancellation is
/// best effort. Implementations must tolerate [`TimerService::cancel`] being
/// called for identifiers that already fired or were cancelled before.
pub trait TimerService: Send + Sync {
  /// Registers `callback` to run once after `delay`.
  fn register(&self, delay: Duration, callback: WorkItem) -> TimerId;

  /// Registers `callback` to run every `period` until cancelled.
  fn register_periodic(&self, period: Duration, callback: RepeatingWork) -> TimerId;

  /// Revokes a pending registration; a no-op for unknown or spent ids.
  fn cancel(&self, id: TimerId);
}
