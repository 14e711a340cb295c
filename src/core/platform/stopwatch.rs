//! Elapsed-time capability.

use core::time::Duration;

/// Running stopwatch started via [`super::ConcurrencyLayer::start_stopwatch`].
pub trait Stopwatch: Send {
  /// Time elapsed since the stopwatch started.
  ///
  /// Monotonically non-decreasing across calls.
  fn elapsed(&self) -> Duration;
}
