//! Instant-backed stopwatch.

use core::time::Duration;
use std::time::Instant;

use crate::core::platform::Stopwatch;

/// Monotonic stopwatch over [`Instant`].
pub struct StdStopwatch {
  origin: Instant,
}

impl StdStopwatch {
  /// Starts measuring from now.
  #[must_use]
  pub fn start() -> Self {
    Self { origin: Instant::now() }
  }
}

impl Stopwatch for StdStopwatch {
  fn elapsed(&self) -> Duration {
    self.origin.elapsed()
  }
}
