//! Thread pool, background unit, sleep, and stopwatch contracts.

use core::time::Duration;

use super::{Stopwatch, WorkItem};
use crate::core::{cancel::CancelHandle, error::ScheduleError};

/// Platform concurrency services consumed as opaque capabilities.
pub trait ConcurrencyLayer: Send + Sync {
  /// Whether this platform can create dedicated long-running execution
  /// units.
  ///
  /// Callers branch on this before requesting
  /// [`ConcurrencyLayer::start_long_running`]; constrained sandboxes report
  /// `false` here rather than failing at submission time.
  fn supports_long_running(&self) -> bool;

  /// Submits fire-and-forget work to the platform pool.
  ///
  /// No ordering guarantee relative to other submissions. Cancellation of
  /// already-submitted pool work is not guaranteed, so the returned handle
  /// is typically [`CancelHandle::empty`].
  fn queue_work(&self, work: WorkItem) -> CancelHandle;

  /// Starts a dedicated execution unit for long-running work.
  ///
  /// The unit is distinct from the caller and carries no return handle.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError::LongRunningUnsupported`] when
  /// [`ConcurrencyLayer::supports_long_running`] is `false`.
  fn start_long_running(&self, work: WorkItem) -> Result<(), ScheduleError>;

  /// Blocks the calling execution unit for `timeout`.
  fn sleep(&self, timeout: Duration);

  /// Starts a stopwatch measuring elapsed time from now.
  fn start_stopwatch(&self) -> Box<dyn Stopwatch>;
}
