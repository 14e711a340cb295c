//! Error types surfaced by scheduling operations.

use core::{fmt, time::Duration};

/// Errors raised when a scheduling request is rejected.
///
/// Every variant is reported synchronously, before any timer or dispatch
/// registration is created. Cancellation never produces an error: disposal
/// paths are failure-free and idempotent by design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleError {
  /// Period is below the hard floor enforced by the timer adapter in use.
  PeriodTooShort {
    /// Rejected period.
    period: Duration,
    /// Minimum period the adapter accepts for timer-driven ticks.
    floor:  Duration,
  },
  /// No single-threaded dispatch context was available at construction.
  NoDispatchContext,
  /// The platform cannot create dedicated long-running execution units.
  LongRunningUnsupported,
}

impl fmt::Display for ScheduleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::PeriodTooShort { period, floor } => {
        write!(f, "period {period:?} is below the adapter floor of {floor:?}")
      },
      | Self::NoDispatchContext => write!(f, "no dispatch context available for the calling thread"),
      | Self::LongRunningUnsupported => write!(f, "platform does not support long-running execution units"),
    }
  }
}

impl std::error::Error for ScheduleError {}
