//! Scheduler contracts shared by every implementation.

use core::time::Duration;
use std::time::SystemTime;

use crate::core::{cancel::CancelHandle, error::ScheduleError, platform::RepeatingWork};

/// Action invoked by a scheduler.
///
/// The action receives the scheduler so it can chain further scheduling, and
/// returns the handle cancelling whatever it chained ([`CancelHandle::empty`]
/// when nothing was). Caller state is closed over; see
/// [`SchedulerExt::schedule_with`] for explicit state threading.
pub type ScheduledAction = Box<dyn FnOnce(&dyn Scheduler) -> CancelHandle + Send + 'static>;

/// Deferred-execution contract: run now, or run after a delay.
///
/// Every operation returns a handle with the same cancellation semantics:
/// cancelled before execution, the action never runs; cancelled while the
/// action executes, the in-flight call finishes but whatever it chained is
/// revoked; cancelled afterwards, only the chained work is revoked.
pub trait Scheduler: Send + Sync {
  /// Current time as observed by this scheduler. Pure, no side effects.
  fn now(&self) -> SystemTime;

  /// Runs `action` as soon as the underlying execution model allows.
  fn schedule(&self, action: ScheduledAction) -> CancelHandle;

  /// Runs `action` once `delay` has elapsed, never earlier.
  ///
  /// A zero delay is equivalent to [`Scheduler::schedule`].
  fn schedule_after(&self, delay: Duration, action: ScheduledAction) -> CancelHandle;
}

/// State-threading conveniences over [`Scheduler`].
pub trait SchedulerExt: Scheduler {
  /// Schedules `action` with caller-supplied `state`.
  fn schedule_with<S, F>(&self, state: S, action: F) -> CancelHandle
  where
    S: Send + 'static,
    F: FnOnce(&dyn Scheduler, S) -> CancelHandle + Send + 'static, {
    self.schedule(Box::new(move |scheduler| action(scheduler, state)))
  }

  /// Schedules `action` with caller-supplied `state` after `delay`.
  fn schedule_after_with<S, F>(&self, state: S, delay: Duration, action: F) -> CancelHandle
  where
    S: Send + 'static,
    F: FnOnce(&dyn Scheduler, S) -> CancelHandle + Send + 'static, {
    self.schedule_after(delay, Box::new(move |scheduler| action(scheduler, state)))
  }
}

impl<T: Scheduler + ?Sized> SchedulerExt for T {}

/// Capability to run work repeatedly at a fixed period.
pub trait PeriodicScheduler: Scheduler {
  /// Runs `tick` every `period` until the returned handle is cancelled.
  ///
  /// A period of exactly zero selects the busy-loop mode: ticks run back to
  /// back on a dedicated execution unit with no enforced delay.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError::PeriodTooShort`] when the adapter enforces a
  /// floor and `period` is below it, and
  /// [`ScheduleError::LongRunningUnsupported`] when busy-loop mode is
  /// requested on a platform without dedicated execution units. Both are
  /// reported before any registration is created.
  fn schedule_periodic(&self, period: Duration, tick: RepeatingWork) -> Result<CancelHandle, ScheduleError>;
}

/// State-threading convenience over [`PeriodicScheduler`].
pub trait PeriodicSchedulerExt: PeriodicScheduler {
  /// Repeatedly replaces `state` with `action(state)` every `period`.
  ///
  /// Each invocation's input is the previous invocation's output; ticks are
  /// serialized, so the state is never touched concurrently.
  ///
  /// # Errors
  ///
  /// Same as [`PeriodicScheduler::schedule_periodic`].
  fn schedule_periodic_with<S, F>(&self, state: S, period: Duration, mut action: F) -> Result<CancelHandle, ScheduleError>
  where
    S: Send + 'static,
    F: FnMut(S) -> S + Send + 'static, {
    let mut slot = Some(state);
    self.schedule_periodic(
      period,
      Box::new(move || {
        // Ticks never overlap, so the slot is always occupied here.
        if let Some(state) = slot.take() {
          slot = Some(action(state));
        }
      }),
    )
  }
}

impl<T: PeriodicScheduler + ?Sized> PeriodicSchedulerExt for T {}
