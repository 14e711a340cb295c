//! Scheduler that marshals actions onto a captured dispatch context.


use core::time::Duration;
use std::{sync::Arc, time::SystemTime};

use crate::core::{
  cancel::{CancelHandle, Cancellable, MultiAssignCancel, SingleAssignCancel},
  error::ScheduleError,
  platform::{DispatchContext, DispatchContextProvider, TimerService},
  scheduler::{ScheduledAction, Scheduler},
  timer::OneShotTimer,
};

/// Scheduler forwarding execution onto a single-threaded dispatch context.
///
/// The context is captured once at construction and never reassigned; every
/// scheduled action runs on the context's thread, in post order, never
/// concurrently with another action of this scheduler. Delayed scheduling is
/// composed from immediate scheduling plus a one-shot timer.
///
/// This variant has no periodic capability; callers needing one compose
/// repeated [`Scheduler::schedule_after`] calls.
#[derive(Clone)]
pub struct DispatchScheduler {
  context: Arc<dyn DispatchContext>,
  timers:  Arc<dyn TimerService>,
}

impl DispatchScheduler {
  /// Builds a scheduler around an explicitly provided context.
  pub fn new(context: Arc<dyn DispatchContext>, timers: Arc<dyn TimerService>) -> Self {
    Self { context, timers }
  }

  /// Captures the calling thread's context from `provider`.
  ///
  /// # Errors
  ///
  /// Returns [`ScheduleError::NoDispatchContext`] when the provider reports
  /// no context for the calling thread; nothing is scheduled in that case.
  pub fn from_provider(
    provider: &dyn DispatchContextProvider,
    timers: Arc<dyn TimerService>,
  ) -> Result<Self, ScheduleError> {
    let context = provider.current().ok_or(ScheduleError::NoDispatchContext)?;
    Ok(Self::new(context, timers))
  }
}

impl Scheduler for DispatchScheduler {
  fn now(&self) -> SystemTime {
    SystemTime::now()
  }

  fn schedule(&self, action: ScheduledAction) -> CancelHandle {
    let slot = SingleAssignCancel::shared();
    let guard = slot.clone();
    let scheduler = self.clone();
    self.context.post(Box::new(move || {
      if !guard.is_cancelled() {
        let chained = action(&scheduler);
        guard.set(chained);
      }
    }));
    slot.handle()
  }

  fn schedule_after(&self, delay: Duration, action: ScheduledAction) -> CancelHandle {
    if delay.is_zero() {
      return self.schedule(action);
    }
    let slot = MultiAssignCancel::shared();
    let guard = slot.clone();
    let scheduler = self.clone();
    let timer = OneShotTimer::start(
      self.timers.clone(),
      delay,
      Box::new(move || {
        if !guard.is_cancelled() {
          guard.set(scheduler.schedule(action));
        }
      }),
    );
    // Until the timer fires the slot cancels the timer; afterwards it holds
    // the posted action's handle (the spent timer is simply released).
    slot.set(timer);
    slot.handle()
  }
}
