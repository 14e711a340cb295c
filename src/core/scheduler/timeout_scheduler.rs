//! Scheduler backed by the platform timeout primitive.


use core::time::Duration;
use std::{sync::Arc, time::SystemTime};

use parking_lot::Mutex;

use crate::core::{
  cancel::{CancelHandle, Cancellable, SingleAssignCancel},
  error::ScheduleError,
  gate::SerialGate,
  platform::{ConcurrencyLayer, RepeatingWork, TimerService},
  scheduler::{PeriodicScheduler, ScheduledAction, Scheduler},
  timer::{BusyLoopTimer, OneShotTimer},
};

/// Minimum period accepted for timer-driven periodic ticks.
///
/// The timeout primitive cannot honor sub-millisecond periods; rather than
/// silently degrading, sub-floor requests are rejected. A period of exactly
/// zero bypasses the floor and selects the busy-loop mode.
pub const PERIODIC_FLOOR: Duration = Duration::from_millis(1);

/// Scheduler that defers work through a platform "callback after N
/// milliseconds" service.
///
/// Periodic scheduling is self-driven: each tick re-arms the next one-shot
/// registration from inside the gated tick body, so a slow tick absorbs the
/// firings that would have overlapped it.
#[derive(Clone)]
pub struct TimeoutScheduler {
  timers: Arc<dyn TimerService>,
  layer:  Arc<dyn ConcurrencyLayer>,
}

impl TimeoutScheduler {
  /// Creates a scheduler over the provided platform services.
  pub fn new(timers: Arc<dyn TimerService>, layer: Arc<dyn ConcurrencyLayer>) -> Self {
    Self { timers, layer }
  }

  fn schedule_at(&self, delay: Duration, action: ScheduledAction) -> CancelHandle {
    let slot = SingleAssignCancel::shared();
    let guard = slot.clone();
    let scheduler = self.clone();
    let timer = OneShotTimer::start(
      self.timers.clone(),
      delay,
      Box::new(move || {
        if !guard.is_cancelled() {
          let chained = action(&scheduler);
          guard.set(chained);
        }
      }),
    );
    let chained = slot.handle();
    CancelHandle::from_fn(move || {
      timer.cancel();
      chained.cancel();
    })
  }
}

impl Scheduler for TimeoutScheduler {
  fn now(&self) -> SystemTime {
    SystemTime::now()
  }

  fn schedule(&self, action: ScheduledAction) -> CancelHandle {
    self.schedule_at(Duration::ZERO, action)
  }

  fn schedule_after(&self, delay: Duration, action: ScheduledAction) -> CancelHandle {
    if delay.is_zero() {
      return self.schedule(action);
    }
    self.schedule_at(delay, action)
  }
}

impl PeriodicScheduler for TimeoutScheduler {
  fn schedule_periodic(&self, period: Duration, tick: RepeatingWork) -> Result<CancelHandle, ScheduleError> {
    if period.is_zero() {
      return BusyLoopTimer::start(&*self.layer, tick);
    }
    if period < PERIODIC_FLOOR {
      return Err(ScheduleError::PeriodTooShort { period, floor: PERIODIC_FLOOR });
    }
    let run = Arc::new(PeriodicRun {
      gate:   SerialGate::new(),
      timers: self.timers.clone(),
      period,
      tick:   Mutex::new(Some(tick)),
    });
    run.arm();
    let cancelled = run.clone();
    Ok(CancelHandle::from_fn(move || {
      cancelled.gate.cancel();
      *cancelled.tick.lock() = None;
    }))
  }
}

struct PeriodicRun {
  gate:   SerialGate,
  timers: Arc<dyn TimerService>,
  period: Duration,
  tick:   Mutex<Option<RepeatingWork>>,
}

impl PeriodicRun {
  /// Registers the next firing. The registration id is deliberately not
  /// retained: cancellation closes the gate, which suppresses both the tick
  /// and the re-arm when the stray firing arrives.
  fn arm(self: &Arc<Self>) {
    let next = self.clone();
    let _ = self.timers.register(self.period, Box::new(move || next.run()));
  }

  fn run(self: &Arc<Self>) {
    let owner = self.clone();
    self.gate.enter(Box::new(move || {
      // The tick runs outside the slot lock so cancellation never blocks
      // behind a slow body.
      let mut taken = owner.tick.lock().take();
      if let Some(tick) = taken.as_mut() {
        tick();
      }
      if owner.gate.is_cancelled() {
        return;
      }
      *owner.tick.lock() = taken;
      owner.arm();
    }));
  }
}
