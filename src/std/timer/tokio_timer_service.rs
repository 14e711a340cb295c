//! Timer service running registrations as Tokio tasks.


use core::{
  sync::atomic::{AtomicU64, Ordering},
  time::Duration,
};
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use tokio::{
  runtime::Handle,
  task::AbortHandle,
  time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{event, Level};

use crate::core::platform::{RepeatingWork, TimerId, TimerService, WorkItem};

const TARGET: &str = "cadence::std::timer";

type TaskRegistry = Mutex<HashMap<u64, Option<AbortHandle>, ahash::RandomState>>;

/// Timer service that spawns one Tokio task per registration.
///
/// One-shot tasks remove their own registry entry before invoking the
/// callback; the registry slot is `None` for the window between spawn and
/// abort-handle installation, so a task finishing inside that window leaves
/// nothing behind. Cancellation aborts the task, which for interval
/// registrations also stops future ticks.
pub struct TokioTimerService {
  handle:  Handle,
  next_id: AtomicU64,
  tasks:   Arc<TaskRegistry>,
}

impl TokioTimerService {
  /// Creates a service spawning onto the provided runtime handle.
  #[must_use]
  pub fn new(handle: Handle) -> Arc<Self> {
    Arc::new(Self { handle, next_id: AtomicU64::new(1), tasks: Arc::new(Mutex::new(HashMap::default())) })
  }

  /// Creates a service over the current Tokio runtime.
  ///
  /// # Panics
  ///
  /// Panics when called outside a Tokio runtime.
  #[must_use]
  pub fn current() -> Arc<Self> {
    Self::new(Handle::try_current().expect("Tokio runtime handle unavailable"))
  }

  /// Aborts every live registration.
  pub fn shutdown(&self) {
    let drained: Vec<_> = self.tasks.lock().drain().collect();
    for (_, abort) in drained {
      if let Some(abort) = abort {
        abort.abort();
      }
    }
  }

  fn next_id(&self) -> u64 {
    self.next_id.fetch_add(1, Ordering::Relaxed)
  }

  fn install(&self, id: u64, abort: AbortHandle) {
    let mut tasks = self.tasks.lock();
    match tasks.get_mut(&id) {
      | Some(slot) => *slot = Some(abort),
      // A missing slot means the task completed and removed it, or a
      // shutdown drained the registry before the handle landed. Aborting
      // covers the second case and is a no-op in the first.
      | None => abort.abort(),
    }
  }
}

impl TimerService for TokioTimerService {
  fn register(&self, delay: Duration, callback: WorkItem) -> TimerId {
    let id = self.next_id();
    self.tasks.lock().insert(id, None);
    let tasks = self.tasks.clone();
    let join = self.handle.spawn(async move {
      sleep(delay).await;
      tasks.lock().remove(&id);
      callback();
    });
    self.install(id, join.abort_handle());
    event!(target: TARGET, Level::TRACE, id, delay_micros = delay.as_micros() as u64, "one-shot task spawned");
    TimerId::new(id)
  }

  fn register_periodic(&self, period: Duration, mut callback: RepeatingWork) -> TimerId {
    let id = self.next_id();
    self.tasks.lock().insert(id, None);
    let join = self.handle.spawn(async move {
      // A plain interval fires immediately; the first tick must wait one
      // full period.
      let mut ticker = interval_at(Instant::now() + period, period);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        ticker.tick().await;
        callback();
      }
    });
    self.install(id, join.abort_handle());
    event!(target: TARGET, Level::TRACE, id, period_micros = period.as_micros() as u64, "interval task spawned");
    TimerId::new(id)
  }

  fn cancel(&self, id: TimerId) {
    let removed = self.tasks.lock().remove(&id.raw());
    if let Some(Some(abort)) = removed {
      abort.abort();
    }
    event!(target: TARGET, Level::TRACE, id = id.raw(), "registration cancelled");
  }
}

impl Drop for TokioTimerService {
  fn drop(&mut self) {
    self.shutdown();
  }
}
