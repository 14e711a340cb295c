//! Deterministic service doubles shared by the core unit tests.

use core::time::Duration;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{
  cancel::CancelHandle,
  error::ScheduleError,
  platform::{
    ConcurrencyLayer, DispatchContext, DispatchContextProvider, RepeatingWork, Stopwatch, TimerId, TimerService,
    WorkItem,
  },
};

enum ManualCallback {
  OneShot(WorkItem),
  Periodic(RepeatingWork),
}

struct ManualEntry {
  delay:    Duration,
  callback: ManualCallback,
}

struct ManualState {
  next_id:   u64,
  pending:   Vec<(TimerId, ManualEntry)>,
  cancelled: Vec<TimerId>,
}

/// Timer service fired by hand from tests; nothing runs until `fire`.
pub(crate) struct ManualTimerService {
  state: Mutex<ManualState>,
}

impl ManualTimerService {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self { state: Mutex::new(ManualState { next_id: 1, pending: Vec::new(), cancelled: Vec::new() }) })
  }

  pub(crate) fn pending_ids(&self) -> Vec<TimerId> {
    self.state.lock().pending.iter().map(|(id, _)| *id).collect()
  }

  pub(crate) fn pending_count(&self) -> usize {
    self.state.lock().pending.len()
  }

  pub(crate) fn delay_of(&self, id: TimerId) -> Option<Duration> {
    self.state.lock().pending.iter().find(|(entry_id, _)| *entry_id == id).map(|(_, entry)| entry.delay)
  }

  pub(crate) fn cancel_calls(&self, id: TimerId) -> usize {
    self.state.lock().cancelled.iter().filter(|cancelled| **cancelled == id).count()
  }

  /// Fires the registration, re-arming it when periodic. Returns whether a
  /// registration with that id was pending.
  pub(crate) fn fire(&self, id: TimerId) -> bool {
    let entry = {
      let mut state = self.state.lock();
      let position = state.pending.iter().position(|(entry_id, _)| *entry_id == id);
      match position {
        | Some(position) => Some(state.pending.remove(position).1),
        | None => None,
      }
    };
    match entry {
      | Some(ManualEntry { callback: ManualCallback::OneShot(callback), .. }) => {
        callback();
        true
      },
      | Some(ManualEntry { delay, callback: ManualCallback::Periodic(mut callback) }) => {
        callback();
        let mut state = self.state.lock();
        if !state.cancelled.contains(&id) {
          state.pending.push((id, ManualEntry { delay, callback: ManualCallback::Periodic(callback) }));
        }
        true
      },
      | None => false,
    }
  }
}

impl TimerService for ManualTimerService {
  fn register(&self, delay: Duration, callback: WorkItem) -> TimerId {
    let mut state = self.state.lock();
    let id = TimerId::new(state.next_id);
    state.next_id += 1;
    state.pending.push((id, ManualEntry { delay, callback: ManualCallback::OneShot(callback) }));
    id
  }

  fn register_periodic(&self, period: Duration, callback: RepeatingWork) -> TimerId {
    let mut state = self.state.lock();
    let id = TimerId::new(state.next_id);
    state.next_id += 1;
    state.pending.push((id, ManualEntry { delay: period, callback: ManualCallback::Periodic(callback) }));
    id
  }

  fn cancel(&self, id: TimerId) {
    let mut state = self.state.lock();
    state.cancelled.push(id);
    state.pending.retain(|(entry_id, _)| *entry_id != id);
  }
}

/// Dispatch context that queues posts until the test drains them.
pub(crate) struct RecordingContext {
  queue: Mutex<Vec<WorkItem>>,
}

impl RecordingContext {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(Self { queue: Mutex::new(Vec::new()) })
  }

  pub(crate) fn posted(&self) -> usize {
    self.queue.lock().len()
  }

  /// Runs every queued callback in post order.
  pub(crate) fn drain(&self) {
    loop {
      let next = {
        let mut queue = self.queue.lock();
        if queue.is_empty() { None } else { Some(queue.remove(0)) }
      };
      match next {
        | Some(callback) => callback(),
        | None => return,
      }
    }
  }
}

impl DispatchContext for RecordingContext {
  fn post(&self, callback: WorkItem) {
    self.queue.lock().push(callback);
  }
}

/// Provider with a fixed answer, for capture tests.
pub(crate) struct FixedProvider {
  context: Option<Arc<dyn DispatchContext>>,
}

impl FixedProvider {
  pub(crate) fn some(context: Arc<dyn DispatchContext>) -> Self {
    Self { context: Some(context) }
  }

  pub(crate) fn none() -> Self {
    Self { context: None }
  }
}

impl DispatchContextProvider for FixedProvider {
  fn current(&self) -> Option<Arc<dyn DispatchContext>> {
    self.context.clone()
  }
}

/// Concurrency layer standing in for a platform without threads.
pub(crate) struct NoThreadsLayer;

impl ConcurrencyLayer for NoThreadsLayer {
  fn supports_long_running(&self) -> bool {
    false
  }

  fn queue_work(&self, work: WorkItem) -> CancelHandle {
    work();
    CancelHandle::empty()
  }

  fn start_long_running(&self, _work: WorkItem) -> Result<(), ScheduleError> {
    Err(ScheduleError::LongRunningUnsupported)
  }

  fn sleep(&self, _timeout: Duration) {}

  fn start_stopwatch(&self) -> Box<dyn Stopwatch> {
    Box::new(FrozenStopwatch)
  }
}

struct FrozenStopwatch;

impl Stopwatch for FrozenStopwatch {
  fn elapsed(&self) -> Duration {
    Duration::ZERO
  }
}
