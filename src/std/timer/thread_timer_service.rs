//! Timer service driven by one dedicated deadline thread.


use core::{cmp, time::Duration};
use std::{
  collections::BinaryHeap,
  sync::Arc,
  thread::{self, JoinHandle},
  time::Instant,
};

use hashbrown::HashMap;
use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{event, Level};

use crate::core::platform::{RepeatingWork, TimerId, TimerService, WorkItem};

const TARGET: &str = "cadence::std::timer";

/// Earliest-deadline-first heap entry; `BinaryHeap` is a max-heap, so the
/// ordering is reversed.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Deadline {
  due: Instant,
  id:  u64,
}

impl Ord for Deadline {
  fn cmp(&self, other: &Self) -> cmp::Ordering {
    other.due.cmp(&self.due).then_with(|| other.id.cmp(&self.id))
  }
}

impl PartialOrd for Deadline {
  fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
    Some(self.cmp(other))
  }
}

enum TimerEntry {
  OneShot(WorkItem),
  Periodic { period: Duration, callback: RepeatingWork },
}

struct TimerState {
  next_id:      u64,
  deadlines:    BinaryHeap<Deadline>,
  entries:      HashMap<u64, TimerEntry, ahash::RandomState>,
  running:      Option<u64>,
  kill_running: bool,
  shutdown:     bool,
}

struct Shared {
  state:  Mutex<TimerState>,
  signal: Condvar,
}

/// Timer service that runs every callback on one named driver thread.
///
/// Registrations are kept in a deadline heap; the driver sleeps until the
/// earliest deadline and is woken early when a new registration or a
/// shutdown changes it. Periodic entries re-arm only after their callback
/// returns, and a tick that overran its period is delayed rather than
/// bursted. Callbacks run with no lock held, so they may register and
/// cancel freely.
pub struct ThreadTimerService {
  shared: Arc<Shared>,
  driver: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadTimerService {
  /// Starts the service and its driver thread.
  ///
  /// # Panics
  ///
  /// Panics when the host refuses to spawn the driver thread.
  #[must_use]
  pub fn new() -> Arc<Self> {
    let shared = Arc::new(Shared {
      state:  Mutex::new(TimerState {
        next_id:      1,
        deadlines:    BinaryHeap::new(),
        entries:      HashMap::default(),
        running:      None,
        kill_running: false,
        shutdown:     false,
      }),
      signal: Condvar::new(),
    });
    let driving = shared.clone();
    let driver = thread::Builder::new()
      .name("cadence-timer".into())
      .spawn(move || drive(&driving))
      .expect("timer driver thread spawn failed");
    Arc::new(Self { shared, driver: Mutex::new(Some(driver)) })
  }

  /// Stops the driver thread after the in-flight callback, if any, returns.
  ///
  /// Pending registrations are discarded. Registrations made after shutdown
  /// never fire. Idempotent; also invoked on drop.
  pub fn shutdown(&self) {
    {
      let mut state = self.shared.state.lock();
      state.shutdown = true;
      state.entries.clear();
      state.deadlines.clear();
    }
    self.shared.signal.notify_all();
    let driver = self.driver.lock().take();
    if let Some(driver) = driver {
      if driver.thread().id() != thread::current().id() {
        let _ = driver.join();
      }
    }
  }

  fn insert(&self, delay: Duration, entry: TimerEntry) -> TimerId {
    let mut state = self.shared.state.lock();
    let id = state.next_id;
    state.next_id += 1;
    state.entries.insert(id, entry);
    state.deadlines.push(Deadline { due: Instant::now() + delay, id });
    drop(state);
    self.shared.signal.notify_all();
    TimerId::new(id)
  }
}

impl TimerService for ThreadTimerService {
  fn register(&self, delay: Duration, callback: WorkItem) -> TimerId {
    let id = self.insert(delay, TimerEntry::OneShot(callback));
    event!(target: TARGET, Level::TRACE, id = id.raw(), delay_micros = delay.as_micros() as u64, "one-shot registered");
    id
  }

  fn register_periodic(&self, period: Duration, callback: RepeatingWork) -> TimerId {
    let id = self.insert(period, TimerEntry::Periodic { period, callback });
    event!(target: TARGET, Level::TRACE, id = id.raw(), period_micros = period.as_micros() as u64, "periodic registered");
    id
  }

  fn cancel(&self, id: TimerId) {
    let mut state = self.shared.state.lock();
    if state.running == Some(id.raw()) {
      state.kill_running = true;
    }
    let removed = state.entries.remove(&id.raw()).is_some();
    drop(state);
    event!(target: TARGET, Level::TRACE, id = id.raw(), removed, "registration cancelled");
  }
}

impl Drop for ThreadTimerService {
  fn drop(&mut self) {
    self.shutdown();
  }
}

fn drive(shared: &Shared) {
  let mut state = shared.state.lock();
  loop {
    if state.shutdown {
      return;
    }
    // Heads cancelled since they were pushed are skipped here; the heap is
    // never rebuilt on cancellation.
    while state.deadlines.peek().is_some_and(|head| !state.entries.contains_key(&head.id)) {
      state.deadlines.pop();
    }
    let head = match state.deadlines.peek() {
      | Some(head) => *head,
      | None => {
        shared.signal.wait(&mut state);
        continue;
      },
    };
    if head.due > Instant::now() {
      let _timed_out = shared.signal.wait_until(&mut state, head.due);
      continue;
    }
    state.deadlines.pop();
    let Some(entry) = state.entries.remove(&head.id) else {
      continue;
    };
    state.running = Some(head.id);
    state.kill_running = false;
    match entry {
      | TimerEntry::OneShot(callback) => {
        MutexGuard::unlocked(&mut state, callback);
        state.running = None;
      },
      | TimerEntry::Periodic { period, mut callback } => {
        MutexGuard::unlocked(&mut state, || callback());
        state.running = None;
        if state.kill_running || state.shutdown {
          continue;
        }
        // Delay a missed tick instead of bursting to catch up.
        let due = cmp::max(head.due + period, Instant::now());
        state.entries.insert(head.id, TimerEntry::Periodic { period, callback });
        state.deadlines.push(Deadline { due, id: head.id });
      },
    }
  }
}
