//! Single-threaded dispatch context over a dedicated event loop thread.


use std::{
  sync::{mpsc, Arc},
  thread::{self, JoinHandle},
};

use parking_lot::Mutex;
use tracing::{event, Level};

use crate::core::platform::{DispatchContext, DispatchContextProvider, WorkItem};

const TARGET: &str = "cadence::std::dispatch";

enum LoopMessage {
  Run(WorkItem),
  Stop,
}

/// Dispatch context draining posted callbacks on one named worker thread.
///
/// `post` never blocks and is safe from any thread; callbacks run strictly
/// in post order and never concurrently. After [`EventLoopContext::shutdown`]
/// the queue sender is gone and further posts are dropped silently.
pub struct EventLoopContext {
  sender: Mutex<Option<mpsc::Sender<LoopMessage>>>,
  worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventLoopContext {
  /// Starts the event loop thread.
  ///
  /// # Panics
  ///
  /// Panics when the host refuses to spawn the worker thread.
  #[must_use]
  pub fn new() -> Arc<Self> {
    let (sender, receiver) = mpsc::channel::<LoopMessage>();
    let worker = thread::Builder::new()
      .name("cadence-event-loop".into())
      .spawn(move || {
        // The explicit stop sentinel ends the loop even while provider
        // views still hold sender clones.
        for message in receiver {
          match message {
            | LoopMessage::Run(callback) => callback(),
            | LoopMessage::Stop => break,
          }
        }
      })
      .expect("event loop thread spawn failed");
    Arc::new(Self { sender: Mutex::new(Some(sender)), worker: Mutex::new(Some(worker)) })
  }

  /// Stops accepting posts and waits for already-posted callbacks to drain.
  ///
  /// Idempotent; also invoked on drop. Joining is skipped when called from
  /// the event loop thread itself.
  pub fn shutdown(&self) {
    let sender = self.sender.lock().take();
    if let Some(sender) = sender {
      let _ = sender.send(LoopMessage::Stop);
    }
    let worker = self.worker.lock().take();
    if let Some(worker) = worker {
      if worker.thread().id() != thread::current().id() {
        let _ = worker.join();
      }
    }
  }
}

impl DispatchContext for EventLoopContext {
  fn post(&self, callback: WorkItem) {
    let sender = self.sender.lock();
    match sender.as_ref() {
      | Some(sender) => {
        if sender.send(LoopMessage::Run(callback)).is_err() {
          event!(target: TARGET, Level::TRACE, "post after event loop exit dropped");
        }
      },
      | None => {
        event!(target: TARGET, Level::TRACE, "post after shutdown dropped");
      },
    }
  }
}

impl DispatchContextProvider for EventLoopContext {
  fn current(&self) -> Option<Arc<dyn DispatchContext>> {
    // The provider hands out a sender-only view so callers cannot shut the
    // loop down through it.
    let sender = self.sender.lock().clone();
    sender.map(|sender| Arc::new(SenderContext { sender }) as Arc<dyn DispatchContext>)
  }
}

impl Drop for EventLoopContext {
  fn drop(&mut self) {
    self.shutdown();
  }
}

struct SenderContext {
  sender: mpsc::Sender<LoopMessage>,
}

impl DispatchContext for SenderContext {
  fn post(&self, callback: WorkItem) {
    if self.sender.send(LoopMessage::Run(callback)).is_err() {
      event!(target: TARGET, Level::TRACE, "post after event loop exit dropped");
    }
  }
}
