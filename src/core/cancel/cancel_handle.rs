//! Shareable cancellation token returned by scheduling operations.


use core::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Cancellable;

/// Clonable token that revokes a pending or recurring action when cancelled.
///
/// A handle may be held by the caller indefinitely; once cancelled it is
/// inert and further cancellation calls have no effect.
#[derive(Clone)]
pub struct CancelHandle {
  inner: Arc<dyn Cancellable>,
}

impl CancelHandle {
  /// Wraps a cancellable resource into a shareable handle.
  pub fn new(inner: Arc<dyn Cancellable>) -> Self {
    Self { inner }
  }

  /// Returns a handle that was never backed by pending work.
  ///
  /// Used where cancellation is not guaranteed, e.g. for already-submitted
  /// pool work; the handle reports itself cancelled from birth.
  #[must_use]
  pub fn empty() -> Self {
    Self::new(Arc::new(EmptyCancel))
  }

  /// Wraps a cleanup closure that runs at most once, on first cancellation.
  pub fn from_fn<F>(cleanup: F) -> Self
  where
    F: FnOnce() + Send + 'static, {
    Self::new(Arc::new(FnCancel { cleanup: Mutex::new(Some(Box::new(cleanup))) }))
  }

  /// Revokes the underlying resource.
  pub fn cancel(&self) {
    self.inner.cancel();
  }

  /// Returns whether the underlying resource has been cancelled.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.inner.is_cancelled()
  }
}

impl fmt::Debug for CancelHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CancelHandle").field("cancelled", &self.is_cancelled()).finish()
  }
}

struct EmptyCancel;

impl Cancellable for EmptyCancel {
  fn cancel(&self) {}

  fn is_cancelled(&self) -> bool {
    true
  }
}

struct FnCancel {
  cleanup: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Cancellable for FnCancel {
  fn cancel(&self) {
    let cleanup = self.cleanup.lock().take();
    if let Some(cleanup) = cleanup {
      cleanup();
    }
  }

  fn is_cancelled(&self) -> bool {
    self.cleanup.lock().is_none()
  }
}
