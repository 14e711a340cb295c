//! Foreign single-threaded dispatch context contract.

use std::sync::Arc;

use super::WorkItem;

/// Single-threaded execution context accepting deferred callbacks.
///
/// `post` never blocks. Posted callbacks run later on the context's own
/// thread, in post order, never concurrently with each other or with the
/// thread that owns the context. The contract is safe for concurrent posts
/// from multiple callers.
pub trait DispatchContext: Send + Sync {
  /// Schedules `callback` to run on the context's thread.
  fn post(&self, callback: WorkItem);
}

/// Accessor injected into schedulers that capture the current context.
///
/// Passing the context through an accessor keeps capture explicit: a
/// scheduler asks once, at construction, and fails there when the calling
/// thread has no context, instead of failing at the first scheduling call.
pub trait DispatchContextProvider {
  /// Returns the context associated with the calling thread, when one
  /// exists.
  fn current(&self) -> Option<Arc<dyn DispatchContext>>;
}
