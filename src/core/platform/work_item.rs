//! Callback type aliases shared by the platform contracts.

/// One-shot unit of work handed to a platform service.
pub type WorkItem = Box<dyn FnOnce() + Send + 'static>;

/// Recurring callback invoked once per timer period or loop iteration.
pub type RepeatingWork = Box<dyn FnMut() + Send + 'static>;
