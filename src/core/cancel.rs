//! Cancellation handles and disposal-based cancellation primitives.

mod cancel_handle;
mod cancellable;
mod multi_assign_cancel;
mod single_assign_cancel;

pub use cancel_handle::CancelHandle;
pub use cancellable::Cancellable;
pub use multi_assign_cancel::MultiAssignCancel;
pub use single_assign_cancel::SingleAssignCancel;
