//! Contract implemented by every cancellable resource.

/// A resource whose pending or recurring work can be revoked.
///
/// Cancellation is cooperative and idempotent: calling [`Cancellable::cancel`]
/// more than once is a no-op past the first effective call, never surfaces an
/// error, and never double-releases an underlying platform resource. An
/// action already in flight when its resource is cancelled is allowed to
/// finish, but must not reschedule.
pub trait Cancellable: Send + Sync {
  /// Revokes the pending or recurring work guarded by this resource.
  fn cancel(&self);

  /// Returns whether this resource has been cancelled.
  fn is_cancelled(&self) -> bool;
}
