//! Platform-neutral scheduling contracts and machinery.

pub mod cancel;
pub mod error;
pub mod gate;
pub mod platform;
pub mod scheduler;
pub mod timer;

#[cfg(test)]
pub(crate) mod testkit;
