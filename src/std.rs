//! Platform services for standard (threaded) environments.

pub mod concurrency;
pub mod dispatch;
pub mod timer;
