//! Adapters turning the platform timer primitive into cancellable resources.

mod busy_loop_timer;
mod interval_timer;
mod one_shot_timer;

pub use busy_loop_timer::BusyLoopTimer;
pub use interval_timer::IntervalTimer;
pub use one_shot_timer::OneShotTimer;
