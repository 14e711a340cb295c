//! Mutual-exclusion gate serializing periodic tick bodies.

mod serial_gate;

pub use serial_gate::SerialGate;
