//! Frame lifecycle: the redraw scheduler and a mounted frame driven by host events.

pub mod mounted;
pub mod scheduler;
