//! Minimal host environment: a resizable window and the frame event channel.

pub mod events;
pub mod liveness;
pub mod window;
