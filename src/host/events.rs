use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

use crate::foundation::core::Viewport;

/// Redraw trigger delivered to a mounted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameEvent {
    /// The frame was attached to its window.
    Mounted,
    /// The window's viewport changed.
    Resized(Viewport),
    /// The grain texture finished loading.
    TextureReady,
}

pub type FrameEventSender = Sender<FrameEvent>;
pub type FrameEventReceiver = Receiver<FrameEvent>;

pub fn event_channel() -> (FrameEventSender, FrameEventReceiver) {
    mpsc::channel()
}
