//! A bezel frame attached to a [`HostWindow`].
//!
//! Mounting draws once, subscribes to resizes and starts the texture load. Afterwards the owner
//! calls [`MountedFrame::pump`] (or [`MountedFrame::pump_blocking`]) on its own thread to turn
//! queued triggers into redraws; all drawing happens there.

use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::assets::texture::{TextureCache, TextureState};
use crate::config::{BezelConfig, RedrawPolicy};
use crate::foundation::error::BezelResult;
use crate::frame::scheduler::{DrawOutcome, DrawStats, RedrawScheduler};
use crate::host::events::{FrameEvent, FrameEventReceiver, event_channel};
use crate::host::liveness::Liveness;
use crate::host::window::{HostWindow, ResizeSubscription};
use crate::render::surface::{FrameRGBA, Surface};

/// Entry point for mounting frames.
pub struct BezelFrame;

impl BezelFrame {
    /// Attach a frame to `window`, drawing into `surface`.
    pub fn mount(
        window: &HostWindow,
        textures: Arc<TextureCache>,
        surface: Surface,
        config: &BezelConfig,
    ) -> BezelResult<MountedFrame> {
        config.validate()?;

        let (tx, rx) = event_channel();
        let subscription = window.subscribe_resize(tx.clone());
        let liveness = Liveness::new();

        let mut frame = MountedFrame {
            scheduler: RedrawScheduler::from_config(window.clone(), surface, textures, config),
            policy: config.redraw,
            events: rx,
            _subscription: subscription,
            liveness,
        };

        let token = frame.liveness.token();
        let state = frame.scheduler.textures().load(
            &config.texture_url,
            Box::new(move || {
                if token.is_alive() {
                    let _ = tx.send(FrameEvent::TextureReady);
                }
            }),
        );
        tracing::debug!(
            url = %config.texture_url,
            texture_ready = state.is_ready(),
            "frame mounted"
        );

        frame.handle(FrameEvent::Mounted);
        Ok(frame)
    }
}

/// A live frame. Dropping it revokes the texture callback and releases the resize listener.
pub struct MountedFrame {
    scheduler: RedrawScheduler<HostWindow>,
    policy: RedrawPolicy,
    events: FrameEventReceiver,
    _subscription: ResizeSubscription,
    liveness: Liveness,
}

impl MountedFrame {
    /// Process every queued trigger without blocking. Returns the number of draws performed.
    pub fn pump(&mut self) -> usize {
        let pending: Vec<FrameEvent> = self.events.try_iter().collect();
        self.dispatch(pending)
    }

    /// Wait up to `timeout` for the first trigger, then process everything queued.
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        match self.events.recv_timeout(timeout) {
            Ok(first) => {
                let mut pending = vec![first];
                pending.extend(self.events.try_iter());
                self.dispatch(pending)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => 0,
        }
    }

    fn dispatch(&mut self, events: Vec<FrameEvent>) -> usize {
        if events.is_empty() {
            return 0;
        }
        match self.policy {
            RedrawPolicy::Immediate => {
                for ev in &events {
                    self.handle(*ev);
                }
                events.len()
            }
            RedrawPolicy::Coalesced => {
                tracing::trace!(events = events.len(), "coalescing redraw triggers");
                self.handle(events[events.len() - 1]);
                1
            }
        }
    }

    fn handle(&mut self, event: FrameEvent) -> DrawOutcome {
        tracing::trace!(?event, "redraw trigger");
        self.scheduler.draw()
    }

    pub fn stats(&self) -> DrawStats {
        self.scheduler.stats()
    }

    /// Current pixels, premultiplied.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.scheduler.surface().frame()
    }

    /// State of this frame's texture in the shared cache.
    pub fn texture_state(&self) -> TextureState {
        self.scheduler
            .textures()
            .state(self.scheduler.texture_url())
    }

    pub fn scheduler(&self) -> &RedrawScheduler<HostWindow> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut RedrawScheduler<HostWindow> {
        &mut self.scheduler
    }

    /// Tear the frame down, returning its final counters.
    pub fn unmount(self) -> DrawStats {
        self.liveness.revoke();
        let stats = self.scheduler.stats();
        tracing::debug!(draws = stats.draws(), "frame unmounted");
        stats
    }
}
