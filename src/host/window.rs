//! Headless stand-in for the browser window: current viewport plus resize listeners.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::foundation::core::Viewport;
use crate::geometry::viewport::ViewportSource;
use crate::host::events::{FrameEvent, FrameEventSender};

struct WindowInner {
    viewport: Viewport,
    listeners: BTreeMap<u64, FrameEventSender>,
    next_id: u64,
}

/// Shared handle to a host window. Clones refer to the same window.
#[derive(Clone)]
pub struct HostWindow {
    inner: Arc<Mutex<WindowInner>>,
}

impl HostWindow {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WindowInner {
                viewport,
                listeners: BTreeMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Update the viewport and post `Resized` to every listener.
    ///
    /// Listeners whose receiver is gone are pruned. Returns the number notified.
    pub fn resize(&self, viewport: Viewport) -> usize {
        let mut inner = lock(&self.inner);
        inner.viewport = viewport;
        inner
            .listeners
            .retain(|_, tx| tx.send(FrameEvent::Resized(viewport)).is_ok());
        inner.listeners.len()
    }

    /// Register `sender` for resize events until the returned guard is dropped.
    pub fn subscribe_resize(&self, sender: FrameEventSender) -> ResizeSubscription {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, sender);
        ResizeSubscription {
            window: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

impl ViewportSource for HostWindow {
    fn viewport(&self) -> Viewport {
        lock(&self.inner).viewport
    }
}

/// Scoped resize registration. Unregisters on drop, even if the window is already gone.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct ResizeSubscription {
    window: Weak<Mutex<WindowInner>>,
    id: u64,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.window.upgrade() {
            lock(&inner).listeners.remove(&self.id);
        }
    }
}

fn lock(inner: &Mutex<WindowInner>) -> MutexGuard<'_, WindowInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
