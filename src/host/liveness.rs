use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner side of a liveness flag. Revoked on drop.
#[derive(Debug)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

/// Observer side handed to asynchronous callbacks.
#[derive(Clone, Debug)]
pub struct LivenessToken {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: Arc::clone(&self.alive),
        }
    }

    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Liveness {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}
