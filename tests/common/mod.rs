#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

use bezel::{BezelError, BezelResult, TextureCache, TextureFetcher, TextureKey};

pub fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "bezel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// Encoded PNG of a `w x h` image filled with `rgba`.
pub fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |_, _| image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Fetcher that blocks until the test opens its gate.
pub struct GatedFetcher {
    bytes: BezelResult<Vec<u8>>,
    gate: Mutex<Receiver<()>>,
    calls: AtomicUsize,
}

impl GatedFetcher {
    pub fn new(bytes: BezelResult<Vec<u8>>) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = channel();
        let f = Arc::new(Self {
            bytes,
            gate: Mutex::new(rx),
            calls: AtomicUsize::new(0),
        });
        (f, tx)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextureFetcher for GatedFetcher {
    fn fetch(&self, _key: &TextureKey) -> BezelResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate
            .lock()
            .unwrap()
            .recv()
            .map_err(|_| BezelError::texture("gate closed"))?;
        match &self.bytes {
            Ok(b) => Ok(b.clone()),
            Err(e) => Err(BezelError::texture(e.to_string())),
        }
    }
}

/// Fetcher that answers immediately.
pub struct StaticFetcher(pub Option<Vec<u8>>);

impl TextureFetcher for StaticFetcher {
    fn fetch(&self, key: &TextureKey) -> BezelResult<Vec<u8>> {
        self.0
            .clone()
            .ok_or_else(|| BezelError::texture(format!("no texture at '{key}'")))
    }
}

/// Poll `cache` until `url` settles or the deadline passes.
pub fn wait_settled(cache: &TextureCache, url: &str) -> bezel::TextureState {
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    loop {
        let s = cache.state(url);
        if !matches!(s, bezel::TextureState::Loading | bezel::TextureState::Unloaded)
            || std::time::Instant::now() > deadline
        {
            return s;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}
