//! Process-lifetime cache for the bezel grain texture.
//!
//! Each url moves through `Unloaded -> Loading -> Ready | Failed` exactly once. The fetch runs on
//! a dedicated loader thread; the cache entry is the single writer and every draw afterwards
//! only reads the settled state. Nothing is ever invalidated or retried.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{BezelError, BezelResult};

/// Cache key of a texture: its url reduced to `/`-joined relative segments.
///
/// `\` separators, empty segments and `.` segments are dropped, so different spellings of one
/// file share a cache entry and a single fetch. Absolute urls and `..` segments are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey(String);

impl TextureKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location of the texture below a fetcher root.
    pub fn rel_path(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl FromStr for TextureKey {
    type Err = BezelError;

    fn from_str(url: &str) -> BezelResult<Self> {
        if url.starts_with(['/', '\\']) {
            return Err(BezelError::validation(format!(
                "texture url '{url}' is absolute"
            )));
        }
        let segments = url
            .split(['/', '\\'])
            .filter(|seg| !matches!(*seg, "" | "."))
            .map(|seg| match seg {
                ".." => Err(BezelError::validation(format!(
                    "texture url '{url}' climbs out of its root"
                ))),
                _ => Ok(seg),
            })
            .collect::<BezelResult<Vec<&str>>>()?;
        if segments.is_empty() {
            return Err(BezelError::validation(format!(
                "texture url '{url}' names no file"
            )));
        }
        Ok(Self(segments.join("/")))
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of raw texture bytes.
pub trait TextureFetcher: Send + Sync {
    /// Fetch the encoded bytes behind `key`. May block; it runs on the loader thread.
    fn fetch(&self, key: &TextureKey) -> BezelResult<Vec<u8>>;
}

/// Reads textures from files below a root directory.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher resolving keys relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureFetcher for FsFetcher {
    fn fetch(&self, key: &TextureKey) -> BezelResult<Vec<u8>> {
        let p = self.root.join(key.rel_path());
        std::fs::read(&p).map_err(|e| {
            BezelError::texture(format!("failed to read texture '{}': {e}", p.display()))
        })
    }
}

/// Lifecycle of one cached texture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureState {
    /// Never requested.
    #[default]
    Unloaded,
    /// Fetch in flight.
    Loading,
    /// Decoded and cached for the rest of the process.
    Ready(PreparedImage),
    /// Fetch or decode failed; permanent.
    Failed,
}

impl TextureState {
    /// Decoded image when the state is `Ready`.
    pub fn image(&self) -> Option<&PreparedImage> {
        match self {
            Self::Ready(img) => Some(img),
            _ => None,
        }
    }

    /// `true` once the image is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// One-shot notification fired on the loader thread after a successful load.
pub type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct Entry {
    state: TextureState,
    waiters: Vec<ReadyCallback>,
}

/// Texture cache keyed by [`TextureKey`].
pub struct TextureCache {
    fetcher: Arc<dyn TextureFetcher>,
    entries: Mutex<HashMap<TextureKey, Entry>>,
    fetches: AtomicUsize,
}

static GLOBAL: OnceLock<Arc<TextureCache>> = OnceLock::new();

impl TextureCache {
    /// Standalone cache backed by `fetcher`.
    pub fn new(fetcher: Arc<dyn TextureFetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Process-wide cache. Reads from the working directory unless [`Self::install_global`]
    /// ran first.
    pub fn global() -> Arc<TextureCache> {
        GLOBAL
            .get_or_init(|| Arc::new(TextureCache::new(Arc::new(FsFetcher::new(".")))))
            .clone()
    }

    /// Initialize the process-wide cache with a specific fetcher. Fails once it exists.
    pub fn install_global(fetcher: Arc<dyn TextureFetcher>) -> BezelResult<Arc<TextureCache>> {
        let cache = Arc::new(TextureCache::new(fetcher));
        GLOBAL
            .set(cache.clone())
            .map_err(|_| BezelError::validation("global texture cache already initialized"))?;
        Ok(cache)
    }

    /// Request `url`, registering `on_ready`.
    ///
    /// Only the first call for a key starts a fetch. While the fetch is in flight further
    /// callbacks queue up and each fires once on success. Once the state has settled the callback
    /// is dropped unfired. A url that is not a valid key is `Failed` without a fetch. Returns the
    /// state after the call.
    pub fn load(self: &Arc<Self>, url: &str, on_ready: ReadyCallback) -> TextureState {
        let key = match url.parse::<TextureKey>() {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(url, error = %e, "texture url rejected; grain layer disabled");
                return TextureState::Failed;
            }
        };
        {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();
            match entry.state {
                TextureState::Unloaded => {
                    entry.state = TextureState::Loading;
                    entry.waiters.push(on_ready);
                }
                TextureState::Loading => {
                    entry.waiters.push(on_ready);
                    return TextureState::Loading;
                }
                _ => return entry.state.clone(),
            }
        }

        self.spawn_fetch(key.clone());
        self.state_of(&key)
    }

    /// Current state of `url`; `Failed` when it is not a valid key.
    pub fn state(&self, url: &str) -> TextureState {
        match url.parse::<TextureKey>() {
            Ok(key) => self.state_of(&key),
            Err(_) => TextureState::Failed,
        }
    }

    fn state_of(&self, key: &TextureKey) -> TextureState {
        self.lock()
            .get(key)
            .map(|e| e.state.clone())
            .unwrap_or_default()
    }

    /// Number of fetches started over the cache lifetime.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn spawn_fetch(self: &Arc<Self>, key: TextureKey) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let cache = Arc::clone(self);
        let thread_key = key.clone();
        let spawned = std::thread::Builder::new()
            .name("bezel-texture".to_owned())
            .spawn(move || {
                let result = cache.fetch_and_decode(&thread_key);
                cache.complete(&thread_key, result);
            });
        if let Err(e) = spawned {
            self.complete(
                &key,
                Err(BezelError::texture(format!("spawn texture loader: {e}"))),
            );
        }
    }

    #[tracing::instrument(skip_all, fields(key = %key))]
    fn fetch_and_decode(&self, key: &TextureKey) -> BezelResult<PreparedImage> {
        let bytes = self.fetcher.fetch(key)?;
        decode_image(&bytes)
    }

    fn complete(&self, key: &TextureKey, result: BezelResult<PreparedImage>) {
        let url = key.as_str();
        let waiters = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();
            match result {
                Ok(img) => {
                    tracing::debug!(url, width = img.width, height = img.height, "texture ready");
                    entry.state = TextureState::Ready(img);
                    std::mem::take(&mut entry.waiters)
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "texture load failed; grain layer disabled");
                    entry.state = TextureState::Failed;
                    entry.waiters.clear();
                    Vec::new()
                }
            }
        };

        // Outside the lock: callbacks may read the cache.
        for cb in waiters {
            cb();
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TextureKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
