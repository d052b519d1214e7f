//! TTL cache of filesystem stat metadata, keyed by absolute path.
//!
//! Metadata-dependent sorts would otherwise stat every visible path on each
//! redraw. The cache serves fresh entries synchronously, de-duplicates
//! concurrent fetches for the same path (one OS-level stat at a time), and
//! batches prefetches with progress reporting. Stat failures are cached as
//! `None` — a missing path is an answer, not an error.
//!
//! Callbacks always run from a spawned task, never inline in the caller's
//! stack, so a cache hit and a cache miss are observably the same shape.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::mpsc;

/// Default freshness window for cached entries.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Stat metadata relevant to sorting and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub created: Option<SystemTime>,
    pub is_dir: bool,
}

impl FileStat {
    fn from_metadata(meta: &std::fs::Metadata) -> Self {
        Self {
            size: meta.len(),
            modified: meta.modified().ok(),
            created: meta.created().ok(),
            is_dir: meta.is_dir(),
        }
    }
}

/// Callback invoked with the stat result once a fetch settles.
pub type StatCallback = Box<dyn FnOnce(Option<FileStat>) + Send + 'static>;

struct Entry {
    value: Option<FileStat>,
    fetched_at: Instant,
    pending: bool,
    waiters: Vec<StatCallback>,
}

impl Entry {
    fn pending() -> Self {
        Self {
            value: None,
            fetched_at: Instant::now(),
            pending: true,
            waiters: Vec::new(),
        }
    }
}

struct Inner {
    entries: HashMap<PathBuf, Entry>,
    stat_calls: u64,
}

/// Shared, injectable stat cache. Cloning yields a handle to the same map.
#[derive(Clone)]
pub struct StatCache {
    inner: Arc<Mutex<Inner>>,
    ttl: Duration,
}

impl Default for StatCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                stat_calls: 0,
            })),
            ttl,
        }
    }

    /// Cached value if present, settled and fresh. Never fetches.
    pub fn get(&self, path: &Path) -> Option<FileStat> {
        let inner = self.inner.lock().expect("stat cache lock");
        let entry = inner.entries.get(path)?;
        if entry.pending || entry.fetched_at.elapsed() >= self.ttl {
            return None;
        }
        entry.value.clone()
    }

    /// Whether a settled, fresh entry exists for `path`. A cached failure
    /// counts: knowing a path is missing is as good as knowing its stats.
    pub fn contains_fresh(&self, path: &Path) -> bool {
        let inner = self.inner.lock().expect("stat cache lock");
        inner
            .entries
            .get(path)
            .map(|e| !e.pending && e.fetched_at.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    /// Number of OS-level stat calls issued so far.
    #[allow(dead_code)]
    pub fn stat_calls(&self) -> u64 {
        self.inner.lock().expect("stat cache lock").stat_calls
    }

    /// Fetch metadata for `path`, invoking `callback` once settled.
    ///
    /// A fresh cached value is delivered on the next tick. If a fetch for
    /// this path is already in flight, the callback queues behind it rather
    /// than issuing a second stat.
    pub fn fetch(&self, path: &Path, callback: StatCallback) {
        {
            let mut inner = self.inner.lock().expect("stat cache lock");
            if let Some(entry) = inner.entries.get_mut(path) {
                if entry.pending {
                    entry.waiters.push(callback);
                    return;
                }
                if entry.fetched_at.elapsed() < self.ttl {
                    let value = entry.value.clone();
                    drop(inner);
                    tokio::spawn(async move { callback(value) });
                    return;
                }
            }
            inner.entries.insert(path.to_path_buf(), Entry::pending());
            inner.stat_calls += 1;
        }

        let cache = self.clone();
        let path = path.to_path_buf();
        tokio::spawn(async move {
            let value = match tokio::fs::metadata(&path).await {
                Ok(meta) => Some(FileStat::from_metadata(&meta)),
                Err(_) => None,
            };
            cache.settle(&path, value, callback);
        });
    }

    /// Store a fetch result and flush the initiating callback plus any
    /// queued waiters, in registration order.
    fn settle(&self, path: &Path, value: Option<FileStat>, callback: StatCallback) {
        let waiters = {
            let mut inner = self.inner.lock().expect("stat cache lock");
            match inner.entries.get_mut(path) {
                Some(entry) => {
                    entry.value = value.clone();
                    entry.fetched_at = Instant::now();
                    entry.pending = false;
                    std::mem::take(&mut entry.waiters)
                }
                None => Vec::new(),
            }
        };
        callback(value.clone());
        for waiter in waiters {
            waiter(value.clone());
        }
    }

    /// Fetch every path not already fresh, reporting progress per settled
    /// path and completion exactly once — even for an empty batch, where
    /// `on_complete` still runs deferred.
    pub fn prefetch<P, C>(&self, paths: Vec<PathBuf>, mut on_progress: P, on_complete: C)
    where
        P: FnMut(usize, usize) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        let total = paths.len();
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        for path in paths {
            let tx = tx.clone();
            self.fetch(
                &path,
                Box::new(move |_| {
                    let _ = tx.send(());
                }),
            );
        }
        drop(tx);

        tokio::spawn(async move {
            let mut done = 0;
            while rx.recv().await.is_some() {
                done += 1;
                on_progress(done, total);
            }
            on_complete();
        });
    }

    /// Cache hit returns immediately; a miss stats the filesystem on the
    /// calling thread. Failures are cached as `None` so a known-missing path
    /// does not re-block within the TTL window.
    pub fn get_blocking(&self, path: &Path) -> Option<FileStat> {
        if let Some(value) = self.get(path) {
            return Some(value);
        }
        {
            // a fresh None entry is also a hit — don't re-stat known-missing
            let inner = self.inner.lock().expect("stat cache lock");
            if let Some(entry) = inner.entries.get(path) {
                if !entry.pending && entry.fetched_at.elapsed() < self.ttl {
                    return entry.value.clone();
                }
            }
        }

        let value = std::fs::metadata(path)
            .ok()
            .map(|meta| FileStat::from_metadata(&meta));

        let mut inner = self.inner.lock().expect("stat cache lock");
        inner.stat_calls += 1;
        match inner.entries.get_mut(path) {
            // keep pending bookkeeping intact; the in-flight fetch will
            // still flush its waiters
            Some(entry) => {
                entry.value = value.clone();
                entry.fetched_at = Instant::now();
            }
            None => {
                inner.entries.insert(
                    path.to_path_buf(),
                    Entry {
                        value: value.clone(),
                        fetched_at: Instant::now(),
                        pending: false,
                        waiters: Vec::new(),
                    },
                );
            }
        }
        value
    }

    /// Drop all entries, or only those whose path starts with `prefix`.
    pub fn invalidate(&self, prefix: Option<&Path>) {
        let mut inner = self.inner.lock().expect("stat cache lock");
        match prefix {
            None => inner.entries.clear(),
            Some(prefix) => {
                inner.entries.retain(|path, _| !path.starts_with(prefix));
            }
        }
    }
}
