//! Shared cache of command text scans.
//!
//! The same command text is typically executed many times. Scanning it is
//! linear in its length, so results are kept in a bounded LRU map keyed by
//! `(command text, prefix)`.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Default number of cached scans.
pub const DEFAULT_CAPACITY: usize = 256;

/// Bounded, thread-safe map from `(command text, prefix)` to scan results.
pub struct ScanCache {
    entries: Mutex<LruCache<(String, String), Arc<Vec<String>>>>,
}

impl ScanCache {
    /// Create a cache holding at most `capacity` scans (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// The process-wide cache used by commands.
    pub fn shared() -> &'static ScanCache {
        static SHARED: Lazy<ScanCache> = Lazy::new(|| ScanCache::new(DEFAULT_CAPACITY));
        &SHARED
    }

    /// Distinct parameter names referenced by `sql`, reusing a cached scan
    /// when one exists.
    pub fn scan(&self, sql: &str, prefix: &str) -> Arc<Vec<String>> {
        let key = (sql.to_string(), prefix.to_string());

        if let Some(hit) = self.entries.lock().get(&key) {
            tracing::trace!(prefix = prefix, "scan cache hit");
            return Arc::clone(hit);
        }

        let scanned = Arc::new(dao_sql::extract_parameter_names(sql, prefix));
        self.entries.lock().put(key, Arc::clone(&scanned));
        scanned
    }

    /// Number of cached scans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every cached scan.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl std::fmt::Debug for ScanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("ScanCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
