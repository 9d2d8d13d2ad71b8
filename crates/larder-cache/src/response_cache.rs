use crate::disk::DiskStore;
use crate::error::CacheError;
use crate::key::CacheKey;
use crate::record::CacheRecord;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

/// Snapshot of cache activity counters.
///
/// `evictions` counts entries dropped lazily: expired at lookup time, or
/// unreadable from disk.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    file_name: String,
    expires_at: SystemTime,
}

/// Disk-backed response cache with lazy expiration.
///
/// An explicitly constructed, owned instance. Callers open one and pass it
/// by reference to whatever issues requests. Freshness lives in an
/// in-memory index guarded by a single mutex; the lock is held only for
/// index mutation, never across disk I/O. Expiry happens at lookup time by
/// comparing against the stored deadline; there is no background sweeper.
///
/// The index is process-local: a reopened cache starts cold, and files left
/// behind by an earlier process are simply overwritten by later stores.
pub struct ResponseCache {
    disk: DiskStore,
    index: Mutex<HashMap<CacheKey, IndexEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    stores: AtomicU64,
    evictions: AtomicU64,
}

impl ResponseCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self {
            disk: DiskStore::open(dir)?,
            index: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stores: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        self.disk.dir()
    }

    /// Look up a fresh record for `key`.
    ///
    /// A stale entry, or one whose file cannot be read back, is dropped and
    /// reported as a miss; read failures never propagate to the caller.
    pub fn lookup(&self, key: &CacheKey) -> Option<CacheRecord> {
        self.lookup_at(key, SystemTime::now())
    }

    /// [`lookup`](Self::lookup) with an explicit clock, so freshness is
    /// testable without sleeping.
    pub fn lookup_at(&self, key: &CacheKey, now: SystemTime) -> Option<CacheRecord> {
        let entry = self.index.lock().get(key).cloned();
        let Some(entry) = entry else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };

        if now >= entry.expires_at {
            self.evict(key, &entry.file_name);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match self.disk.read(&entry.file_name) {
            Ok(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            Err(e) => {
                tracing::warn!(error = %e, file = %entry.file_name, "unreadable cache entry, evicting");
                self.evict(key, &entry.file_name);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Persist `record` under `key` for `ttl_seconds`.
    ///
    /// A TTL of 0 is a no-op: nothing touches the disk or the index. Write
    /// failures propagate so the caller can log them, but an existing entry
    /// is left as it was.
    pub fn store(
        &self,
        key: &CacheKey,
        record: &CacheRecord,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        self.store_at(key, record, ttl_seconds, SystemTime::now())
    }

    /// [`store`](Self::store) with an explicit clock.
    pub fn store_at(
        &self,
        key: &CacheKey,
        record: &CacheRecord,
        ttl_seconds: u64,
        now: SystemTime,
    ) -> Result<(), CacheError> {
        if ttl_seconds == 0 {
            return Ok(());
        }
        let file_name = DiskStore::file_name_for(key);
        self.disk.write(&file_name, record)?;

        let entry = IndexEntry {
            file_name,
            expires_at: now + Duration::from_secs(ttl_seconds),
        };
        self.index.lock().insert(key.clone(), entry);
        self.stores.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Drop one entry. Returns whether it was present.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let removed = self.index.lock().remove(key);
        match removed {
            Some(entry) => {
                self.disk.remove(&entry.file_name);
                true
            }
            None => false,
        }
    }

    /// Drop every entry and every persisted file.
    pub fn clear(&self) {
        self.index.lock().clear();
        if let Err(e) = self.disk.clear() {
            tracing::warn!(error = %e, dir = %self.disk.dir().display(), "failed to clear cache directory");
        }
    }

    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn evict(&self, key: &CacheKey, file_name: &str) {
        self.index.lock().remove(key);
        self.disk.remove(file_name);
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}
