use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use entity::employee::Employee;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const DEFAULT_TTL_SECS: u64 = 300;

/// Shared read cache for single-record lookups. Each entry carries its
/// own freshness deadline; a stale entry is treated as absent on read
/// and reclaimed later by [`FreshnessCache::sweep`]. Clones share the
/// same underlying map.
#[derive(Debug, Clone)]
pub struct FreshnessCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Employee,
    expires_at: Instant,
}

/// Point-in-time counters from [`FreshnessCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FreshnessCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the cached record if it is still fresh. An expired entry
    /// counts as a miss even though it has not been reclaimed yet.
    pub async fn get(&self, id: &str) -> Option<Employee> {
        let entries = self.entries.read().await;
        match entries.get(id) {
            Some(entry) if entry.expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Stores a record under its own id with a fresh deadline,
    /// replacing any previous entry.
    pub async fn set(&self, value: Employee) {
        let entry = CacheEntry {
            expires_at: Instant::now() + self.ttl,
            value,
        };
        self.entries
            .write()
            .await
            .insert(entry.value.id.clone(), entry);
    }

    pub async fn invalidate(&self, id: &str) {
        self.entries.write().await.remove(id);
    }

    pub async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }

    /// Drops every entry past its deadline and reports how many were
    /// reclaimed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().await.len(),
        }
    }
}
