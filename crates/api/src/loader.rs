use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use entity::employee::Employee;
use store::cache::FreshnessCache;
use store::records::RecordStore;

pub const MAX_BATCH: usize = 100;

/// Request-scoped loader handle. Keys collected within one request are
/// fetched together, and a key that has settled once resolves from the
/// request's own memo without another fetch.
pub type EmployeeBatcher = DataLoader<EmployeeLoader, HashMapCache>;

/// Answers batched single-record reads: the freshness cache first,
/// then one store fetch for whatever is left. Missing ids are simply
/// absent from the batch result, never an error.
pub struct EmployeeLoader {
    store: Arc<RecordStore>,
    cache: FreshnessCache,
    fetches: Arc<AtomicU64>,
}

impl EmployeeLoader {
    pub fn new(store: Arc<RecordStore>, cache: FreshnessCache) -> Self {
        Self {
            store,
            cache,
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counter of store round-trips, observable after the loader has
    /// been handed to a [`DataLoader`].
    pub fn fetch_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.fetches)
    }

    pub fn batched(self) -> EmployeeBatcher {
        DataLoader::with_cache(self, tokio::spawn, HashMapCache::default())
            .max_batch_size(MAX_BATCH)
    }
}

impl Loader<String> for EmployeeLoader {
    type Value = Employee;
    type Error = Infallible;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Employee>, Self::Error> {
        let mut found = HashMap::new();
        let mut misses = Vec::new();
        for key in keys {
            match self.cache.get(key).await {
                Some(employee) => {
                    found.insert(key.clone(), employee);
                }
                None => misses.push(key.clone()),
            }
        }
        if !misses.is_empty() {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(batch = misses.len(), "employee batch fetch");
            for (id, employee) in self.store.find_employees(&misses).await {
                self.cache.set(employee.clone()).await;
                found.insert(id, employee);
            }
        }
        Ok(found)
    }
}
