//! In-process idempotency record store
//!
//! Keys map to the serialized outcome of the first operation that completed
//! under them. Records are append-only: `store` is insert-if-absent, so a
//! key can never be rebound to a different payload.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use railyard_domain::catalog::Result;
use railyard_domain::ports::IdempotencyStore;

struct IdempotencyRecord {
    payload: Value,
    stored_at: DateTime<Utc>,
}

/// In-process implementation of the `IdempotencyStore` port
#[derive(Clone)]
pub struct MemoryIdempotencyStore {
    entries: Arc<RwLock<HashMap<String, IdempotencyRecord>>>,
}

impl MemoryIdempotencyStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryIdempotencyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdempotencyStore for MemoryIdempotencyStore {
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send {
        let entries = Arc::clone(&self.entries);
        let key = key.to_string();
        async move { Ok(entries.read().await.contains_key(&key)) }
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send {
        let entries = Arc::clone(&self.entries);
        let key = key.to_string();
        async move { Ok(entries.read().await.get(&key).map(|r| r.payload.clone())) }
    }

    fn store(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send {
        let entries = Arc::clone(&self.entries);
        let key = key.to_string();
        async move {
            let mut entries = entries.write().await;
            let record = entries.entry(key.clone()).or_insert_with(|| IdempotencyRecord {
                payload: value,
                stored_at: Utc::now(),
            });
            debug!(key = %key, stored_at = %record.stored_at, "idempotency record present");
            Ok(())
        }
    }
}
