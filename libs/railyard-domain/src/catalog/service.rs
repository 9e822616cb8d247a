//! Component service - the idempotent, transactional write pipeline
//!
//! The service orchestrates idempotency check, transactional mutation and
//! idempotency recording for every catalog operation. Keyed operations
//! (create, bulk insert, bulk delete) serialize per idempotency key, consult
//! the idempotency store, run the mutation through the transactional
//! executor and record the outcome so replays return it without touching the
//! repository again. Unkeyed operations run straight through the executor.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::catalog::entity::{Component, ComponentDraft};
use crate::catalog::error::{CatalogError, Result};
use crate::catalog::executor::{RetryPolicy, TransactionalExecutor};
use crate::catalog::ids::ComponentId;
use crate::ports::{ComponentStore, ComponentTransaction, IdempotencyStore};

/// Configuration for the component service
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Retry budget applied by the transactional executor
    pub retry: RetryPolicy,
}

/// Service for the component catalog
///
/// The service is generic over any [`ComponentStore`] and
/// [`IdempotencyStore`] implementation; the compiler generates specialized
/// versions for each concrete pair, so the abstractions cost nothing at
/// runtime.
///
/// ## Idempotency guarantee
///
/// For a fixed key, calling `create` any number of times - concurrently
/// included - persists exactly one component and returns the same output on
/// every call. Concurrent callers with the same key serialize on a per-key
/// lock, so the second caller observes the first caller's recorded result
/// instead of re-running the mutation. Failed mutations are never recorded:
/// a retry after a failure runs the mutation fresh.
pub struct ComponentService<S, I> {
    executor: TransactionalExecutor<S>,
    idempotency: I,
    key_locks: KeyLocks,
}

impl<S, I> ComponentService<S, I>
where
    S: ComponentStore,
    I: IdempotencyStore,
{
    /// Create a new ComponentService with the given stores and configuration
    pub fn new(store: S, idempotency: I, config: CatalogConfig) -> Self {
        Self {
            executor: TransactionalExecutor::new(store, config.retry),
            idempotency,
            key_locks: KeyLocks::new(),
        }
    }

    /// Create a new ComponentService with default configuration
    pub fn with_defaults(store: S, idempotency: I) -> Self {
        Self::new(store, idempotency, CatalogConfig::default())
    }

    /// Create a component, guarded by the caller's idempotency key
    ///
    /// A replay under a key that already completed returns the recorded
    /// component without re-running the insert.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Conflict` if the unique number is already taken
    /// - `CatalogError::TransientStorage` once the retry budget is exhausted
    pub async fn create(&self, draft: ComponentDraft, key: &str) -> Result<Component> {
        let _guard = self.key_locks.acquire(key).await;
        if let Some(recorded) = self.idempotency.get(key).await? {
            return decode(recorded);
        }

        let created = self
            .executor
            .execute(|tx| {
                let draft = draft.clone();
                Box::pin(async move { tx.insert(draft).await })
            })
            .await?;

        self.idempotency.store(key, encode(&created)?).await?;
        Ok(created)
    }

    /// Map the draft's fields onto the component with the given id
    ///
    /// Fetch, field copy and persist run as one transactional unit.
    ///
    /// # Errors
    ///
    /// - `CatalogError::NotFound` if the id does not resolve
    /// - `CatalogError::Conflict` if the new unique number collides
    pub async fn update(&self, id: ComponentId, draft: ComponentDraft) -> Result<()> {
        self.executor
            .execute(|tx| {
                let draft = draft.clone();
                Box::pin(async move {
                    let mut component = tx
                        .fetch(id)
                        .await?
                        .ok_or(CatalogError::NotFound(id))?;
                    component.apply_draft(&draft);
                    tx.update(component).await
                })
            })
            .await
    }

    /// Remove the component with the given id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id does not resolve.
    pub async fn delete(&self, id: ComponentId) -> Result<()> {
        self.executor
            .execute(|tx| {
                Box::pin(async move {
                    if tx.remove(id).await? {
                        Ok(())
                    } else {
                        Err(CatalogError::NotFound(id))
                    }
                })
            })
            .await
    }

    /// Look up a component by id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id does not resolve.
    pub async fn get(&self, id: ComponentId) -> Result<Component> {
        self.executor
            .execute(|tx| {
                Box::pin(async move { tx.fetch(id).await?.ok_or(CatalogError::NotFound(id)) })
            })
            .await
    }

    /// All components, in insertion order
    pub async fn get_all(&self) -> Result<Vec<Component>> {
        self.executor
            .execute(|tx| Box::pin(async move { tx.fetch_all().await }))
            .await
    }

    /// Insert every draft in one all-or-nothing transaction
    ///
    /// Returns the inserted row count; a replay under a completed key
    /// returns the recorded count without touching the repository.
    ///
    /// # Errors
    ///
    /// `CatalogError::Conflict` on any duplicate unique number, in which case
    /// none of the drafts are persisted.
    pub async fn bulk_insert(&self, drafts: Vec<ComponentDraft>, key: &str) -> Result<u64> {
        let _guard = self.key_locks.acquire(key).await;
        if let Some(recorded) = self.idempotency.get(key).await? {
            return decode(recorded);
        }

        let inserted = self
            .executor
            .execute(|tx| {
                let drafts = drafts.clone();
                Box::pin(async move { tx.insert_many(drafts).await })
            })
            .await?;

        self.idempotency.store(key, encode(&inserted)?).await?;
        Ok(inserted)
    }

    /// Remove every resolvable id in one transaction
    ///
    /// Unknown ids are silently ignored. Returns the removed row count; a
    /// replay under a completed key returns the recorded count without
    /// touching the repository.
    pub async fn bulk_delete(&self, ids: Vec<ComponentId>, key: &str) -> Result<u64> {
        let _guard = self.key_locks.acquire(key).await;
        if let Some(recorded) = self.idempotency.get(key).await? {
            return decode(recorded);
        }

        let removed = self
            .executor
            .execute(|tx| {
                let ids = ids.clone();
                Box::pin(async move { tx.remove_many(ids).await })
            })
            .await?;

        self.idempotency.store(key, encode(&removed)?).await?;
        Ok(removed)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|err| CatalogError::internal(format!("unencodable idempotency payload: {err}")))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| CatalogError::internal(format!("undecodable idempotency payload: {err}")))
}

/// Per-key lock table serializing same-key pipeline invocations
///
/// The idempotency check-then-record sequence is not atomic on its own; the
/// lock makes concurrent callers with the same key mutually exclusive, so at
/// most one of them runs the mutation. Entries are retained for the process
/// lifetime, matching the idempotency store's no-expiry retention.
struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_same_key_acquisitions_are_exclusive() {
        let locks = KeyLocks::new();

        let held = locks.acquire("key-1").await;
        let blocked = timeout(Duration::from_millis(20), locks.acquire("key-1")).await;
        assert!(blocked.is_err(), "second acquisition should block");

        drop(held);
        let reacquired = timeout(Duration::from_millis(20), locks.acquire("key-1")).await;
        assert!(reacquired.is_ok(), "lock should be free again");
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let locks = KeyLocks::new();

        let _held = locks.acquire("key-1").await;
        let other = timeout(Duration::from_millis(20), locks.acquire("key-2")).await;
        assert!(other.is_ok(), "distinct keys must not contend");
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let component = Component::from_parts(ComponentId::new(5), "Seat", "STS234", true, Some(2));
        let value = encode(&component).unwrap();
        let back: Component = decode(value).unwrap();
        assert_eq!(back, component);
    }

    #[test]
    fn test_decode_mismatch_is_internal_error() {
        let result: Result<Component> = decode(Value::String("not a component".to_string()));
        assert!(matches!(result, Err(CatalogError::Internal(_))));
    }
}
