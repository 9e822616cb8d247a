//! Ports (trait definitions) for external dependencies
//!
//! This module defines the contracts (ports) that storage adapters must
//! implement. Following hexagonal architecture, the domain defines what it
//! needs and the infrastructure provides implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to ensure zero-cost abstractions and static dispatch.

use std::future::Future;

use serde_json::Value;

use crate::catalog::{Component, ComponentDraft, ComponentId, Result};

/// Port for the idempotency record store
///
/// The store maps caller-supplied keys to the serialized outcome of the
/// operation that first completed under that key. It is append-only per key:
/// a stored key is never overwritten with a different payload. The write
/// pipeline guarantees it stores at most once per key.
///
/// No expiry is modeled; implementations retain every key for the lifetime
/// relevant to retries. Implementations must be safe for concurrent
/// read/write from multiple tasks.
pub trait IdempotencyStore: Send + Sync {
    /// True if a result was previously recorded for `key`
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send;

    /// The recorded result for `key`, or `None` if nothing was recorded
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Record `value` under `key`; the first write for a key wins
    fn store(&self, key: &str, value: Value) -> impl Future<Output = Result<()>> + Send;
}

/// Port for the transactional component store
///
/// A store hands out transactions; every data primitive lives on the
/// transaction so that a unit of work is atomic by construction. Adapters
/// must convert their infrastructure errors into `CatalogError`, classifying
/// retryable faults (connection loss, deadlock, timeout) as
/// `TransientStorage`.
pub trait ComponentStore: Send + Sync {
    /// The transaction type handed to units of work
    type Tx: ComponentTransaction;

    /// Open a new transaction
    fn begin(&self) -> impl Future<Output = Result<Self::Tx>> + Send;
}

/// A single open transaction against the component table
///
/// Mutations are only observable to other transactions after [`commit`].
/// Dropping a transaction without committing discards every buffered effect
/// (rollback-on-drop).
///
/// [`commit`]: ComponentTransaction::commit
pub trait ComponentTransaction: Send {
    /// Insert a new component, assigning its id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Conflict` if the draft's unique number is
    /// already taken.
    fn insert(&mut self, draft: ComponentDraft) -> impl Future<Output = Result<Component>> + Send;

    /// Insert every draft, returning the inserted row count
    ///
    /// All-or-nothing together with the transaction boundary: a conflict on
    /// any draft fails the whole call.
    fn insert_many(
        &mut self,
        drafts: Vec<ComponentDraft>,
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Look up a component by id
    fn fetch(&mut self, id: ComponentId)
        -> impl Future<Output = Result<Option<Component>>> + Send;

    /// All components in insertion order
    fn fetch_all(&mut self) -> impl Future<Output = Result<Vec<Component>>> + Send;

    /// Overwrite the stored component with the same id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the id does not resolve, and
    /// `CatalogError::Conflict` if the new unique number collides with a
    /// different component.
    fn update(&mut self, component: Component) -> impl Future<Output = Result<()>> + Send;

    /// Remove a component by id; false if the id did not resolve
    fn remove(&mut self, id: ComponentId) -> impl Future<Output = Result<bool>> + Send;

    /// Remove every resolvable id, silently ignoring unknown ones
    ///
    /// Ids are resolved with targeted existence checks, never by scanning the
    /// whole table. Returns the removed row count.
    fn remove_many(&mut self, ids: Vec<ComponentId>) -> impl Future<Output = Result<u64>> + Send;

    /// Commit the transaction, making its effects durable and visible
    fn commit(self) -> impl Future<Output = Result<()>> + Send;
}
