//! In-process component store with serialized snapshot transactions
//!
//! This adapter implements the `ComponentStore` port against a process-local
//! table. A transaction takes the table lock as an owned guard and clones the
//! state into a working copy; mutations apply eagerly to the copy (so the
//! insert path hands back generated ids before commit) and `commit` writes
//! the copy back. Dropping the transaction releases the lock and discards the
//! copy - rollback for free. Holding the lock for the transaction's lifetime
//! fully serializes transactions, which keeps the semantics correct under
//! concurrent callers.

use std::collections::BTreeMap;
use std::future::{ready, Future};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use railyard_domain::catalog::{CatalogError, Component, ComponentDraft, ComponentId, Result};
use railyard_domain::ports::{ComponentStore, ComponentTransaction};

#[derive(Clone)]
struct TableState {
    /// Rows keyed by id; BTreeMap keeps insertion (= id) order for scans
    rows: BTreeMap<i64, Component>,
    next_id: i64,
}

/// In-process implementation of the `ComponentStore` port
#[derive(Clone)]
pub struct MemoryComponentStore {
    state: Arc<Mutex<TableState>>,
}

impl MemoryComponentStore {
    /// Create an empty store; the first generated id is 1
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Create a store preloaded with the seed catalog
    pub fn with_seed() -> Self {
        Self::with_rows(crate::seed::seed_catalog())
    }

    fn with_rows(rows: Vec<Component>) -> Self {
        let rows: BTreeMap<i64, Component> =
            rows.into_iter().map(|c| (c.id().as_i64(), c)).collect();
        let next_id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        Self {
            state: Arc::new(Mutex::new(TableState { rows, next_id })),
        }
    }
}

impl Default for MemoryComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore for MemoryComponentStore {
    type Tx = MemoryTransaction;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let guard = state.lock_owned().await;
            let work = guard.clone();
            debug!(rows = work.rows.len(), "opened transaction");
            Ok(MemoryTransaction { guard, work })
        }
    }
}

/// An open transaction over the in-process component table
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<TableState>,
    work: TableState,
}

impl MemoryTransaction {
    fn insert_row(&mut self, draft: ComponentDraft) -> Result<Component> {
        if self.unique_number_taken(&draft.unique_number, None) {
            return Err(CatalogError::conflict(draft.unique_number));
        }
        let id = ComponentId::new(self.work.next_id);
        self.work.next_id += 1;
        let component = Component::from_draft(id, draft);
        self.work.rows.insert(id.as_i64(), component.clone());
        Ok(component)
    }

    fn unique_number_taken(&self, unique_number: &str, excluding: Option<ComponentId>) -> bool {
        self.work.rows.values().any(|c| {
            c.unique_number() == unique_number && Some(c.id()) != excluding
        })
    }
}

impl ComponentTransaction for MemoryTransaction {
    #[instrument(skip(self, draft), fields(unique_number = %draft.unique_number))]
    fn insert(&mut self, draft: ComponentDraft) -> impl Future<Output = Result<Component>> + Send {
        ready(self.insert_row(draft))
    }

    fn insert_many(
        &mut self,
        drafts: Vec<ComponentDraft>,
    ) -> impl Future<Output = Result<u64>> + Send {
        let mut inserted = 0u64;
        let mut outcome = Ok(0);
        for draft in drafts {
            match self.insert_row(draft) {
                Ok(_) => inserted += 1,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        if outcome.is_ok() {
            debug!(inserted, "bulk insert staged");
            outcome = Ok(inserted);
        }
        ready(outcome)
    }

    fn fetch(
        &mut self,
        id: ComponentId,
    ) -> impl Future<Output = Result<Option<Component>>> + Send {
        ready(Ok(self.work.rows.get(&id.as_i64()).cloned()))
    }

    fn fetch_all(&mut self) -> impl Future<Output = Result<Vec<Component>>> + Send {
        ready(Ok(self.work.rows.values().cloned().collect()))
    }

    fn update(&mut self, component: Component) -> impl Future<Output = Result<()>> + Send {
        let outcome = if !self.work.rows.contains_key(&component.id().as_i64()) {
            Err(CatalogError::NotFound(component.id()))
        } else if self.unique_number_taken(component.unique_number(), Some(component.id())) {
            Err(CatalogError::conflict(component.unique_number()))
        } else {
            self.work.rows.insert(component.id().as_i64(), component);
            Ok(())
        };
        ready(outcome)
    }

    fn remove(&mut self, id: ComponentId) -> impl Future<Output = Result<bool>> + Send {
        ready(Ok(self.work.rows.remove(&id.as_i64()).is_some()))
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    fn remove_many(&mut self, ids: Vec<ComponentId>) -> impl Future<Output = Result<u64>> + Send {
        // Targeted per-id removal; unknown ids resolve to nothing.
        let removed = ids
            .into_iter()
            .filter(|id| self.work.rows.remove(&id.as_i64()).is_some())
            .count() as u64;
        debug!(removed, "bulk delete staged");
        ready(Ok(removed))
    }

    fn commit(self) -> impl Future<Output = Result<()>> + Send {
        let MemoryTransaction { mut guard, work } = self;
        *guard = work;
        ready(Ok(()))
    }
}
