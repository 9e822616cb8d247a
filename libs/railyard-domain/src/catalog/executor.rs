//! Transactional executor - transaction boundary and retry discipline
//!
//! Every catalog operation, reads included, runs through this executor so
//! that the same transaction/retry treatment applies uniformly. The executor
//! opens a transaction, runs the unit of work against it, commits on success
//! and otherwise lets the transaction roll back by drop. Transient
//! infrastructure failures re-run the whole open/run/commit sequence from
//! scratch under a bounded backoff budget; business failures propagate
//! immediately.
//!
//! Retrying at the transaction boundary rather than per statement avoids
//! partially applied units of work: a failed attempt never committed, so
//! re-execution cannot duplicate effects.

use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::warn;

use crate::catalog::error::Result;
use crate::ports::{ComponentStore, ComponentTransaction};

/// Bounded retry budget with exponential backoff
///
/// Defaults mirror a conventional database execution strategy: 5 attempts,
/// 50ms base delay doubling per attempt, capped at 1s.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// The backoff delay after the given 1-based attempt number
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}

/// Runs units of work transactionally, retrying transient failures
///
/// The executor owns the store; callers hand it closures in the boxed
/// transaction-callback shape and get back the committed result. A unit of
/// work must be safe to re-run from scratch - the write pipeline guarantees
/// this through its idempotency keys, and a failed attempt never committed.
pub struct TransactionalExecutor<S> {
    store: S,
    policy: RetryPolicy,
}

impl<S> TransactionalExecutor<S>
where
    S: ComponentStore,
{
    /// Create an executor over the given store and retry policy
    pub fn new(store: S, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    /// Get the retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` inside a transaction, committing on success
    ///
    /// The sequence is: begin, run `op` against the open transaction, commit,
    /// return the value. Any failure leaves the transaction uncommitted and
    /// is propagated unchanged - unless it is transient, in which case the
    /// whole sequence re-runs after a backoff delay, up to the policy's
    /// attempt budget.
    ///
    /// # Errors
    ///
    /// Whatever `op`, `begin` or `commit` failed with; a transient failure is
    /// only surfaced once the retry budget is exhausted.
    pub async fn execute<T, F>(&self, op: F) -> Result<T>
    where
        T: Send,
        F: for<'t> Fn(&'t mut S::Tx) -> BoxFuture<'t, Result<T>> + Send + Sync,
    {
        let mut attempt: u32 = 1;
        loop {
            match self.run_once(&op).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient storage failure, retrying transaction"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn run_once<T, F>(&self, op: &F) -> Result<T>
    where
        F: for<'t> Fn(&'t mut S::Tx) -> BoxFuture<'t, Result<T>> + Send + Sync,
    {
        let mut tx = self.store.begin().await?;
        let value = op(&mut tx).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::entity::{Component, ComponentDraft};
    use crate::catalog::error::CatalogError;
    use crate::catalog::ids::ComponentId;
    use std::future::{ready, Future};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Store double with scriptable begin/commit failures.
    #[derive(Clone, Default)]
    struct ScriptedStore {
        begin_failures: Arc<AtomicU32>,
        commit_failures: Arc<AtomicU32>,
        begins: Arc<AtomicU32>,
        commits: Arc<AtomicU32>,
    }

    impl ScriptedStore {
        fn take_failure(counter: &AtomicU32) -> bool {
            counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    struct ScriptedTx {
        commit_failures: Arc<AtomicU32>,
        commits: Arc<AtomicU32>,
    }

    impl ComponentStore for ScriptedStore {
        type Tx = ScriptedTx;

        fn begin(&self) -> impl Future<Output = Result<Self::Tx>> + Send {
            self.begins.fetch_add(1, Ordering::SeqCst);
            let outcome = if Self::take_failure(&self.begin_failures) {
                Err(CatalogError::transient("injected begin failure"))
            } else {
                Ok(ScriptedTx {
                    commit_failures: Arc::clone(&self.commit_failures),
                    commits: Arc::clone(&self.commits),
                })
            };
            ready(outcome)
        }
    }

    // Data primitives are not exercised by executor tests; the ops under test
    // drive their own outcomes.
    impl ComponentTransaction for ScriptedTx {
        fn insert(
            &mut self,
            _draft: ComponentDraft,
        ) -> impl Future<Output = Result<Component>> + Send {
            ready(Err(CatalogError::internal("unused")))
        }

        fn insert_many(
            &mut self,
            _drafts: Vec<ComponentDraft>,
        ) -> impl Future<Output = Result<u64>> + Send {
            ready(Ok(0))
        }

        fn fetch(
            &mut self,
            _id: ComponentId,
        ) -> impl Future<Output = Result<Option<Component>>> + Send {
            ready(Ok(None))
        }

        fn fetch_all(&mut self) -> impl Future<Output = Result<Vec<Component>>> + Send {
            ready(Ok(Vec::new()))
        }

        fn update(&mut self, _component: Component) -> impl Future<Output = Result<()>> + Send {
            ready(Ok(()))
        }

        fn remove(&mut self, _id: ComponentId) -> impl Future<Output = Result<bool>> + Send {
            ready(Ok(false))
        }

        fn remove_many(
            &mut self,
            _ids: Vec<ComponentId>,
        ) -> impl Future<Output = Result<u64>> + Send {
            ready(Ok(0))
        }

        fn commit(self) -> impl Future<Output = Result<()>> + Send {
            let outcome = if ScriptedStore::take_failure(&self.commit_failures) {
                Err(CatalogError::transient("injected commit failure"))
            } else {
                self.commits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            };
            ready(outcome)
        }
    }

    fn no_backoff(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_success_commits_once() {
        let store = ScriptedStore::default();
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(5));

        let value = executor
            .execute(|_tx| Box::pin(async move { Ok(42) }))
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(store.begins.load(Ordering::SeqCst), 1);
        assert_eq!(store.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_op_failure_is_retried() {
        let store = ScriptedStore::default();
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(5));

        let calls = Arc::new(AtomicU32::new(0));
        let op_calls = Arc::clone(&calls);
        let value = executor
            .execute(move |_tx| {
                let op_calls = Arc::clone(&op_calls);
                Box::pin(async move {
                    if op_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(CatalogError::transient("connection reset"))
                    } else {
                        Ok(7)
                    }
                })
            })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // The failed attempt never committed.
        assert_eq!(store.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_business_failure_is_not_retried() {
        let store = ScriptedStore::default();
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(5));

        let calls = Arc::new(AtomicU32::new(0));
        let op_calls = Arc::clone(&calls);
        let result: Result<()> = executor
            .execute(move |_tx| {
                let op_calls = Arc::clone(&op_calls);
                Box::pin(async move {
                    op_calls.fetch_add(1, Ordering::SeqCst);
                    Err(CatalogError::NotFound(ComponentId::new(9999)))
                })
            })
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_budget_surfaces_transient_error() {
        let store = ScriptedStore::default();
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(3));

        let calls = Arc::new(AtomicU32::new(0));
        let op_calls = Arc::clone(&calls);
        let result: Result<()> = executor
            .execute(move |_tx| {
                let op_calls = Arc::clone(&op_calls);
                Box::pin(async move {
                    op_calls.fetch_add(1, Ordering::SeqCst);
                    Err(CatalogError::transient("deadlock"))
                })
            })
            .await;

        assert!(matches!(result, Err(CatalogError::TransientStorage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.commits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transient_begin_failure_is_retried() {
        let store = ScriptedStore::default();
        store.begin_failures.store(1, Ordering::SeqCst);
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(5));

        let value = executor
            .execute(|_tx| Box::pin(async move { Ok("ok") }))
            .await
            .unwrap();

        assert_eq!(value, "ok");
        assert_eq!(store.begins.load(Ordering::SeqCst), 2);
        assert_eq!(store.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_commit_failure_reruns_whole_unit() {
        let store = ScriptedStore::default();
        store.commit_failures.store(1, Ordering::SeqCst);
        let executor = TransactionalExecutor::new(store.clone(), no_backoff(5));

        let calls = Arc::new(AtomicU32::new(0));
        let op_calls = Arc::clone(&calls);
        executor
            .execute(move |_tx| {
                let op_calls = Arc::clone(&op_calls);
                Box::pin(async move {
                    op_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            })
            .await
            .unwrap();

        // Both the operation and the commit re-ran from scratch.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.begins.load(Ordering::SeqCst), 2);
        assert_eq!(store.commits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_and_caps() {
        let store = ScriptedStore::default();
        let executor = TransactionalExecutor::new(
            store,
            RetryPolicy {
                max_attempts: 4,
                base_delay: Duration::from_millis(100),
                max_delay: Duration::from_millis(300),
            },
        );

        let started = tokio::time::Instant::now();
        let result: Result<()> = executor
            .execute(|_tx| Box::pin(async move { Err(CatalogError::transient("timeout")) }))
            .await;

        assert!(result.is_err());
        // 100ms + 200ms + capped 300ms between the four attempts.
        assert_eq!(started.elapsed(), Duration::from_millis(600));
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(2), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(200));
        assert_eq!(policy.delay_for(10), Duration::from_secs(1));
    }
}
