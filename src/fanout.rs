//! Bounded task groups.
//!
//! Runs one tokio task per item with a semaphore capping how many run at
//! once, and hands back one result per item in input order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Run `task` over every item, at most `limit` at a time.
///
/// The returned vector has exactly one entry per item, in input order. A task
/// that panicked yields its [`JoinError`] in its own slot. A `limit` of zero
/// is raised to 1.
pub async fn bounded<I, T, F, Fut>(items: Vec<I>, limit: usize, task: F) -> Vec<Result<T, JoinError>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();
    let mut index_of = HashMap::with_capacity(items.len());
    let total = items.len();

    for (index, item) in items.into_iter().enumerate() {
        let sem = semaphore.clone();
        let fut = task(item);
        let handle = tasks.spawn(async move {
            // Never closed, so acquisition only waits.
            let _permit = sem.acquire_owned().await;
            fut.await
        });
        index_of.insert(handle.id(), index);
    }

    let mut slots: Vec<Option<Result<T, JoinError>>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, value)) => (id, Ok(value)),
            Err(e) => (e.id(), Err(e)),
        };
        if let Some(index) = index_of.remove(&id) {
            slots[index] = Some(result);
        }
    }

    slots.into_iter().flatten().collect()
}
