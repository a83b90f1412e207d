//! Fan-out / fan-in helpers shared by the transfer operations.
//!
//! Every sub-operation is started before any result is awaited, and a
//! failing sub-operation never cancels its siblings. Results are reduced
//! from the joined future, so no map is shared between tasks.

use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use futures::future::join_all;

use secureshare_core::error::AppError;
use secureshare_core::result::AppResult;

/// Bound an external call by `limit`, mapping expiry to a `Timeout` error.
pub async fn bounded<T, F>(limit: Duration, op: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(format!(
            "{op} did not complete within {}ms",
            limit.as_millis()
        ))),
    }
}

/// Run two operations concurrently and wait for both.
pub async fn join_pair<A, B>(a: A, b: B) -> (A::Output, B::Output)
where
    A: Future,
    B: Future,
{
    tokio::join!(a, b)
}

/// Run `op` for every key concurrently and collect `(key, output)` pairs
/// in input order once all have finished.
pub async fn join_keyed<K, T, F, Fut>(keys: impl IntoIterator<Item = K>, op: F) -> Vec<(K, T)>
where
    K: Clone,
    F: Fn(K) -> Fut,
    Fut: Future<Output = T>,
{
    join_all(keys.into_iter().map(|key| {
        let fut = op(key.clone());
        async move { (key, fut.await) }
    }))
    .await
}

/// Drop repeated keys, keeping the first occurrence of each in order.
///
/// Batch operations run one sub-operation per key; a repeated key would race
/// against itself on the same record.
pub fn distinct<K>(keys: impl IntoIterator<Item = K>) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| seen.insert(key.clone()))
        .collect()
}
