//! Generic utilities used across core modules.

use std::future::Future;
use std::time::Duration;

/// Await `fut` for at most `limit`, yielding `T::default()` if the timer wins.
///
/// Only the caller's wait is dropped: work owned elsewhere (e.g. a spawned task behind a shared
/// handle) keeps running.
pub async fn first_or_default<F, T>(fut: F, limit: Duration) -> T
where
    F: Future<Output = T>,
    T: Default,
{
    tokio::time::timeout(limit, fut).await.unwrap_or_default()
}

/// Filter items by case-insensitive substring match on one string field.
/// Returns all items when query is empty.
pub fn filter_by_query<'a, T, F>(items: &'a [T], query: &str, get_field: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    if query.is_empty() {
        return items.iter().collect();
    }
    let q = query.to_lowercase();
    items
        .iter()
        .filter(|item| get_field(item).to_lowercase().contains(&q))
        .collect()
}
