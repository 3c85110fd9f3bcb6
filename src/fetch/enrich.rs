//! Concurrent per-item enrichment for one page of results.

use std::future::Future;

use futures::future::join_all;

use crate::Result;

/// Issue one secondary request per item, concurrently, and attach each
/// result onto its own item.
///
/// All sub-requests are awaited even when some fail; the first failure in
/// item order is then reported, and in that case nothing is attached. The
/// `fetch` closure must return a future that owns whatever it needs from
/// the item, so results can be written back once all borrows have ended.
pub async fn enrich_each<T, V, F, Fut, A>(items: &mut [T], fetch: F, attach: A) -> Result<()>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<V>>,
    A: Fn(&mut T, V),
{
    let results = join_all(items.iter().map(fetch)).await;

    let mut values = Vec::with_capacity(results.len());
    for result in results {
        values.push(result?);
    }

    for (item, value) in items.iter_mut().zip(values) {
        attach(item, value);
    }

    Ok(())
}
