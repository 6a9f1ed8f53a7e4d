//! Generic chunk processors

use super::chunking::split;
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::debug;

/// Run `processor` once per chunk, awaiting each before starting the next.
///
/// The first error stops the run and is returned as-is.
pub async fn process_in_chunks<'a, T, R, F, Fut>(
    items: &'a [T],
    chunk_size: usize,
    mut processor: F,
) -> Result<Vec<R>>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let chunks = split(items, chunk_size)?;
    let mut results = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.into_iter().enumerate() {
        debug!(chunk = index, size = chunk.len(), "Processing chunk");
        results.push(processor(chunk).await?);
    }

    Ok(results)
}

/// Run an infallible chunk processor with at most `max_concurrency` chunks in flight.
///
/// Output order matches chunk order regardless of completion order.
pub async fn process_chunks_bounded<'a, T, R, F, Fut>(
    items: &'a [T],
    chunk_size: usize,
    max_concurrency: usize,
    processor: F,
) -> Result<Vec<R>>
where
    F: Fn(&'a [T]) -> Fut,
    Fut: Future<Output = R>,
{
    let chunks = split(items, chunk_size)?;
    debug!(
        chunks = chunks.len(),
        max_concurrency, "Processing chunks concurrently"
    );

    Ok(stream::iter(chunks)
        .map(processor)
        .buffered(max_concurrency.max(1))
        .collect()
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::GatewayError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_process_in_chunks_sequential_order() {
        let items: Vec<u32> = (1..=7).collect();
        let sums = process_in_chunks(&items, 3, |chunk| async move {
            Ok(chunk.iter().sum::<u32>())
        })
        .await
        .unwrap();

        assert_eq!(sums, vec![6, 15, 7]);
    }

    #[tokio::test]
    async fn test_process_in_chunks_error_aborts_remaining() {
        let items: Vec<u32> = (1..=9).collect();
        let calls = AtomicUsize::new(0);

        let result = process_in_chunks(&items, 3, |chunk| {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 1 {
                    Err(GatewayError::storage("chunk failed"))
                } else {
                    Ok(chunk.len())
                }
            }
        })
        .await;

        assert!(matches!(result, Err(GatewayError::Storage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_process_in_chunks_rejects_zero_chunk_size() {
        let items = [1, 2];
        let result = process_in_chunks(&items, 0, |chunk| async move { Ok(chunk.len()) }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_bounded_respects_limit_and_order() {
        let items: Vec<u64> = (0..20).collect();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let firsts = process_chunks_bounded(&items, 2, 3, |chunk| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                // Later chunks finish first.
                tokio::time::sleep(Duration::from_millis(30 - chunk[0])).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                chunk[0]
            }
        })
        .await
        .unwrap();

        assert_eq!(firsts, (0..20).step_by(2).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }
}
