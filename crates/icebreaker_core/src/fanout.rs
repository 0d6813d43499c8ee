//! crates/icebreaker_core/src/fanout.rs
//!
//! The settle-all combinator used by every fan-out in the aggregator.

use futures::future::join_all;
use std::future::Future;

/// Polls every future concurrently on the current task and waits for all of them.
///
/// One `Result` is returned per input, in input order, regardless of the order
/// in which the futures complete. A failure never cancels its siblings; the
/// caller decides per item whether to drop it or substitute a placeholder.
pub async fn settle_all<I, F, T, E>(futures: I) -> Vec<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(futures).await
}

/// Counts the failed items of a settled batch.
pub fn failure_count<T, E>(settled: &[Result<T, E>]) -> usize {
    settled.iter().filter(|r| r.is_err()).count()
}
