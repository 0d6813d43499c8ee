//! crates/icebreaker_core/src/latest.rs
//!
//! A "last request wins" guard for view loads. Each load gets a ticket scoped
//! to the view; starting a new load cancels the previous ticket, and results
//! arriving on a cancelled ticket are discarded instead of being shown.

use std::future::Future;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// A handle for one in-flight load of the view keyed by `K`.
#[derive(Debug, Clone)]
pub struct RequestTicket<K> {
    seq: u64,
    key: K,
    token: CancellationToken,
}

impl<K> RequestTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives `fut` until it finishes or the ticket is superseded.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

struct Current<K> {
    seq: u64,
    key: K,
    token: CancellationToken,
}

/// Tracks the latest load requested for a view.
pub struct LatestRequest<K> {
    current: Mutex<Option<Current<K>>>,
}

impl<K> Default for LatestRequest<K> {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }
}

impl<K: Clone + PartialEq> LatestRequest<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load for `key`, cancelling whichever load was in flight.
    pub fn begin(&self, key: K) -> RequestTicket<K> {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        let seq = match current.take() {
            Some(previous) => {
                previous.token.cancel();
                previous.seq + 1
            }
            None => 0,
        };
        let token = CancellationToken::new();
        *current = Some(Current {
            seq,
            key: key.clone(),
            token: token.clone(),
        });
        RequestTicket { seq, key, token }
    }

    /// True if `ticket` is still the most recent load and has not been cancelled.
    pub fn is_current(&self, ticket: &RequestTicket<K>) -> bool {
        let current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        match current.as_ref() {
            Some(c) => c.seq == ticket.seq && c.key == ticket.key && !ticket.is_cancelled(),
            None => false,
        }
    }

    /// Hands `value` back only if it belongs to the current load.
    pub fn commit<T>(&self, ticket: &RequestTicket<K>, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            None
        }
    }

    /// Tears the view down: every outstanding ticket becomes stale.
    pub fn cancel_all(&self) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.take() {
            previous.token.cancel();
        }
    }
}
