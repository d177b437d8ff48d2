//! Request tokens for last-write-wins cancellation.
//!
//! A searcher gets one [`RequestTracker`]. Every new user action takes a
//! fresh [`RequestToken`] from it, which cancels the token handed out
//! before. Work holding a cancelled token stops and reports that it was
//! superseded instead of delivering a stale result.

use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Hands out request tokens, cancelling the previous one each time.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: Mutex<(u64, CancellationToken)>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding whatever came before.
    pub fn begin(&self) -> RequestToken {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        latest.1.cancel();
        let sequence = latest.0 + 1;
        let cancel = CancellationToken::new();
        *latest = (sequence, cancel.clone());

        trace!(sequence, "request started");
        RequestToken { sequence, cancel }
    }
}

/// Identifies one request. Cancelled once a newer request begins.
#[derive(Debug, Clone)]
pub struct RequestToken {
    sequence: u64,
    cancel: CancellationToken,
}

impl RequestToken {
    /// A token not tied to any tracker. Only [`RequestToken::cancel`] can
    /// cancel it.
    pub fn detached() -> Self {
        Self {
            sequence: 0,
            cancel: CancellationToken::new(),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel this request explicitly.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Resolves once the request is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}
