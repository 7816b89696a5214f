use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter used to discard responses of superseded fetches.
///
/// Take a ticket before issuing a request and check it before applying the
/// response. Both must happen under the same lock that guards the state the
/// response is written to.
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// What happened to a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch (or a close) happened first; the result was dropped.
    Superseded,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Make every outstanding ticket stale.
    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
