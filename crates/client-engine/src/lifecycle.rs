//! Issue-order tickets for overlapping operations on one store.
//!
//! Each store operation takes a ticket when it starts. When it settles, its
//! commit only applies if no newer operation has been issued since. Stale
//! settlements are dropped, so "last write wins" follows issue order rather
//! than whichever response happened to land last.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic issue counter, one per store.
#[derive(Default)]
pub(crate) struct OpTickets {
    issued: AtomicU64,
}

impl OpTickets {
    /// Issue a new ticket, superseding all earlier ones.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether this ticket is still the most recently issued.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}
