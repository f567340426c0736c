//! ---
//! wbc_section: "02-messaging-ipc-data-model"
//! wbc_subsection: "module"
//! wbc_type: "source"
//! wbc_scope: "code"
//! wbc_description: "Process-wide correlation id generator."
//! wbc_version: "v0.0.0-prealpha"
//! wbc_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{MessageId, INVALID_MESSAGE_ID};

/// Monotonic source of message and trajectory point identifiers.
///
/// Every component that emits into the same controller must share one
/// generator (usually behind an `Arc`). Independent robots, for example in
/// tests, use independent generators.
#[derive(Debug)]
pub struct MessageIdGenerator {
    next: AtomicU64,
}

impl MessageIdGenerator {
    /// Generator whose first id is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Generator whose first id is `first`. `0` is reserved and bumped to `1`.
    pub fn starting_at(first: MessageId) -> Self {
        Self {
            next: AtomicU64::new(first.max(INVALID_MESSAGE_ID + 1)),
        }
    }

    /// Return the current value and advance the counter.
    pub fn next_id(&self) -> MessageId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Value the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> MessageId {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
