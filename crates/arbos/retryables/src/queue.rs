//! Ticket ids ordered by creation.

use alloy_primitives::B256;
use arb_state::{StateBackend, StateError, Storage, StorageQueue};

/// FIFO of retryable ids. Holds ids only; timeouts are read from the ticket store.
#[derive(Debug)]
pub struct TimeoutQueue<B> {
    inner: StorageQueue<B>,
}

impl<B: StateBackend> TimeoutQueue<B> {
    pub(crate) fn open(storage: Storage<B>) -> Self {
        Self { inner: StorageQueue::open(storage) }
    }

    /// Number of queued ids.
    pub fn size(&self) -> Result<u64, StateError> {
        self.inner.size()
    }

    /// The oldest queued id.
    pub fn peek(&self) -> Result<Option<B256>, StateError> {
        self.inner.peek()
    }

    /// The newest queued id.
    pub fn peek_back(&self) -> Result<Option<B256>, StateError> {
        self.inner.peek_back()
    }

    /// Appends `id`.
    pub fn push(&self, id: B256) -> Result<(), StateError> {
        self.inner.push(id)
    }

    /// Drops the newest id. Only used to undo a push.
    pub(crate) fn pop_back(&self) -> Result<Option<B256>, StateError> {
        self.inner.pop_back()
    }

    /// Removes and returns the oldest id.
    pub fn shift(&self) -> Result<Option<B256>, StateError> {
        self.inner.shift()
    }
}
