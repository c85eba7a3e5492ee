//! Retryable engine errors.

use alloy_primitives::B256;
use arb_state::{BurnError, StateError};
use thiserror::Error;

/// Errors returned by the retryable store and reaper.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetryableError {
    /// The state backend could not be read or written.
    #[error("retryable state access failed: {0}")]
    StateWrite(#[from] StateError),

    /// A ticket with this id already exists.
    #[error("retryable {0} already exists")]
    DuplicateId(B256),

    /// A zero timeout cannot be told apart from an absent ticket.
    #[error("retryable timeout must be non-zero")]
    ZeroTimeout,

    /// The timeout is earlier than that of the ticket at the tail of the timeout queue.
    #[error("retryable timeout {timeout} precedes queue tail timeout {tail_timeout}")]
    TimeoutOrder {
        /// Timeout of the most recently queued ticket.
        tail_timeout: u64,
        /// The rejected timeout.
        timeout: u64,
    },

    /// The reap could not be paid for.
    #[error(transparent)]
    Burn(#[from] BurnError),
}
