//! Errors raised by the state accessor.

use thiserror::Error;

/// Errors that may occur while reading or writing rollup state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// The backend has no room for another slot.
    #[error("state backend is out of space, limit of {limit} slots reached")]
    OutOfSpace {
        /// The configured slot limit.
        limit: usize,
    },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("lock poisoned")]
    LockPoisoned,

    /// An attempt was made to move the last seen timestamp backwards.
    #[error("timestamp regression: last seen {last}, got {new}")]
    TimestampRegression {
        /// The currently stored timestamp.
        last: u64,
        /// The rejected timestamp.
        new: u64,
    },
}

/// Errors raised by a [`Burner`](crate::Burner).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BurnError {
    /// The gas meter cannot cover the requested amount.
    #[error("out of gas: requested {requested}, remaining {remaining}")]
    OutOfGas {
        /// Gas requested by the burn.
        requested: u64,
        /// Gas left before the burn.
        remaining: u64,
    },
}
