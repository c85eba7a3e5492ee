//! Error types for the delayed sequencer and its collaborators.

use alloy_eips::BlockNumberOrTag;
use alloy_primitives::B256;
use alloy_transport::TransportError;
use thiserror::Error;

/// Errors reading the L1 chain.
#[derive(Debug, Error)]
pub enum L1ReaderError {
    /// The RPC transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The node does not know the requested block.
    #[error("L1 block not found: {0}")]
    BlockNotFound(BlockNumberOrTag),
}

/// Errors reading the local delayed inbox database.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InboxTrackerError {
    /// No delayed message is stored at this position.
    #[error("delayed message {0} not found")]
    MessageNotFound(u64),
    /// The underlying database failed.
    #[error("inbox tracker database error: {0}")]
    Database(String),
}

/// Errors querying the delayed bridge contract.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The RPC transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The call returned data that does not decode as an accumulator.
    #[error("failed to decode bridge response: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    /// The bridge has no accumulator at this position as of the given L1 block.
    #[error("delayed bridge has no accumulator {pos} at L1 block {l1_block}")]
    AccumulatorNotFound {
        /// Delayed message position.
        pos: u64,
        /// L1 block the query was made at.
        l1_block: u64,
    },
}

/// Errors from the L2 transaction streamer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StreamerError {
    /// No message is stored at this position.
    #[error("message {0} not found")]
    MessageNotFound(u64),
    /// A batch did not start where the streamer expected it to.
    #[error("delayed messages must start at {expected}, got {got}")]
    PositionMismatch {
        /// Next delayed position the streamer accepts.
        expected: u64,
        /// Position the batch started at.
        got: u64,
    },
    /// The underlying database failed.
    #[error("transaction streamer database error: {0}")]
    Database(String),
}

/// Errors raised by [`DelayedSequencer::update`](crate::DelayedSequencer::update).
#[derive(Debug, Error)]
pub enum DelayedSequencerError {
    /// Reading L1 failed.
    #[error(transparent)]
    L1Reader(#[from] L1ReaderError),
    /// Reading the inbox tracker failed.
    #[error(transparent)]
    InboxTracker(#[from] InboxTrackerError),
    /// Querying the bridge failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// The streamer refused the batch or could not be read.
    #[error(transparent)]
    Streamer(#[from] StreamerError),
    /// A stored accumulator does not extend the previous one with its message.
    #[error(
        "delayed message accumulator mismatch at {pos}: stored {stored}, computed {computed}"
    )]
    AccumulatorMismatch {
        /// Position of the offending message.
        pos: u64,
        /// Accumulator stored by the inbox tracker.
        stored: B256,
        /// Accumulator recomputed from the previous one and the message.
        computed: B256,
    },
    /// The local accumulator disagrees with the bridge contract, most likely an unprocessed reorg.
    #[error(
        "inbox tracker accumulator {local} at delayed message {pos} does not match bridge accumulator {bridge} at L1 block {l1_block}"
    )]
    BridgeAccumulatorMismatch {
        /// Position of the last message of the batch.
        pos: u64,
        /// L1 block the bridge was queried at.
        l1_block: u64,
        /// Accumulator held by the inbox tracker.
        local: B256,
        /// Accumulator reported by the bridge.
        bridge: B256,
    },
}

impl DelayedSequencerError {
    /// Returns `true` for errors that indicate inconsistent data rather than a transient failure.
    pub const fn is_consistency_violation(&self) -> bool {
        matches!(self, Self::AccumulatorMismatch { .. } | Self::BridgeAccumulatorMismatch { .. })
    }
}
