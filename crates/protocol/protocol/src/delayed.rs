//! The delayed inbox accumulator chain.
//!
//! Every delayed message extends a rolling hash:
//!
//! ```text
//! after = keccak256(before ++ message_hash(message))
//! message_hash = keccak256(kind ++ poster ++ be64(block_number) ++ be64(timestamp)
//!                          ++ request_id ++ be256(l1_base_fee) ++ keccak256(l2_msg))
//! ```
//!
//! The accumulator preceding the first delayed message is the zero hash. The encoding matches the
//! L1 bridge contract byte for byte, so chains computed here can be compared with the values the
//! bridge reports.

use crate::L1IncomingMessage;
use alloy_primitives::{B256, Keccak256, U256, keccak256};

/// A delayed inbox message together with the accumulator that precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayedInboxMessage {
    /// The accumulator before this message was added.
    pub before_inbox_acc: B256,
    /// The message itself.
    pub message: L1IncomingMessage,
}

impl DelayedInboxMessage {
    /// Creates a new [`DelayedInboxMessage`].
    pub const fn new(before_inbox_acc: B256, message: L1IncomingMessage) -> Self {
        Self { before_inbox_acc, message }
    }

    /// Returns the accumulator after this message is appended.
    pub fn after_inbox_acc(&self) -> B256 {
        accumulate(self.before_inbox_acc, &self.message)
    }
}

/// Hashes a message the way the delayed bridge does when it enqueues it.
pub fn message_hash(message: &L1IncomingMessage) -> B256 {
    let header = &message.header;

    let mut hasher = Keccak256::new();
    hasher.update([header.kind]);
    hasher.update(header.poster);
    hasher.update(header.block_number.to_be_bytes());
    hasher.update(header.timestamp.to_be_bytes());
    hasher.update(header.request_id.unwrap_or_default());
    hasher.update(header.l1_base_fee.unwrap_or(U256::ZERO).to_be_bytes::<32>());
    hasher.update(keccak256(&message.l2_msg));
    hasher.finalize()
}

/// Extends the accumulator `before` with `message`.
pub fn accumulate(before: B256, message: &L1IncomingMessage) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(before);
    hasher.update(message_hash(message));
    hasher.finalize()
}

/// Computes the accumulators after each of `messages`, starting from `before`.
pub fn accumulator_chain<'a>(
    before: B256,
    messages: impl IntoIterator<Item = &'a L1IncomingMessage>,
) -> Vec<B256> {
    messages
        .into_iter()
        .scan(before, |acc, message| {
            *acc = accumulate(*acc, message);
            Some(*acc)
        })
        .collect()
}
