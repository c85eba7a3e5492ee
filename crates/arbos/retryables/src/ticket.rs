use alloy_primitives::{Address, B256, Bytes, U256};

/// A deferred L2 call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetryableTicket {
    /// Unique ticket id.
    pub id: B256,
    /// Sender of the original deposit.
    pub from: Address,
    /// Call target, `None` for contract creation.
    pub to: Option<Address>,
    /// Value attached to the call.
    pub call_value: U256,
    /// Receives the escrowed value if the ticket expires or is cancelled.
    pub beneficiary: Address,
    /// Call input.
    pub calldata: Bytes,
    /// Last timestamp at which the ticket is live.
    pub timeout: u64,
}

impl RetryableTicket {
    /// Returns `true` if the ticket is expired at `current_timestamp`.
    pub const fn is_expired_at(&self, current_timestamp: u64) -> bool {
        self.timeout < current_timestamp
    }
}
