//! Collaborators of the delayed sequencer.

use crate::{BridgeError, InboxTrackerError, L1ReaderError, StreamerError};
use alloy_consensus::Header;
use alloy_primitives::B256;
use arb_protocol::{L1IncomingMessage, MessageWithMetadata};
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;

/// Reads headers and finality information from the L1 chain.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait L1HeaderReader: Debug + Send + Sync {
    /// The most recent L1 header, if one has been observed.
    async fn last_header(&self) -> Result<Option<Header>, L1ReaderError>;

    /// Number of the latest finalized L1 block.
    async fn latest_finalized_block_nr(&self) -> Result<u64, L1ReaderError>;

    /// Number of the latest safe L1 block.
    async fn latest_safe_block_nr(&self) -> Result<u64, L1ReaderError>;

    /// Subscribes to new L1 headers. Dropping the receiver ends the subscription.
    fn subscribe(&self) -> mpsc::Receiver<Header>;
}

/// The local database of delayed inbox messages.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait InboxTracker: Debug + Send + Sync {
    /// Number of delayed messages stored.
    fn delayed_count(&self) -> Result<u64, InboxTrackerError>;

    /// The delayed message at `pos` and the accumulator after it.
    fn delayed_message_and_accumulator(
        &self,
        pos: u64,
    ) -> Result<(L1IncomingMessage, B256), InboxTrackerError>;

    /// The accumulator after the delayed message at `pos`.
    fn delayed_accumulator(&self, pos: u64) -> Result<B256, InboxTrackerError> {
        self.delayed_message_and_accumulator(pos).map(|(_, acc)| acc)
    }
}

/// The delayed bridge contract on L1.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait DelayedBridge: Debug + Send + Sync {
    /// The accumulator after delayed message `pos`, as of L1 block `l1_block_number`.
    async fn accumulator(&self, pos: u64, l1_block_number: u64) -> Result<B256, BridgeError>;
}

/// The L2 message stream.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait TransactionStreamer: Debug + Send + Sync {
    /// Number of messages in the stream.
    fn message_count(&self) -> Result<u64, StreamerError>;

    /// The message at `pos`.
    fn message(&self, pos: u64) -> Result<MessageWithMetadata, StreamerError>;

    /// Appends delayed messages, the first of which has delayed position `first_delayed_pos`.
    async fn sequence_delayed_messages(
        &self,
        messages: Vec<L1IncomingMessage>,
        first_delayed_pos: u64,
    ) -> Result<(), StreamerError>;
}

/// Elects the single node allowed to sequence.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait SequencerCoordinator: Debug + Send + Sync {
    /// Returns `true` if this node currently holds the sequencer role.
    fn currently_chosen(&self) -> bool;
}
