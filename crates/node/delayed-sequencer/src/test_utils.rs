//! In-memory collaborators for exercising the delayed sequencer.

use crate::{
    BridgeError, DelayedBridge, InboxTracker, InboxTrackerError, L1HeaderReader, L1ReaderError,
    StreamerError, TransactionStreamer,
};
use alloy_consensus::Header;
use alloy_primitives::{Address, B256, Bytes, U256};
use arb_protocol::{
    L1IncomingMessage, L1IncomingMessageHeader, L1MessageKind, MessageWithMetadata, accumulate,
};
use async_trait::async_trait;
use std::sync::{
    Mutex, MutexGuard, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{mpsc, watch};

/// A post-merge L1 header at height `number`.
pub fn header(number: u64) -> Header {
    Header { number, timestamp: number * 12, ..Default::default() }
}

/// A deterministic delayed message included in L1 block `block_number`.
pub fn delayed_message(block_number: u64, request: u64) -> L1IncomingMessage {
    L1IncomingMessage::new(
        L1IncomingMessageHeader {
            kind: L1MessageKind::EthDeposit.into(),
            poster: Address::with_last_byte(0x11),
            block_number,
            timestamp: block_number * 12,
            request_id: Some(B256::from(U256::from(request))),
            l1_base_fee: Some(U256::from(1_000_000_000u64)),
        },
        Bytes::from(request.to_be_bytes().to_vec()),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct L1View {
    head: Option<Header>,
    finalized: u64,
    safe: u64,
    subscribers: Vec<mpsc::Sender<Header>>,
}

/// An [`L1HeaderReader`] whose chain view is set by hand.
#[derive(Debug)]
pub struct StaticL1Reader {
    view: Mutex<L1View>,
    subscriber_count: watch::Sender<usize>,
}

impl Default for StaticL1Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticL1Reader {
    /// Creates a reader with no head.
    pub fn new() -> Self {
        Self { view: Mutex::default(), subscriber_count: watch::Sender::new(0) }
    }

    /// Sets the current head.
    pub fn set_head(&self, header: Header) {
        lock(&self.view).head = Some(header);
    }

    /// Forgets the current head.
    pub fn clear_head(&self) {
        lock(&self.view).head = None;
    }

    /// Sets the finalized block number.
    pub fn set_finalized(&self, number: u64) {
        lock(&self.view).finalized = number;
    }

    /// Sets the safe block number.
    pub fn set_safe(&self, number: u64) {
        lock(&self.view).safe = number;
    }

    /// Waits until at least one subscription is open.
    pub async fn wait_for_subscriber(&self) {
        let mut count = self.subscriber_count.subscribe();
        let _ = count.wait_for(|count| *count > 0).await;
    }

    /// Makes `header` the head and delivers it to every subscriber.
    pub async fn publish(&self, header: Header) {
        let subscribers = {
            let mut view = lock(&self.view);
            view.head = Some(header.clone());
            view.subscribers.clone()
        };
        for subscriber in subscribers {
            let _ = subscriber.send(header.clone()).await;
        }
    }

    /// Ends every open subscription.
    pub fn close_subscriptions(&self) {
        lock(&self.view).subscribers.clear();
    }
}

#[async_trait]
impl L1HeaderReader for StaticL1Reader {
    async fn last_header(&self) -> Result<Option<Header>, L1ReaderError> {
        Ok(lock(&self.view).head.clone())
    }

    async fn latest_finalized_block_nr(&self) -> Result<u64, L1ReaderError> {
        Ok(lock(&self.view).finalized)
    }

    async fn latest_safe_block_nr(&self) -> Result<u64, L1ReaderError> {
        Ok(lock(&self.view).safe)
    }

    fn subscribe(&self) -> mpsc::Receiver<Header> {
        let (tx, rx) = mpsc::channel(16);
        let count = {
            let mut view = lock(&self.view);
            view.subscribers.push(tx);
            view.subscribers.len()
        };
        self.subscriber_count.send_replace(count);
        rx
    }
}

/// An [`InboxTracker`] over a vector of messages and their accumulators.
#[derive(Debug, Default)]
pub struct MemoryInboxTracker {
    entries: RwLock<Vec<(L1IncomingMessage, B256)>>,
}

impl MemoryInboxTracker {
    /// Appends `message`, extending the accumulator chain.
    pub fn push(&self, message: L1IncomingMessage) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.last().map(|(_, acc)| *acc).unwrap_or_default();
        let acc = accumulate(before, &message);
        entries.push((message, acc));
    }

    /// Overwrites the stored accumulator at `pos`.
    pub fn set_accumulator(&self, pos: u64, acc: B256) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(pos as usize) {
            entry.1 = acc;
        }
    }

    /// All stored accumulators, in order.
    pub fn accumulators(&self) -> Vec<B256> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(_, acc)| *acc).collect()
    }
}

impl InboxTracker for MemoryInboxTracker {
    fn delayed_count(&self) -> Result<u64, InboxTrackerError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.len() as u64)
    }

    fn delayed_message_and_accumulator(
        &self,
        pos: u64,
    ) -> Result<(L1IncomingMessage, B256), InboxTrackerError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(pos as usize).cloned().ok_or(InboxTrackerError::MessageNotFound(pos))
    }
}

/// A [`DelayedBridge`] answering from a fixed accumulator list, whatever the L1 block.
#[derive(Debug, Default)]
pub struct MemoryDelayedBridge {
    accumulators: RwLock<Vec<B256>>,
    queries: AtomicU64,
}

impl MemoryDelayedBridge {
    /// A bridge that agrees with `tracker` as it is now.
    pub fn mirroring(tracker: &MemoryInboxTracker) -> Self {
        Self { accumulators: RwLock::new(tracker.accumulators()), queries: AtomicU64::new(0) }
    }

    /// Number of accumulator queries answered so far.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Overwrites the accumulator at `pos`.
    pub fn set_accumulator(&self, pos: u64, acc: B256) {
        let mut accumulators = self.accumulators.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = accumulators.get_mut(pos as usize) {
            *entry = acc;
        }
    }
}

#[async_trait]
impl DelayedBridge for MemoryDelayedBridge {
    async fn accumulator(&self, pos: u64, l1_block_number: u64) -> Result<B256, BridgeError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let accumulators = self.accumulators.read().unwrap_or_else(PoisonError::into_inner);
        accumulators
            .get(pos as usize)
            .copied()
            .ok_or(BridgeError::AccumulatorNotFound { pos, l1_block: l1_block_number })
    }
}

/// A [`TransactionStreamer`] keeping its message log in memory.
#[derive(Debug, Default)]
pub struct MemoryTransactionStreamer {
    messages: RwLock<Vec<MessageWithMetadata>>,
}

impl MemoryTransactionStreamer {
    /// Appends `message` as is.
    pub fn push(&self, message: MessageWithMetadata) {
        self.messages.write().unwrap_or_else(PoisonError::into_inner).push(message);
    }

    /// A copy of the message log.
    pub fn messages(&self) -> Vec<MessageWithMetadata> {
        self.messages.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl TransactionStreamer for MemoryTransactionStreamer {
    fn message_count(&self) -> Result<u64, StreamerError> {
        Ok(self.messages.read().unwrap_or_else(PoisonError::into_inner).len() as u64)
    }

    fn message(&self, pos: u64) -> Result<MessageWithMetadata, StreamerError> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        messages.get(pos as usize).cloned().ok_or(StreamerError::MessageNotFound(pos))
    }

    async fn sequence_delayed_messages(
        &self,
        messages: Vec<L1IncomingMessage>,
        first_delayed_pos: u64,
    ) -> Result<(), StreamerError> {
        let mut log = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        let expected = log.last().map(|m| m.delayed_messages_read).unwrap_or_default();
        if expected != first_delayed_pos {
            return Err(StreamerError::PositionMismatch { expected, got: first_delayed_pos });
        }
        for (offset, message) in messages.into_iter().enumerate() {
            log.push(MessageWithMetadata::new(message, first_delayed_pos + offset as u64 + 1));
        }
        Ok(())
    }
}
