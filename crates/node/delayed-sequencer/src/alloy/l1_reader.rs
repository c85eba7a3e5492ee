//! [`L1HeaderReader`] over JSON-RPC.

use crate::{L1HeaderReader, L1ReaderError};
use alloy_consensus::Header;
use alloy_eips::BlockNumberOrTag;
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::PollerBuilder;
use alloy_rpc_types_eth::Block;
use async_stream::stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Reads L1 headers and finality from an RPC node.
#[derive(Debug, Clone)]
pub struct AlloyL1HeaderReader {
    provider: RootProvider,
    poll_interval: Duration,
}

impl AlloyL1HeaderReader {
    /// Default head poll interval, one L1 slot.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(12);

    /// Creates a reader polling `provider` every [`Self::DEFAULT_POLL_INTERVAL`].
    pub const fn new(provider: RootProvider) -> Self {
        Self { provider, poll_interval: Self::DEFAULT_POLL_INTERVAL }
    }

    /// Sets the head poll interval.
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn block_by_tag(&self, tag: BlockNumberOrTag) -> Result<Option<Header>, L1ReaderError> {
        let block = self.provider.get_block_by_number(tag).await?;
        Ok(block.map(|block| block.header.inner))
    }

    async fn block_number_by_tag(&self, tag: BlockNumberOrTag) -> Result<u64, L1ReaderError> {
        self.block_by_tag(tag)
            .await?
            .map(|header| header.number)
            .ok_or(L1ReaderError::BlockNotFound(tag))
    }

    /// Polls the latest block, yielding each distinct head once.
    ///
    /// Not contiguous: heads produced between two polls are skipped.
    fn head_stream(&self) -> impl Stream<Item = Header> + Unpin + Send + 'static {
        let mut poll_stream = PollerBuilder::<_, Block>::new(
            self.provider.weak_client(),
            "eth_getBlockByNumber",
            (BlockNumberOrTag::Latest, false),
        )
        .with_poll_interval(self.poll_interval)
        .into_stream();

        Box::pin(stream! {
            let mut last_hash = None;
            while let Some(block) = poll_stream.next().await {
                if last_hash != Some(block.header.hash) {
                    last_hash = Some(block.header.hash);
                    yield block.header.inner;
                }
            }
        })
    }
}

#[async_trait]
impl L1HeaderReader for AlloyL1HeaderReader {
    async fn last_header(&self) -> Result<Option<Header>, L1ReaderError> {
        self.block_by_tag(BlockNumberOrTag::Latest).await
    }

    async fn latest_finalized_block_nr(&self) -> Result<u64, L1ReaderError> {
        self.block_number_by_tag(BlockNumberOrTag::Finalized).await
    }

    async fn latest_safe_block_nr(&self) -> Result<u64, L1ReaderError> {
        self.block_number_by_tag(BlockNumberOrTag::Safe).await
    }

    fn subscribe(&self) -> mpsc::Receiver<Header> {
        let (tx, rx) = mpsc::channel(64);
        let mut heads = self.head_stream();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => {
                        debug!(target: "l1_reader", "Header subscriber went away");
                        return;
                    }
                    head = heads.next() => {
                        let Some(head) = head else {
                            info!(target: "l1_reader", "L1 head poller ended");
                            return;
                        };
                        if tx.send(head).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        rx
    }
}
