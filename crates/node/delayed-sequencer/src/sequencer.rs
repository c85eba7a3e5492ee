//! The delayed sequencer state machine and its run loop.

use crate::{
    DelayedBridge, DelayedSequencerConfig, DelayedSequencerError, InboxTracker, L1HeaderReader,
    Metrics, SequencerCoordinator, StreamerError, TransactionStreamer,
};
use alloy_consensus::Header;
use alloy_primitives::B256;
use arb_metrics::observe_operation_async;
use arb_protocol::DelayedInboxMessage;
use std::sync::Arc;
use tokio::{select, sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of a single [`DelayedSequencer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerUpdate {
    /// Another node holds the sequencer role.
    NotChosen,
    /// Sequencing is disabled by configuration.
    Disabled,
    /// No L1 header has been observed yet.
    NoL1Header,
    /// The L1 chain is shorter than the finalize distance.
    L1TooYoung,
    /// Nothing can change until L1 finalizes `waiting_for`.
    WaitingForFinality {
        /// Current finalized L1 block.
        finalized: u64,
        /// Block the sequencer waits for.
        waiting_for: u64,
    },
    /// No finalized delayed message is waiting.
    CaughtUp,
    /// A batch was handed to the transaction streamer.
    Sequenced {
        /// Delayed position of the first message of the batch.
        start_pos: u64,
        /// Number of messages in the batch.
        count: u64,
    },
}

/// Sequences finalized delayed inbox messages into the L2 transaction stream.
///
/// Driven by L1 headers. The only state kept between headers is the L1 block number it waits
/// for, which lets most headers be skipped without touching the inbox.
#[derive(Debug)]
pub struct DelayedSequencer<R, T, B, S> {
    l1_reader: R,
    inbox: T,
    bridge: B,
    streamer: S,
    coordinator: Option<Arc<dyn SequencerCoordinator>>,
    config: watch::Receiver<DelayedSequencerConfig>,
    waiting_for_finalized_block: u64,
}

impl<R, T, B, S> DelayedSequencer<R, T, B, S>
where
    R: L1HeaderReader,
    T: InboxTracker,
    B: DelayedBridge,
    S: TransactionStreamer,
{
    /// Creates a sequencer reading its configuration from `config`.
    pub const fn new(
        l1_reader: R,
        inbox: T,
        bridge: B,
        streamer: S,
        config: watch::Receiver<DelayedSequencerConfig>,
    ) -> Self {
        Self {
            l1_reader,
            inbox,
            bridge,
            streamer,
            coordinator: None,
            config,
            waiting_for_finalized_block: 0,
        }
    }

    /// Only sequence while `coordinator` reports this node as chosen.
    pub fn with_coordinator(mut self, coordinator: Arc<dyn SequencerCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// The L1 block that must be finalized before the next update does any work.
    pub const fn waiting_for_finalized_block(&self) -> u64 {
        self.waiting_for_finalized_block
    }

    /// Number of delayed messages the L2 chain has already consumed.
    fn delayed_messages_read(&self) -> Result<u64, StreamerError> {
        let count = self.streamer.message_count()?;
        if count == 0 {
            return Ok(0);
        }
        Ok(self.streamer.message(count - 1)?.delayed_messages_read)
    }

    async fn finalized_block(
        &self,
        config: &DelayedSequencerConfig,
        current: &Header,
    ) -> Result<Option<u64>, DelayedSequencerError> {
        if config.use_merge_finality && current.difficulty.is_zero() {
            let finalized = if config.require_full_finality {
                self.l1_reader.latest_finalized_block_nr().await?
            } else {
                self.l1_reader.latest_safe_block_nr().await?
            };
            return Ok(Some(finalized));
        }
        Ok(current.number.checked_sub(config.finalize_distance))
    }

    /// Runs one sequencing step for the L1 header `notified`.
    pub async fn update(
        &mut self,
        notified: &Header,
    ) -> Result<SequencerUpdate, DelayedSequencerError> {
        if let Some(coordinator) = &self.coordinator {
            if !coordinator.currently_chosen() {
                return Ok(SequencerUpdate::NotChosen);
            }
        }

        let config = *self.config.borrow();
        if !config.enable {
            return Ok(SequencerUpdate::Disabled);
        }

        let Some(current) = self.l1_reader.last_header().await? else {
            return Ok(SequencerUpdate::NoL1Header);
        };

        let Some(finalized) = self.finalized_block(&config, &current).await? else {
            return Ok(SequencerUpdate::L1TooYoung);
        };

        if self.waiting_for_finalized_block > finalized {
            return Ok(SequencerUpdate::WaitingForFinality {
                finalized,
                waiting_for: self.waiting_for_finalized_block,
            });
        }

        // Without an unfinalized message to wait for, nothing new can be final before the next
        // header.
        self.set_waiting_for(notified.number + 1);

        let delayed_count = self.inbox.delayed_count()?;
        let start_pos = self.delayed_messages_read()?;

        let mut pos = start_pos;
        let mut last_acc: Option<B256> = None;
        let mut messages = Vec::new();
        while pos < delayed_count {
            let (message, stored) = self.inbox.delayed_message_and_accumulator(pos)?;
            if message.block_number() > finalized {
                self.set_waiting_for(message.block_number());
                break;
            }

            let before = match last_acc {
                Some(acc) => acc,
                None if pos == 0 => B256::ZERO,
                None => self.inbox.delayed_accumulator(pos - 1)?,
            };
            let link = DelayedInboxMessage::new(before, message);
            let computed = link.after_inbox_acc();
            if computed != stored {
                metrics::counter!(Metrics::ACCUMULATOR_MISMATCH_TOTAL, "source" => "tracker")
                    .increment(1);
                return Err(DelayedSequencerError::AccumulatorMismatch { pos, stored, computed });
            }

            last_acc = Some(stored);
            messages.push(link.message);
            pos += 1;
        }

        let Some(local) = last_acc else {
            return Ok(SequencerUpdate::CaughtUp);
        };

        let bridge = self.bridge.accumulator(pos - 1, finalized).await?;
        if bridge != local {
            metrics::counter!(Metrics::ACCUMULATOR_MISMATCH_TOTAL, "source" => "bridge")
                .increment(1);
            return Err(DelayedSequencerError::BridgeAccumulatorMismatch {
                pos: pos - 1,
                l1_block: finalized,
                local,
                bridge,
            });
        }

        let count = messages.len() as u64;
        self.streamer.sequence_delayed_messages(messages, start_pos).await?;

        metrics::counter!(Metrics::MESSAGES_SEQUENCED_TOTAL).increment(count);
        info!(
            target: "delayed_sequencer",
            count,
            start_pos,
            finalized,
            "Sequenced delayed messages"
        );
        Ok(SequencerUpdate::Sequenced { start_pos, count })
    }

    fn set_waiting_for(&mut self, block: u64) {
        self.waiting_for_finalized_block = block;
        metrics::gauge!(Metrics::WAITING_FOR_BLOCK).set(block as f64);
    }

    /// Processes L1 headers until the subscription closes or `cancellation` fires.
    ///
    /// Failed updates are logged and retried on the next header.
    pub async fn run(mut self, cancellation: CancellationToken) {
        let mut headers = self.l1_reader.subscribe();
        info!(target: "delayed_sequencer", "Started delayed sequencer");

        loop {
            select! {
                biased;

                _ = cancellation.cancelled() => {
                    info!(target: "delayed_sequencer", "Received shutdown signal, exiting");
                    return;
                }
                header = headers.recv() => {
                    let Some(header) = header else {
                        info!(target: "delayed_sequencer", "L1 header subscription closed, exiting");
                        return;
                    };

                    match observe_operation_async!(Metrics, Metrics::METHOD_UPDATE, self.update(&header)) {
                        Ok(outcome) => {
                            debug!(target: "delayed_sequencer", l1_block = header.number, ?outcome, "Processed L1 header");
                        }
                        Err(err) if err.is_consistency_violation() => {
                            error!(target: "delayed_sequencer", l1_block = header.number, %err, "Delayed inbox is inconsistent");
                        }
                        Err(err) => {
                            warn!(target: "delayed_sequencer", l1_block = header.number, %err, "Delayed sequencer update failed");
                        }
                    }
                }
            }
        }
    }
}

impl<R, T, B, S> DelayedSequencer<R, T, B, S>
where
    R: L1HeaderReader + 'static,
    T: InboxTracker + 'static,
    B: DelayedBridge + 'static,
    S: TransactionStreamer + 'static,
{
    /// Spawns [`Self::run`] onto the current tokio runtime.
    pub fn start(self, cancellation: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancellation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BridgeError, InboxTrackerError, L1ReaderError,
        test_utils::{
            MemoryDelayedBridge, MemoryInboxTracker, MemoryTransactionStreamer, StaticL1Reader,
            delayed_message, header,
        },
    };
    use alloy_primitives::U256;
    use arb_protocol::{L1IncomingMessage, MessageWithMetadata};
    use async_trait::async_trait;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use mockall::mock;
    use rstest::rstest;
    use tokio::sync::mpsc;

    mock! {
        #[derive(Debug)]
        pub Reader {}

        #[async_trait]
        impl L1HeaderReader for Reader {
            async fn last_header(&self) -> Result<Option<Header>, L1ReaderError>;
            async fn latest_finalized_block_nr(&self) -> Result<u64, L1ReaderError>;
            async fn latest_safe_block_nr(&self) -> Result<u64, L1ReaderError>;
            fn subscribe(&self) -> mpsc::Receiver<Header>;
        }
    }

    mock! {
        #[derive(Debug)]
        pub Bridge {}

        #[async_trait]
        impl DelayedBridge for Bridge {
            async fn accumulator(&self, pos: u64, l1_block_number: u64) -> Result<B256, BridgeError>;
        }
    }

    mock! {
        #[derive(Debug)]
        pub Tracker {}

        impl InboxTracker for Tracker {
            fn delayed_count(&self) -> Result<u64, InboxTrackerError>;
            fn delayed_message_and_accumulator(&self, pos: u64) -> Result<(L1IncomingMessage, B256), InboxTrackerError>;
        }
    }

    #[derive(Debug)]
    struct Chosen(bool);

    impl SequencerCoordinator for Chosen {
        fn currently_chosen(&self) -> bool {
            self.0
        }
    }

    type TestSequencer = DelayedSequencer<
        Arc<StaticL1Reader>,
        Arc<MemoryInboxTracker>,
        Arc<MemoryDelayedBridge>,
        Arc<MemoryTransactionStreamer>,
    >;

    struct Harness {
        reader: Arc<StaticL1Reader>,
        inbox: Arc<MemoryInboxTracker>,
        bridge: Arc<MemoryDelayedBridge>,
        streamer: Arc<MemoryTransactionStreamer>,
        config: watch::Sender<DelayedSequencerConfig>,
        sequencer: TestSequencer,
    }

    /// Post-merge L1 whose head is `head`, finalized at `finalized`, carrying delayed messages at
    /// the given L1 blocks.
    fn harness(head: u64, finalized: u64, message_blocks: &[u64]) -> Harness {
        let reader = Arc::new(StaticL1Reader::new());
        reader.set_head(header(head));
        reader.set_finalized(finalized);
        reader.set_safe(finalized);

        let inbox = Arc::new(MemoryInboxTracker::default());
        for (index, block) in message_blocks.iter().enumerate() {
            inbox.push(delayed_message(*block, index as u64));
        }
        let bridge = Arc::new(MemoryDelayedBridge::mirroring(&inbox));
        let streamer = Arc::new(MemoryTransactionStreamer::default());

        let (config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
        let sequencer = DelayedSequencer::new(
            Arc::clone(&reader),
            Arc::clone(&inbox),
            Arc::clone(&bridge),
            Arc::clone(&streamer),
            config_rx,
        );
        Harness { reader, inbox, bridge, streamer, config, sequencer }
    }

    #[tokio::test]
    async fn test_not_chosen() {
        let Harness { mut sequencer, streamer, .. } = harness(100, 90, &[1]);
        sequencer = sequencer.with_coordinator(Arc::new(Chosen(false)));

        assert_eq!(sequencer.update(&header(100)).await.unwrap(), SequencerUpdate::NotChosen);
        assert!(streamer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_chosen_sequences() {
        let Harness { mut sequencer, streamer, .. } = harness(100, 90, &[1]);
        sequencer = sequencer.with_coordinator(Arc::new(Chosen(true)));

        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 1 }
        );
        assert_eq!(streamer.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_disabled_and_hot_reload() {
        let Harness { mut sequencer, config, streamer, .. } = harness(100, 90, &[1, 2]);
        config.send_replace(DelayedSequencerConfig::DEFAULT);
        assert_eq!(sequencer.update(&header(100)).await.unwrap(), SequencerUpdate::Disabled);

        config.send_modify(|config| config.enable = true);
        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 2 }
        );
        assert_eq!(streamer.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_no_l1_header() {
        let Harness { mut sequencer, reader, .. } = harness(100, 90, &[1]);
        reader.clear_head();
        assert_eq!(sequencer.update(&header(100)).await.unwrap(), SequencerUpdate::NoL1Header);
    }

    #[rstest]
    #[case::full_finality(true, 50)]
    #[case::safe(false, 70)]
    #[tokio::test]
    async fn test_merge_finality_source(#[case] require_full_finality: bool, #[case] expected: u64) {
        let Harness { mut sequencer, reader, config, streamer, .. } =
            harness(100, 50, &[10, 50, 60, 70, 80]);
        reader.set_safe(70);
        config.send_modify(|config| config.require_full_finality = require_full_finality);

        let outcome = sequencer.update(&header(100)).await.unwrap();

        let count = streamer.messages().len() as u64;
        assert_eq!(outcome, SequencerUpdate::Sequenced { start_pos: 0, count });
        assert!(streamer.messages().iter().all(|m| m.message.block_number() <= expected));
        assert_eq!(sequencer.waiting_for_finalized_block(), if expected == 50 { 60 } else { 80 });
    }

    #[tokio::test]
    async fn test_distance_finality_pre_merge() {
        let Harness { mut sequencer, reader, streamer, .. } = harness(100, 0, &[70, 80, 81]);
        let mut head = header(100);
        head.difficulty = U256::from(2);
        reader.set_head(head.clone());

        assert_eq!(
            sequencer.update(&head).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 2 }
        );
        assert_eq!(streamer.messages().len(), 2);
        assert_eq!(sequencer.waiting_for_finalized_block(), 81);
    }

    #[tokio::test]
    async fn test_merge_finality_disabled_uses_distance() {
        let Harness { mut sequencer, config, streamer, .. } = harness(100, 0, &[75, 85]);
        config.send_modify(|config| {
            config.use_merge_finality = false;
            config.finalize_distance = 10;
        });

        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 2 }
        );
        assert_eq!(streamer.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_l1_too_young() {
        let Harness { mut sequencer, reader, streamer, .. } = harness(5, 0, &[1]);
        let mut head = header(5);
        head.difficulty = U256::from(1);
        reader.set_head(head.clone());

        assert_eq!(sequencer.update(&head).await.unwrap(), SequencerUpdate::L1TooYoung);
        assert!(streamer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_waiting_gate() {
        let Harness { mut sequencer, reader, streamer, .. } = harness(100, 90, &[1, 95]);

        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 1 }
        );
        assert_eq!(sequencer.waiting_for_finalized_block(), 95);

        assert_eq!(
            sequencer.update(&header(101)).await.unwrap(),
            SequencerUpdate::WaitingForFinality { finalized: 90, waiting_for: 95 }
        );

        reader.set_finalized(95);
        assert_eq!(
            sequencer.update(&header(102)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 1, count: 1 }
        );
        assert_eq!(sequencer.waiting_for_finalized_block(), 103);
        assert_eq!(streamer.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_caught_up() {
        let Harness { mut sequencer, .. } = harness(100, 90, &[]);
        assert_eq!(sequencer.update(&header(100)).await.unwrap(), SequencerUpdate::CaughtUp);
        assert_eq!(sequencer.waiting_for_finalized_block(), 101);
    }

    #[tokio::test]
    async fn test_resumes_from_streamer_tail() {
        let Harness { mut sequencer, streamer, .. } = harness(100, 90, &[1, 2, 3]);
        streamer.push(MessageWithMetadata::new(delayed_message(1, 0), 2));

        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 2, count: 1 }
        );
        assert_eq!(streamer.messages().last().unwrap().delayed_messages_read, 3);
    }

    #[tokio::test]
    async fn test_first_link_is_verified() {
        let Harness { mut sequencer, streamer, inbox, .. } = harness(100, 90, &[1, 2, 3]);
        streamer.push(MessageWithMetadata::new(delayed_message(1, 0), 1));
        inbox.set_accumulator(0, B256::repeat_byte(0xbb));

        let err = sequencer.update(&header(100)).await.unwrap_err();
        assert!(matches!(err, DelayedSequencerError::AccumulatorMismatch { pos: 1, .. }));
        assert_eq!(streamer.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_bridge_mismatch() {
        let Harness { mut sequencer, streamer, bridge, .. } = harness(100, 90, &[1, 2]);
        bridge.set_accumulator(1, B256::repeat_byte(0xaa));

        let err = sequencer.update(&header(100)).await.unwrap_err();
        assert!(err.is_consistency_violation());
        assert!(matches!(
            err,
            DelayedSequencerError::BridgeAccumulatorMismatch { pos: 1, l1_block: 90, .. }
        ));
        assert!(streamer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_bridge_queried_at_finalized_block() {
        let Harness { inbox, streamer, reader, .. } = harness(100, 90, &[1, 2]);
        let expected = inbox.delayed_accumulator(1).unwrap();

        let mut bridge = MockBridge::new();
        bridge
            .expect_accumulator()
            .withf(|pos, l1_block| *pos == 1 && *l1_block == 90)
            .times(1)
            .returning(move |_, _| Ok(expected));

        let (_config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
        let mut sequencer =
            DelayedSequencer::new(reader, inbox, bridge, Arc::clone(&streamer), config_rx);
        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 2 }
        );
    }

    #[tokio::test]
    async fn test_reader_failure_propagates() {
        let Harness { inbox, bridge, streamer, .. } = harness(100, 90, &[1]);
        let mut reader = MockReader::new();
        reader.expect_last_header().returning(|| Ok(Some(header(100))));
        reader
            .expect_latest_finalized_block_nr()
            .returning(|| Err(L1ReaderError::BlockNotFound(alloy_eips::BlockNumberOrTag::Finalized)));

        let (_config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
        let mut sequencer = DelayedSequencer::new(reader, inbox, bridge, streamer, config_rx);

        let err = sequencer.update(&header(100)).await.unwrap_err();
        assert!(matches!(err, DelayedSequencerError::L1Reader(_)));
        assert!(!err.is_consistency_violation());
        assert_eq!(sequencer.waiting_for_finalized_block(), 0);
    }

    #[tokio::test]
    async fn test_tracker_failure_propagates() {
        let Harness { reader, bridge, streamer, .. } = harness(100, 90, &[]);
        let mut inbox = MockTracker::new();
        inbox.expect_delayed_count().returning(|| Ok(1));
        inbox
            .expect_delayed_message_and_accumulator()
            .returning(|_| Err(InboxTrackerError::Database("disk".into())));

        let (_config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
        let mut sequencer =
            DelayedSequencer::new(reader, inbox, bridge, Arc::clone(&streamer), config_rx);

        let err = sequencer.update(&header(100)).await.unwrap_err();
        assert!(matches!(err, DelayedSequencerError::InboxTracker(InboxTrackerError::Database(_))));
        assert!(streamer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_run_exits_on_subscription_close() {
        let Harness { sequencer, reader, streamer, .. } = harness(100, 90, &[1, 2]);
        let handle = sequencer.start(CancellationToken::new());

        reader.wait_for_subscriber().await;
        reader.publish(header(100)).await;
        reader.close_subscriptions();

        handle.await.unwrap();
        assert_eq!(streamer.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_run_exits_on_cancellation() {
        let Harness { sequencer, .. } = harness(100, 90, &[]);
        let cancellation = CancellationToken::new();
        let handle = sequencer.start(cancellation.clone());

        cancellation.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_update_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let recorded = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);
        Metrics::init();

        let Harness { mut sequencer, reader, inbox, .. } = harness(100, 90, &[1, 2, 95]);
        assert_eq!(
            sequencer.update(&header(100)).await.unwrap(),
            SequencerUpdate::Sequenced { start_pos: 0, count: 2 }
        );
        assert!(recorded.render().contains("arb_delayed_sequencer_messages_sequenced_total 2"));
        assert!(recorded.render().contains("arb_delayed_sequencer_waiting_for_block 95"));

        reader.set_finalized(100);
        reader.set_safe(100);
        inbox.set_accumulator(2, B256::repeat_byte(0xee));
        sequencer.update(&header(100)).await.unwrap_err();

        let Harness { mut sequencer, bridge, .. } = harness(100, 90, &[1]);
        bridge.set_accumulator(0, B256::repeat_byte(0xaa));
        sequencer.update(&header(100)).await.unwrap_err();

        let rendered = recorded.render();
        assert!(rendered
            .contains("arb_delayed_sequencer_accumulator_mismatch_total{source=\"tracker\"} 1"));
        assert!(rendered
            .contains("arb_delayed_sequencer_accumulator_mismatch_total{source=\"bridge\"} 1"));
        assert!(rendered.contains("arb_delayed_sequencer_messages_sequenced_total 2"));
    }

    #[tokio::test]
    async fn test_run_survives_failed_update() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let recorded = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let Harness { sequencer, reader, bridge, streamer, inbox, .. } = harness(100, 90, &[1]);
        let correct = inbox.delayed_accumulator(0).unwrap();
        bridge.set_accumulator(0, B256::repeat_byte(1));
        let handle = sequencer.start(CancellationToken::new());
        reader.wait_for_subscriber().await;

        reader.publish(header(100)).await;
        while bridge.queries() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(
            recorded
                .render()
                .contains("arb_delayed_sequencer_update_error_total{method=\"update\"} 1")
        );
        assert!(streamer.messages().is_empty());

        bridge.set_accumulator(0, correct);
        reader.set_finalized(200);
        reader.publish(header(200)).await;
        reader.close_subscriptions();

        handle.await.unwrap();
        assert_eq!(bridge.queries(), 2);
        assert_eq!(streamer.messages().len(), 1);
        assert!(
            recorded
                .render()
                .contains("arb_delayed_sequencer_update_success_total{method=\"update\"} 1")
        );
    }
}
