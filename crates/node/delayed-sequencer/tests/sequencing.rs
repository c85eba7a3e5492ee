//! Sequencing against in-memory collaborators.

use arb_delayed_sequencer::{
    DelayedSequencer, DelayedSequencerConfig, DelayedSequencerError, InboxTracker, SequencerUpdate,
    test_utils::{
        MemoryDelayedBridge, MemoryInboxTracker, MemoryTransactionStreamer, StaticL1Reader,
        delayed_message, header,
    },
};
use alloy_primitives::B256;
use arb_protocol::accumulator_chain;
use proptest::prelude::*;
use rstest::rstest;
use std::sync::Arc;
use tokio::sync::watch;

struct Setup {
    inbox: Arc<MemoryInboxTracker>,
    bridge: Arc<MemoryDelayedBridge>,
    streamer: Arc<MemoryTransactionStreamer>,
    sequencer: DelayedSequencer<
        Arc<StaticL1Reader>,
        Arc<MemoryInboxTracker>,
        Arc<MemoryDelayedBridge>,
        Arc<MemoryTransactionStreamer>,
    >,
    _config: watch::Sender<DelayedSequencerConfig>,
}

/// `total` delayed messages, message `i` in L1 block `i + 1`, with L1 finalized at `finalized`.
fn setup(total: u64, finalized: u64) -> Setup {
    let reader = Arc::new(StaticL1Reader::new());
    reader.set_head(header(finalized + 64));
    reader.set_finalized(finalized);

    let inbox = Arc::new(MemoryInboxTracker::default());
    for index in 0..total {
        inbox.push(delayed_message(index + 1, index));
    }
    let bridge = Arc::new(MemoryDelayedBridge::mirroring(&inbox));
    let streamer = Arc::new(MemoryTransactionStreamer::default());

    let (config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
    let sequencer = DelayedSequencer::new(
        reader,
        Arc::clone(&inbox),
        Arc::clone(&bridge),
        Arc::clone(&streamer),
        config_rx,
    );
    Setup { inbox, bridge, streamer, sequencer, _config: config }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
}

proptest! {
    #[test]
    fn finalized_prefix_is_sequenced_in_order(total in 1u64..40, k in 0u64..40) {
        let k = k % total;
        let Setup { mut sequencer, streamer, inbox, .. } = setup(total, k + 1);

        let outcome = block_on(sequencer.update(&header(k + 65))).unwrap();
        prop_assert_eq!(outcome, SequencerUpdate::Sequenced { start_pos: 0, count: k + 1 });

        let sequenced = streamer.messages();
        prop_assert_eq!(sequenced.len() as u64, k + 1);
        for (index, entry) in sequenced.iter().enumerate() {
            let (expected, _) = inbox.delayed_message_and_accumulator(index as u64).unwrap();
            prop_assert_eq!(&entry.message, &expected);
            prop_assert_eq!(entry.delayed_messages_read, index as u64 + 1);
        }

        let chain = accumulator_chain(B256::ZERO, sequenced.iter().map(|entry| &entry.message));
        prop_assert_eq!(chain.last().copied(), Some(inbox.delayed_accumulator(k).unwrap()));
    }
}

#[test]
fn sequencing_continues_from_streamer_position() {
    arb_cli::init_test_tracing();
    let Setup { mut sequencer, streamer, .. } = setup(10, 4);

    let first = block_on(sequencer.update(&header(68))).unwrap();
    assert_eq!(first, SequencerUpdate::Sequenced { start_pos: 0, count: 4 });

    let Setup { inbox, bridge, .. } = setup(10, 0);
    let reader = Arc::new(StaticL1Reader::new());
    reader.set_head(header(100));
    reader.set_finalized(10);
    let (_config, config_rx) = watch::channel(DelayedSequencerConfig::TEST);
    let mut restarted =
        DelayedSequencer::new(reader, inbox, bridge, Arc::clone(&streamer), config_rx);

    let second = block_on(restarted.update(&header(100))).unwrap();
    assert_eq!(second, SequencerUpdate::Sequenced { start_pos: 4, count: 6 });
    assert_eq!(streamer.messages().len(), 10);
    assert_eq!(streamer.messages().last().unwrap().delayed_messages_read, 10);
}

#[rstest]
#[case::first(0)]
#[case::middle(5)]
#[case::last(9)]
fn corrupted_accumulator_halts_sequencing(#[case] corrupted: u64) {
    let Setup { mut sequencer, streamer, inbox, .. } = setup(10, 10);
    inbox.set_accumulator(corrupted, B256::repeat_byte(0xde));

    let err = block_on(sequencer.update(&header(74))).unwrap_err();
    assert!(err.is_consistency_violation());
    assert!(matches!(err, DelayedSequencerError::AccumulatorMismatch { pos, .. } if pos == corrupted));
    assert!(streamer.messages().is_empty());
}

#[test]
fn bridge_disagreement_halts_sequencing() {
    let Setup { mut sequencer, streamer, bridge, .. } = setup(3, 10);
    bridge.set_accumulator(2, B256::repeat_byte(0x01));

    let err = block_on(sequencer.update(&header(74))).unwrap_err();
    assert!(matches!(
        err,
        DelayedSequencerError::BridgeAccumulatorMismatch { pos: 2, l1_block: 10, .. }
    ));
    assert!(streamer.messages().is_empty());
}
