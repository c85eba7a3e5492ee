#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod errors;
pub use errors::{
    BridgeError, DelayedSequencerError, InboxTrackerError, L1ReaderError, StreamerError,
};

mod traits;
pub use traits::{
    DelayedBridge, InboxTracker, L1HeaderReader, SequencerCoordinator, TransactionStreamer,
};

mod config;
pub use config::{DelayedSequencerArgs, DelayedSequencerConfig};

mod sequencer;
pub use sequencer::{DelayedSequencer, SequencerUpdate};

mod alloy;
pub use alloy::{AlloyDelayedBridge, AlloyL1HeaderReader};

mod metrics;
pub use metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
