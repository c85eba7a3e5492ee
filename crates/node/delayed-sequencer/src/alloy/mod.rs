//! Collaborators backed by an alloy L1 provider.

mod l1_reader;
pub use l1_reader::AlloyL1HeaderReader;

mod bridge;
pub use bridge::AlloyDelayedBridge;
