#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{BurnError, StateError};

mod backend;
pub use backend::{MemoryBackend, StateBackend};

mod storage;
pub use storage::{
    AddressOrNil, NIL_ADDRESS_REPRESENTATION, SlotValue, Storage, StorageBackedBytes, StorageCell,
};

mod queue;
pub use queue::StorageQueue;

mod burn;
pub use burn::{Burner, SystemBurner, TracingScenario};

mod state;
pub use state::RollupState;
