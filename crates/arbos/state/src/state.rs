//! The top-level rollup state handle.

use crate::{MemoryBackend, StateBackend, StateError, Storage, SystemBurner};
use alloy_primitives::B256;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Slot of the root view holding the last block timestamp the state has observed.
const LAST_TIMESTAMP_SEEN_OFFSET: u64 = 0;

/// Handle to the rollup state: the shared backend, its root storage view and the system gas
/// meter.
#[derive(Debug)]
pub struct RollupState<B> {
    backend: Arc<RwLock<B>>,
    root: Storage<B>,
    burner: SystemBurner,
}

impl<B: StateBackend> RollupState<B> {
    /// Wraps `backend` with an unlimited system burner.
    pub fn new(backend: B) -> Self {
        Self::from_shared(Arc::new(RwLock::new(backend)), SystemBurner::unlimited())
    }

    /// Builds a state over an already shared backend.
    pub fn from_shared(backend: Arc<RwLock<B>>, burner: SystemBurner) -> Self {
        let root = Storage::root(Arc::clone(&backend));
        Self { backend, root, burner }
    }

    /// The shared backend.
    pub const fn backend(&self) -> &Arc<RwLock<B>> {
        &self.backend
    }

    /// Opens the child view `id` of the root storage.
    pub fn open_sub_storage(&self, id: &[u8]) -> Storage<B> {
        self.root.open_sub_storage(id)
    }

    /// The system gas meter.
    pub const fn burner(&self) -> &SystemBurner {
        &self.burner
    }

    /// Mutable access to the system gas meter.
    pub const fn burner_mut(&mut self) -> &mut SystemBurner {
        &mut self.burner
    }

    /// Timestamp of the last block processed against this state.
    pub fn last_timestamp_seen(&self) -> Result<u64, StateError> {
        self.root.cell::<u64>(LAST_TIMESTAMP_SEEN_OFFSET).get()
    }

    /// Records `timestamp` as the last seen block timestamp. Timestamps never move backwards.
    pub fn set_last_timestamp_seen(&self, timestamp: u64) -> Result<(), StateError> {
        let cell = self.root.cell::<u64>(LAST_TIMESTAMP_SEEN_OFFSET);
        let last = cell.get()?;
        if timestamp < last {
            return Err(StateError::TimestampRegression { last, new: timestamp });
        }
        debug!(target: "arb_state", last, timestamp, "Advancing last seen timestamp");
        cell.set(&timestamp)
    }
}

impl RollupState<MemoryBackend> {
    /// A state over a fresh, unbounded [`MemoryBackend`].
    pub fn memory_backed() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Merkle-Patricia root of the whole state.
    pub fn state_root(&self) -> Result<B256, StateError> {
        let backend = self.backend.read().map_err(|_| StateError::LockPoisoned)?;
        Ok(backend.state_root())
    }
}
