//! Keyed storage backends.

use crate::StateError;
use alloy_primitives::{B256, U256};
use alloy_trie::{EMPTY_ROOT_HASH, HashBuilder, Nibbles};
use std::{collections::BTreeMap, fmt::Debug};

/// An opaque keyed mapping from 32-byte slots to 32-byte words.
///
/// Unset slots read as [`B256::ZERO`] and writing the zero word removes the slot, mirroring EVM
/// storage semantics.
#[auto_impl::auto_impl(&mut, Box)]
pub trait StateBackend: Debug + Send + Sync {
    /// Reads the word stored at `key`.
    fn get(&self, key: B256) -> Result<B256, StateError>;

    /// Writes `value` at `key`.
    fn set(&mut self, key: B256, value: B256) -> Result<(), StateError>;
}

/// An in-memory [`StateBackend`].
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slots: BTreeMap<B256, B256>,
    slot_limit: Option<usize>,
}

impl MemoryBackend {
    /// Creates an empty, unbounded [`MemoryBackend`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty backend that refuses to hold more than `limit` live slots.
    pub const fn with_slot_limit(limit: usize) -> Self {
        Self { slots: BTreeMap::new(), slot_limit: Some(limit) }
    }

    /// Number of live (non-zero) slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is set.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Computes the Merkle-Patricia root over all live slots.
    ///
    /// Values are stored RLP-encoded as integers, the same way account storage tries are built.
    pub fn state_root(&self) -> B256 {
        if self.slots.is_empty() {
            return EMPTY_ROOT_HASH;
        }

        let mut builder = HashBuilder::default();
        for (key, value) in &self.slots {
            let encoded = alloy_rlp::encode(U256::from_be_bytes(value.0));
            builder.add_leaf(Nibbles::unpack(key), &encoded);
        }
        builder.root()
    }
}

impl StateBackend for MemoryBackend {
    fn get(&self, key: B256) -> Result<B256, StateError> {
        Ok(self.slots.get(&key).copied().unwrap_or_default())
    }

    fn set(&mut self, key: B256, value: B256) -> Result<(), StateError> {
        if value.is_zero() {
            self.slots.remove(&key);
            return Ok(());
        }

        if let Some(limit) = self.slot_limit {
            if !self.slots.contains_key(&key) && self.slots.len() >= limit {
                return Err(StateError::OutOfSpace { limit });
            }
        }

        self.slots.insert(key, value);
        Ok(())
    }
}
