//! Namespaced storage views and storage-backed values.

use crate::{StateBackend, StateError};
use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use std::{
    fmt,
    marker::PhantomData,
    sync::{Arc, RwLock},
};

/// Word used to encode an absent address in an [`AddressOrNil`] slot (`1 << 255`).
pub const NIL_ADDRESS_REPRESENTATION: B256 = {
    let mut word = [0u8; 32];
    word[0] = 0x80;
    B256::new(word)
};

/// A namespaced view over a shared [`StateBackend`].
///
/// Every view owns a 32-byte storage key. Slots of the view live at
/// `keccak256(storage_key ++ slot)`, and child views are keyed by `keccak256(storage_key ++ id)`,
/// so distinct namespaces never collide.
pub struct Storage<B> {
    backend: Arc<RwLock<B>>,
    storage_key: B256,
}

impl<B> Clone for Storage<B> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend), storage_key: self.storage_key }
    }
}

impl<B> fmt::Debug for Storage<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").field("storage_key", &self.storage_key).finish_non_exhaustive()
    }
}

impl<B: StateBackend> Storage<B> {
    /// Creates the root view over `backend`.
    pub const fn root(backend: Arc<RwLock<B>>) -> Self {
        Self { backend, storage_key: B256::ZERO }
    }

    /// The storage key of this view.
    pub const fn storage_key(&self) -> B256 {
        self.storage_key
    }

    /// Opens the child view identified by `id`.
    pub fn open_sub_storage(&self, id: &[u8]) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            storage_key: keccak256([self.storage_key.as_slice(), id].concat()),
        }
    }

    fn map_slot(&self, slot: B256) -> B256 {
        keccak256([self.storage_key.as_slice(), slot.as_slice()].concat())
    }

    /// Reads the word at `slot`.
    pub fn get(&self, slot: B256) -> Result<B256, StateError> {
        let backend = self.backend.read().map_err(|_| StateError::LockPoisoned)?;
        backend.get(self.map_slot(slot))
    }

    /// Writes `value` at `slot`. Writing [`B256::ZERO`] clears the slot.
    pub fn set(&self, slot: B256, value: B256) -> Result<(), StateError> {
        let mut backend = self.backend.write().map_err(|_| StateError::LockPoisoned)?;
        backend.set(self.map_slot(slot), value)
    }

    /// Clears `slot`.
    pub fn clear(&self, slot: B256) -> Result<(), StateError> {
        self.set(slot, B256::ZERO)
    }

    /// Writes `value` at `slot` and returns the previous word.
    pub fn swap(&self, slot: B256, value: B256) -> Result<B256, StateError> {
        let mut backend = self.backend.write().map_err(|_| StateError::LockPoisoned)?;
        let key = self.map_slot(slot);
        let previous = backend.get(key)?;
        backend.set(key, value)?;
        Ok(previous)
    }

    /// Reads the word at the numeric slot `offset`.
    pub fn get_by_u64(&self, offset: u64) -> Result<B256, StateError> {
        self.get(u64_slot(offset))
    }

    /// Writes the word at the numeric slot `offset`.
    pub fn set_by_u64(&self, offset: u64, value: B256) -> Result<(), StateError> {
        self.set(u64_slot(offset), value)
    }

    /// Clears the numeric slot `offset`.
    pub fn clear_by_u64(&self, offset: u64) -> Result<(), StateError> {
        self.clear(u64_slot(offset))
    }

    /// Returns a typed cell at the numeric slot `offset`.
    pub fn cell<T: SlotValue>(&self, offset: u64) -> StorageCell<B, T> {
        StorageCell { storage: self.clone(), slot: u64_slot(offset), _value: PhantomData }
    }

    /// Returns a bytes value rooted at the child view `id`.
    pub fn bytes(&self, id: &[u8]) -> StorageBackedBytes<B> {
        StorageBackedBytes { storage: self.open_sub_storage(id) }
    }
}

fn u64_slot(offset: u64) -> B256 {
    B256::from(U256::from(offset).to_be_bytes::<32>())
}

/// A value that fits in a single storage word.
pub trait SlotValue: Sized {
    /// Encodes the value as a storage word.
    fn to_word(&self) -> B256;

    /// Decodes the value from a storage word.
    fn from_word(word: B256) -> Self;
}

impl SlotValue for u64 {
    fn to_word(&self) -> B256 {
        u64_slot(*self)
    }

    fn from_word(word: B256) -> Self {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&word[24..]);
        Self::from_be_bytes(buf)
    }
}

impl SlotValue for U256 {
    fn to_word(&self) -> B256 {
        B256::from(self.to_be_bytes::<32>())
    }

    fn from_word(word: B256) -> Self {
        Self::from_be_bytes(word.0)
    }
}

impl SlotValue for B256 {
    fn to_word(&self) -> B256 {
        *self
    }

    fn from_word(word: B256) -> Self {
        word
    }
}

impl SlotValue for Address {
    fn to_word(&self) -> B256 {
        self.into_word()
    }

    fn from_word(word: B256) -> Self {
        Self::from_word(word)
    }
}

/// An optional address. `None` is stored as [`NIL_ADDRESS_REPRESENTATION`], keeping it distinct
/// from the zero address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AddressOrNil(pub Option<Address>);

impl SlotValue for AddressOrNil {
    fn to_word(&self) -> B256 {
        self.0.map_or(NIL_ADDRESS_REPRESENTATION, |address| address.into_word())
    }

    fn from_word(word: B256) -> Self {
        if word == NIL_ADDRESS_REPRESENTATION {
            return Self(None);
        }
        Self(Some(Address::from_word(word)))
    }
}

/// A typed value stored in a single slot.
pub struct StorageCell<B, T> {
    storage: Storage<B>,
    slot: B256,
    _value: PhantomData<fn() -> T>,
}

impl<B, T> fmt::Debug for StorageCell<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCell")
            .field("storage", &self.storage)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<B: StateBackend, T: SlotValue> StorageCell<B, T> {
    /// Reads the value.
    pub fn get(&self) -> Result<T, StateError> {
        self.storage.get(self.slot).map(T::from_word)
    }

    /// Writes the value.
    pub fn set(&self, value: &T) -> Result<(), StateError> {
        self.storage.set(self.slot, value.to_word())
    }

    /// Clears the slot.
    pub fn clear(&self) -> Result<(), StateError> {
        self.storage.clear(self.slot)
    }
}

impl<B: StateBackend> StorageCell<B, u64> {
    /// Adds one to the stored value and returns the new value.
    pub fn increment(&self) -> Result<u64, StateError> {
        let next = self.get()?.saturating_add(1);
        self.set(&next)?;
        Ok(next)
    }
}

/// A variable-length byte string stored as a length slot followed by 32-byte chunks.
#[derive(Debug)]
pub struct StorageBackedBytes<B> {
    storage: Storage<B>,
}

impl<B: StateBackend> StorageBackedBytes<B> {
    const LENGTH_OFFSET: u64 = 0;

    /// Length in bytes of the stored value.
    pub fn len(&self) -> Result<u64, StateError> {
        self.storage.get_by_u64(Self::LENGTH_OFFSET).map(u64::from_word)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.len()? == 0)
    }

    /// Reads the stored bytes.
    pub fn get(&self) -> Result<Bytes, StateError> {
        let len = self.len()? as usize;
        let mut out = Vec::with_capacity(len);
        let mut offset = Self::LENGTH_OFFSET + 1;
        while out.len() < len {
            let chunk = self.storage.get_by_u64(offset)?;
            let take = (len - out.len()).min(32);
            out.extend_from_slice(&chunk[..take]);
            offset += 1;
        }
        Ok(out.into())
    }

    /// Replaces the stored bytes with `value`.
    pub fn set(&self, value: &[u8]) -> Result<(), StateError> {
        self.clear()?;
        self.storage.set_by_u64(Self::LENGTH_OFFSET, (value.len() as u64).to_word())?;
        for (index, chunk) in value.chunks(32).enumerate() {
            let mut word = B256::ZERO;
            word[..chunk.len()].copy_from_slice(chunk);
            self.storage.set_by_u64(Self::LENGTH_OFFSET + 1 + index as u64, word)?;
        }
        Ok(())
    }

    /// Removes the stored bytes, zeroing every chunk.
    pub fn clear(&self) -> Result<(), StateError> {
        let len = self.len()?;
        let chunks = len.div_ceil(32);
        for index in 0..chunks {
            self.storage.clear(u64_slot(Self::LENGTH_OFFSET + 1 + index))?;
        }
        self.storage.clear(u64_slot(Self::LENGTH_OFFSET))
    }
}
