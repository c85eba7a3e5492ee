//! A FIFO queue of storage words.

use crate::{SlotValue, StateBackend, StateError, Storage};
use alloy_primitives::B256;

/// A FIFO queue persisted in a [`Storage`] view.
///
/// Slot 0 holds the offset of the next write and slot 1 the offset of the next read. Items live
/// in a child view keyed by their offset. When the last item is shifted out both offsets are
/// cleared, so an emptied queue leaves no slots behind.
#[derive(Debug, Clone)]
pub struct StorageQueue<B> {
    storage: Storage<B>,
    items: Storage<B>,
}

impl<B: StateBackend> StorageQueue<B> {
    const NEXT_PUT_OFFSET: u64 = 0;
    const NEXT_GET_OFFSET: u64 = 1;

    /// Opens the queue stored under `storage`.
    pub fn open(storage: Storage<B>) -> Self {
        let items = storage.open_sub_storage(&[]);
        Self { storage, items }
    }

    fn next_put(&self) -> Result<u64, StateError> {
        self.storage.cell::<u64>(Self::NEXT_PUT_OFFSET).get()
    }

    fn next_get(&self) -> Result<u64, StateError> {
        self.storage.cell::<u64>(Self::NEXT_GET_OFFSET).get()
    }

    /// Number of items in the queue.
    pub fn size(&self) -> Result<u64, StateError> {
        Ok(self.next_put()?.saturating_sub(self.next_get()?))
    }

    /// Returns `true` if the queue holds no items.
    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.size()? == 0)
    }

    /// Returns the head item without removing it.
    pub fn peek(&self) -> Result<Option<B256>, StateError> {
        let (get, put) = (self.next_get()?, self.next_put()?);
        if get >= put {
            return Ok(None);
        }
        self.items.get_by_u64(get).map(Some)
    }

    /// Returns the most recently pushed item.
    pub fn peek_back(&self) -> Result<Option<B256>, StateError> {
        let (get, put) = (self.next_get()?, self.next_put()?);
        if get >= put {
            return Ok(None);
        }
        self.items.get_by_u64(put - 1).map(Some)
    }

    /// Appends `item` to the tail of the queue.
    ///
    /// On failure the queue is left as it was.
    pub fn push(&self, item: B256) -> Result<(), StateError> {
        let put = self.next_put()?;
        self.items.set_by_u64(put, item)?;
        if let Err(err) = self.storage.cell::<u64>(Self::NEXT_PUT_OFFSET).set(&(put + 1)) {
            self.items.clear_by_u64(put)?;
            return Err(err);
        }
        Ok(())
    }

    /// Removes and returns the tail item, undoing the last [`push`](Self::push).
    pub fn pop_back(&self) -> Result<Option<B256>, StateError> {
        let (get, put) = (self.next_get()?, self.next_put()?);
        if get >= put {
            return Ok(None);
        }

        let item = self.items.swap((put - 1).to_word(), B256::ZERO)?;
        self.release_or_set(get + 1 == put, Self::NEXT_PUT_OFFSET, put - 1)?;
        Ok(Some(item))
    }

    /// Removes and returns the head item.
    pub fn shift(&self) -> Result<Option<B256>, StateError> {
        let (get, put) = (self.next_get()?, self.next_put()?);
        if get >= put {
            return Ok(None);
        }

        let item = self.items.swap(get.to_word(), B256::ZERO)?;
        self.release_or_set(get + 1 == put, Self::NEXT_GET_OFFSET, get + 1)?;
        Ok(Some(item))
    }

    /// Clears both offsets once the queue is drained, otherwise moves the offset at `slot`.
    fn release_or_set(&self, drained: bool, slot: u64, offset: u64) -> Result<(), StateError> {
        if drained {
            self.storage.clear_by_u64(Self::NEXT_GET_OFFSET)?;
            self.storage.clear_by_u64(Self::NEXT_PUT_OFFSET)
        } else {
            self.storage.cell::<u64>(slot).set(&offset)
        }
    }
}
