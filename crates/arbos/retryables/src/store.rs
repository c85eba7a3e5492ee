//! Persistent ticket storage.

use crate::{Metrics, RetryableError, RetryableTicket, TimeoutQueue};
use alloy_primitives::{Address, B256, Bytes, U256};
use arb_state::{AddressOrNil, RollupState, StateBackend, StateError, Storage};
use tracing::{debug, warn};

const FROM_OFFSET: u64 = 0;
const TO_OFFSET: u64 = 1;
const CALL_VALUE_OFFSET: u64 = 2;
const BENEFICIARY_OFFSET: u64 = 3;
const TIMEOUT_OFFSET: u64 = 4;
const CALLDATA_KEY: &[u8] = b"calldata";

const RETRYABLES_KEY: &[u8] = b"retryables";
const TIMEOUT_QUEUE_KEY: &[u8] = b"timeout-queue";

/// The retryable subsystem of a [`RollupState`].
///
/// Each ticket lives in its own sub-storage keyed by id. A ticket exists iff its timeout slot is
/// non-zero, which is why zero timeouts are rejected.
#[derive(Debug)]
pub struct RetryableState<B> {
    retryables: Storage<B>,
    timeout_queue: TimeoutQueue<B>,
}

/// Gives a [`RollupState`] access to its retryables.
pub trait RetryableStateExt<B> {
    /// Opens the retryable subsystem.
    fn retryable_state(&self) -> RetryableState<B>;
}

impl<B: StateBackend> RetryableStateExt<B> for RollupState<B> {
    fn retryable_state(&self) -> RetryableState<B> {
        RetryableState::open(self.open_sub_storage(RETRYABLES_KEY))
    }
}

impl<B: StateBackend> RetryableState<B> {
    /// Opens the retryable subsystem rooted at `retryables`.
    pub fn open(retryables: Storage<B>) -> Self {
        let timeout_queue = TimeoutQueue::open(retryables.open_sub_storage(TIMEOUT_QUEUE_KEY));
        Self { retryables, timeout_queue }
    }

    /// The queue of ticket ids in creation order.
    pub const fn timeout_queue(&self) -> &TimeoutQueue<B> {
        &self.timeout_queue
    }

    fn ticket_storage(&self, id: B256) -> Storage<B> {
        self.retryables.open_sub_storage(id.as_slice())
    }

    /// Timeout of ticket `id`, or `None` if there is no such ticket. Ignores expiry.
    pub(crate) fn raw_timeout(&self, id: B256) -> Result<Option<u64>, StateError> {
        let timeout = self.ticket_storage(id).cell::<u64>(TIMEOUT_OFFSET).get()?;
        Ok((timeout != 0).then_some(timeout))
    }

    /// Stores a new ticket and queues it for expiry.
    ///
    /// A failed write undoes everything written so far, so an error leaves neither a partial
    /// ticket nor a queued id behind.
    #[allow(clippy::too_many_arguments)]
    pub fn create_retryable(
        &self,
        id: B256,
        timeout: u64,
        from: Address,
        to: Option<Address>,
        call_value: U256,
        beneficiary: Address,
        calldata: Bytes,
    ) -> Result<RetryableTicket, RetryableError> {
        if timeout == 0 {
            return Err(RetryableError::ZeroTimeout);
        }
        if self.raw_timeout(id)?.is_some() {
            return Err(RetryableError::DuplicateId(id));
        }
        if let Some(tail) = self.timeout_queue.peek_back()? {
            if let Some(tail_timeout) = self.raw_timeout(tail)? {
                if timeout < tail_timeout {
                    return Err(RetryableError::TimeoutOrder { tail_timeout, timeout });
                }
            }
        }

        let ticket = RetryableTicket { id, from, to, call_value, beneficiary, calldata, timeout };
        self.timeout_queue.push(id)?;
        if let Err(err) = self.write_ticket(&ticket) {
            self.clear_ticket(id)?;
            self.timeout_queue.pop_back()?;
            warn!(target: "retryables", %id, %err, "Rolled back retryable creation");
            return Err(err.into());
        }

        metrics::counter!(Metrics::RETRYABLES_CREATED_TOTAL).increment(1);
        debug!(
            target: "retryables",
            %id,
            timeout,
            calldata_len = ticket.calldata.len(),
            "Created retryable"
        );

        Ok(ticket)
    }

    /// Writes every field of `ticket`. The timeout goes last since it marks the ticket as live.
    fn write_ticket(&self, ticket: &RetryableTicket) -> Result<(), StateError> {
        let storage = self.ticket_storage(ticket.id);
        storage.cell::<Address>(FROM_OFFSET).set(&ticket.from)?;
        storage.cell::<AddressOrNil>(TO_OFFSET).set(&AddressOrNil(ticket.to))?;
        storage.cell::<U256>(CALL_VALUE_OFFSET).set(&ticket.call_value)?;
        storage.cell::<Address>(BENEFICIARY_OFFSET).set(&ticket.beneficiary)?;
        storage.bytes(CALLDATA_KEY).set(&ticket.calldata)?;
        storage.cell::<u64>(TIMEOUT_OFFSET).set(&ticket.timeout)
    }

    /// Zeroes every slot ticket `id` may occupy, whether or not it is live.
    fn clear_ticket(&self, id: B256) -> Result<(), StateError> {
        let storage = self.ticket_storage(id);
        storage.cell::<Address>(FROM_OFFSET).clear()?;
        storage.cell::<AddressOrNil>(TO_OFFSET).clear()?;
        storage.cell::<U256>(CALL_VALUE_OFFSET).clear()?;
        storage.cell::<Address>(BENEFICIARY_OFFSET).clear()?;
        storage.cell::<u64>(TIMEOUT_OFFSET).clear()?;
        storage.bytes(CALLDATA_KEY).clear()
    }

    /// Reads ticket `id` as seen at `current_timestamp`.
    ///
    /// Tickets with `timeout < current_timestamp` are reported as absent even if they have not
    /// been reaped yet.
    pub fn open_retryable(
        &self,
        id: B256,
        current_timestamp: u64,
    ) -> Result<Option<RetryableTicket>, RetryableError> {
        let Some(timeout) = self.raw_timeout(id)? else {
            return Ok(None);
        };
        if timeout < current_timestamp {
            return Ok(None);
        }

        let storage = self.ticket_storage(id);
        Ok(Some(RetryableTicket {
            id,
            from: storage.cell::<Address>(FROM_OFFSET).get()?,
            to: storage.cell::<AddressOrNil>(TO_OFFSET).get()?.0,
            call_value: storage.cell::<U256>(CALL_VALUE_OFFSET).get()?,
            beneficiary: storage.cell::<Address>(BENEFICIARY_OFFSET).get()?,
            calldata: storage.bytes(CALLDATA_KEY).get()?,
            timeout,
        }))
    }

    /// Clears every slot of ticket `id`. Returns `false` if there was no such ticket.
    ///
    /// Leaves the timeout queue alone.
    pub(crate) fn delete_retryable(&self, id: B256) -> Result<bool, StateError> {
        if self.raw_timeout(id)?.is_none() {
            return Ok(false);
        }

        self.clear_ticket(id)?;
        Ok(true)
    }
}
