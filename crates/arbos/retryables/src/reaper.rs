//! Eviction of expired tickets.

use crate::{Metrics, RetryableError, RetryableState};
use arb_state::{Burner, StateBackend, TracingScenario};
use tracing::{debug, trace};

/// Gas charged for reaping one expired ticket.
///
/// Consensus critical: every node must charge exactly this amount, whatever the size of the
/// ticket's calldata or the depth of the queue.
pub const RETRYABLE_REAP_PRICE: u64 = 58_000;

impl<B: StateBackend> RetryableState<B> {
    /// Reaps the ticket at the head of the timeout queue if it has expired at
    /// `current_timestamp`.
    ///
    /// Does nothing when the queue is empty, when the head ticket is still live, or when the head
    /// id has no ticket. Otherwise burns [`RETRYABLE_REAP_PRICE`] from `burner`, deletes the
    /// ticket and shifts the queue. The burn comes first, so a burn failure leaves the state
    /// untouched.
    pub fn try_to_reap_one_retryable<U: Burner + ?Sized>(
        &self,
        current_timestamp: u64,
        burner: &mut U,
        scenario: TracingScenario,
    ) -> Result<(), RetryableError> {
        let Some(id) = self.timeout_queue().peek()? else {
            return Ok(());
        };

        let Some(timeout) = self.raw_timeout(id)? else {
            trace!(target: "retryables", %id, "Queue head has no ticket");
            return Ok(());
        };
        if timeout >= current_timestamp {
            return Ok(());
        }

        burner.burn(RETRYABLE_REAP_PRICE)?;
        self.delete_retryable(id)?;
        self.timeout_queue().shift()?;

        metrics::counter!(Metrics::RETRYABLES_REAPED_TOTAL).increment(1);
        metrics::counter!(Metrics::RETRYABLES_REAP_GAS_TOTAL).increment(RETRYABLE_REAP_PRICE);
        debug!(
            target: "retryables",
            %id,
            timeout,
            current_timestamp,
            %scenario,
            "Reaped expired retryable"
        );
        Ok(())
    }
}
