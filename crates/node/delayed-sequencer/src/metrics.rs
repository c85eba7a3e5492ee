//! Metrics for the delayed sequencer.

use arb_metrics::OperationMetrics;

/// Container for delayed sequencer metrics.
#[derive(Debug, Clone, Copy)]
pub struct Metrics;

impl Metrics {
    /// Label of the per-header update operation.
    pub const METHOD_UPDATE: &'static str = "update";

    /// Delayed messages handed to the transaction streamer.
    pub const MESSAGES_SEQUENCED_TOTAL: &'static str =
        "arb_delayed_sequencer_messages_sequenced_total";
    /// Accumulator mismatches, labelled by `source` (`tracker` or `bridge`).
    pub const ACCUMULATOR_MISMATCH_TOTAL: &'static str =
        "arb_delayed_sequencer_accumulator_mismatch_total";
    /// The L1 block the sequencer waits for before doing more work.
    pub const WAITING_FOR_BLOCK: &'static str = "arb_delayed_sequencer_waiting_for_block";

    /// Describes and zeroes every delayed sequencer metric.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        Self::describe_operations();
        metrics::describe_counter!(
            Self::MESSAGES_SEQUENCED_TOTAL,
            metrics::Unit::Count,
            "Total number of delayed messages sequenced"
        );
        metrics::describe_counter!(
            Self::ACCUMULATOR_MISMATCH_TOTAL,
            metrics::Unit::Count,
            "Total number of delayed accumulator mismatches"
        );
        metrics::describe_gauge!(
            Self::WAITING_FOR_BLOCK,
            "L1 block number the delayed sequencer is waiting to become final"
        );
    }

    fn zero() {
        Self::zero_operation(Self::METHOD_UPDATE);
        metrics::counter!(Self::MESSAGES_SEQUENCED_TOTAL).increment(0);
        metrics::counter!(Self::ACCUMULATOR_MISMATCH_TOTAL, "source" => "tracker").increment(0);
        metrics::counter!(Self::ACCUMULATOR_MISMATCH_TOTAL, "source" => "bridge").increment(0);
        metrics::gauge!(Self::WAITING_FOR_BLOCK).set(0.0);
    }
}

impl OperationMetrics for Metrics {
    const SUCCESS_TOTAL: &'static str = "arb_delayed_sequencer_update_success_total";
    const ERROR_TOTAL: &'static str = "arb_delayed_sequencer_update_error_total";
    const DURATION_SECONDS: &'static str = "arb_delayed_sequencer_update_duration_seconds";
    const COMPONENT: &'static str = "delayed sequencer";
}
