//! Metrics for the retryable engine.

/// Container for retryable metrics.
#[derive(Debug, Clone, Copy)]
pub struct Metrics;

impl Metrics {
    /// Number of tickets created.
    pub const RETRYABLES_CREATED_TOTAL: &'static str = "arb_retryables_created_total";
    /// Number of expired tickets reaped.
    pub const RETRYABLES_REAPED_TOTAL: &'static str = "arb_retryables_reaped_total";
    /// Gas burnt by reaping.
    pub const RETRYABLES_REAP_GAS_TOTAL: &'static str = "arb_retryables_reap_gas_total";

    /// Describes and zeroes every retryable metric.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::RETRYABLES_CREATED_TOTAL,
            metrics::Unit::Count,
            "Total number of retryable tickets created"
        );
        metrics::describe_counter!(
            Self::RETRYABLES_REAPED_TOTAL,
            metrics::Unit::Count,
            "Total number of expired retryable tickets reaped"
        );
        metrics::describe_counter!(
            Self::RETRYABLES_REAP_GAS_TOTAL,
            metrics::Unit::Count,
            "Total gas burnt reaping retryable tickets"
        );
    }

    fn zero() {
        metrics::counter!(Self::RETRYABLES_CREATED_TOTAL).increment(0);
        metrics::counter!(Self::RETRYABLES_REAPED_TOTAL).increment(0);
        metrics::counter!(Self::RETRYABLES_REAP_GAS_TOTAL).increment(0);
    }
}
