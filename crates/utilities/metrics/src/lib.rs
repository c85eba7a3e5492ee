#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[doc(hidden)]
pub use metrics;

mod macros;

/// Metric names shared by every operation of a component.
///
/// Each observed call increments either the success or the error counter and records its
/// duration. All three series are labelled with `"method"`.
pub trait OperationMetrics {
    /// Counter of successful calls.
    const SUCCESS_TOTAL: &'static str;
    /// Counter of failed calls.
    const ERROR_TOTAL: &'static str;
    /// Histogram of call durations in seconds.
    const DURATION_SECONDS: &'static str;
    /// Human readable name used in metric descriptions.
    const COMPONENT: &'static str;

    /// Registers descriptions for the operation series.
    fn describe_operations() {
        metrics::describe_counter!(
            Self::SUCCESS_TOTAL,
            metrics::Unit::Count,
            format!("Total number of successful {} operations", Self::COMPONENT)
        );
        metrics::describe_counter!(
            Self::ERROR_TOTAL,
            metrics::Unit::Count,
            format!("Total number of failed {} operations", Self::COMPONENT)
        );
        metrics::describe_histogram!(
            Self::DURATION_SECONDS,
            metrics::Unit::Seconds,
            format!("Duration of {} operations", Self::COMPONENT)
        );
    }

    /// Creates the series for `method` at zero, so they are exported before the first call.
    fn zero_operation(method: &'static str) {
        metrics::counter!(Self::SUCCESS_TOTAL, "method" => method).increment(0);
        metrics::counter!(Self::ERROR_TOTAL, "method" => method).increment(0);
        metrics::histogram!(Self::DURATION_SECONDS, "method" => method).record(0.0);
    }
}
