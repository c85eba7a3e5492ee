/// Runs `$block`, records its outcome under the [`OperationMetrics`](crate::OperationMetrics)
/// names of `$metrics` and returns the result.
#[macro_export]
macro_rules! observe_operation {
    ($metrics:ty, $method:expr, $block:expr) => {{
        let start_time = ::std::time::Instant::now();
        let result = $block;
        $crate::__record_outcome!($metrics, $method, result.is_ok(), start_time);
        result
    }};
}

/// Async flavour of [`observe_operation!`]: awaits `$future` before recording.
#[macro_export]
macro_rules! observe_operation_async {
    ($metrics:ty, $method:expr, $future:expr) => {{
        let start_time = ::std::time::Instant::now();
        let result = $future.await;
        $crate::__record_outcome!($metrics, $method, result.is_ok(), start_time);
        result
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_outcome {
    ($metrics:ty, $method:expr, $ok:expr, $start_time:expr) => {{
        let duration = $start_time.elapsed().as_secs_f64();
        let counter = if $ok {
            <$metrics as $crate::OperationMetrics>::SUCCESS_TOTAL
        } else {
            <$metrics as $crate::OperationMetrics>::ERROR_TOTAL
        };
        $crate::metrics::counter!(counter, "method" => $method).increment(1);
        $crate::metrics::histogram!(
            <$metrics as $crate::OperationMetrics>::DURATION_SECONDS,
            "method" => $method
        )
        .record(duration);
    }};
}
