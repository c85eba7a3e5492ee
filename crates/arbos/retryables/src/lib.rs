#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::RetryableError;

mod ticket;
pub use ticket::RetryableTicket;

mod queue;
pub use queue::TimeoutQueue;

mod store;
pub use store::{RetryableState, RetryableStateExt};

mod reaper;
pub use reaper::RETRYABLE_REAP_PRICE;

mod metrics;
pub use metrics::Metrics;
