#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod message;
pub use message::{
    L1IncomingMessage, L1IncomingMessageHeader, L1MessageKind, MessageWithMetadata,
    UnknownMessageKind,
};

mod delayed;
pub use delayed::{DelayedInboxMessage, accumulate, accumulator_chain, message_hash};
