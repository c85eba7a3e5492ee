//! Messages delivered from L1 to the rollup.

use alloy_primitives::{Address, B256, Bytes, U256};
use thiserror::Error;

/// The kind of an [`L1IncomingMessage`], as carried in the first byte of its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[repr(u8)]
pub enum L1MessageKind {
    /// A signed or unsigned L2 transaction batch.
    #[display("l2_message")]
    L2Message = 3,
    /// Marks the end of an L2 block.
    #[display("end_of_block")]
    EndOfBlock = 6,
    /// An L2 message whose gas is paid for on L1.
    #[display("l2_funded_by_l1")]
    L2FundedByL1 = 7,
    /// A rollup protocol event.
    #[display("rollup_event")]
    RollupEvent = 8,
    /// Submission of a retryable ticket.
    #[display("submit_retryable")]
    SubmitRetryable = 9,
    /// A batch sent for gas estimation only.
    #[display("batch_for_gas_estimation")]
    BatchForGasEstimation = 10,
    /// Chain initialization message.
    #[display("initialize")]
    Initialize = 11,
    /// A plain ETH deposit.
    #[display("eth_deposit")]
    EthDeposit = 12,
    /// Batch poster report used for L1 pricing.
    #[display("batch_posting_report")]
    BatchPostingReport = 13,
    /// A message rejected by the inbox.
    #[display("invalid")]
    Invalid = 0xff,
}

/// Error returned when a header carries a kind byte that has no [`L1MessageKind`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("unknown L1 message kind: {0}")]
pub struct UnknownMessageKind(pub u8);

impl TryFrom<u8> for L1MessageKind {
    type Error = UnknownMessageKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            3 => Self::L2Message,
            6 => Self::EndOfBlock,
            7 => Self::L2FundedByL1,
            8 => Self::RollupEvent,
            9 => Self::SubmitRetryable,
            10 => Self::BatchForGasEstimation,
            11 => Self::Initialize,
            12 => Self::EthDeposit,
            13 => Self::BatchPostingReport,
            0xff => Self::Invalid,
            other => return Err(UnknownMessageKind(other)),
        })
    }
}

impl From<L1MessageKind> for u8 {
    fn from(kind: L1MessageKind) -> Self {
        kind as Self
    }
}

/// The header of an [`L1IncomingMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct L1IncomingMessageHeader {
    /// Raw message kind. Kept as a byte so unknown kinds still hash correctly.
    pub kind: u8,
    /// The L1 account that posted the message.
    pub poster: Address,
    /// The L1 block number the message was included in.
    pub block_number: u64,
    /// The L1 timestamp of the including block.
    pub timestamp: u64,
    /// The delayed inbox request id, if the message came through the delayed inbox.
    pub request_id: Option<B256>,
    /// The L1 base fee at inclusion time, if known.
    pub l1_base_fee: Option<U256>,
}

impl L1IncomingMessageHeader {
    /// Returns the decoded [`L1MessageKind`].
    pub fn message_kind(&self) -> Result<L1MessageKind, UnknownMessageKind> {
        L1MessageKind::try_from(self.kind)
    }
}

/// A message delivered from L1 into the rollup's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct L1IncomingMessage {
    /// The message header.
    pub header: L1IncomingMessageHeader,
    /// The opaque L2 payload.
    pub l2_msg: Bytes,
}

impl L1IncomingMessage {
    /// Creates a new [`L1IncomingMessage`].
    pub const fn new(header: L1IncomingMessageHeader, l2_msg: Bytes) -> Self {
        Self { header, l2_msg }
    }

    /// The L1 block number the message was included in.
    pub const fn block_number(&self) -> u64 {
        self.header.block_number
    }
}

/// An entry of the transaction streamer's message log.
///
/// `delayed_messages_read` is the total number of delayed messages consumed by the L2 chain up to
/// and including this message, which makes the tail entry the resume point for the delayed
/// sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MessageWithMetadata {
    /// The sequenced message.
    pub message: L1IncomingMessage,
    /// Delayed messages read after this message.
    pub delayed_messages_read: u64,
}

impl MessageWithMetadata {
    /// Creates a new [`MessageWithMetadata`].
    pub const fn new(message: L1IncomingMessage, delayed_messages_read: u64) -> Self {
        Self { message, delayed_messages_read }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, L1MessageKind::L2Message)]
    #[case(9, L1MessageKind::SubmitRetryable)]
    #[case(12, L1MessageKind::EthDeposit)]
    #[case(0xff, L1MessageKind::Invalid)]
    fn test_message_kind_round_trip(#[case] raw: u8, #[case] kind: L1MessageKind) {
        assert_eq!(L1MessageKind::try_from(raw), Ok(kind));
        assert_eq!(u8::from(kind), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(14)]
    fn test_unknown_message_kind(#[case] raw: u8) {
        let header = L1IncomingMessageHeader { kind: raw, ..Default::default() };
        assert_eq!(header.message_kind(), Err(UnknownMessageKind(raw)));
    }

    #[test]
    fn test_message_kind_display() {
        assert_eq!(L1MessageKind::SubmitRetryable.to_string(), "submit_retryable");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_header_serde_camel_case() {
        let header = L1IncomingMessageHeader {
            kind: 12,
            poster: Address::repeat_byte(0x11),
            block_number: 7,
            timestamp: 99,
            request_id: Some(B256::repeat_byte(0x22)),
            l1_base_fee: None,
        };
        let json = serde_json::to_value(&header).unwrap();
        assert!(json.get("blockNumber").is_some());
        assert!(json.get("requestId").is_some());
        assert!(json.get("l1BaseFee").is_some());

        let decoded: L1IncomingMessageHeader = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, header);
    }
}
