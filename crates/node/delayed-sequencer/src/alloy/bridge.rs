//! [`DelayedBridge`] over `eth_call`.

use crate::{BridgeError, DelayedBridge};
use alloy_eips::BlockId;
use alloy_primitives::{Address, B256, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;

sol! {
    /// The delayed inbox accumulator getter of the L1 bridge contract.
    function delayedInboxAccs(uint256 index) external view returns (bytes32);
}

/// Reads delayed inbox accumulators from the bridge contract.
#[derive(Debug, Clone)]
pub struct AlloyDelayedBridge {
    provider: RootProvider,
    address: Address,
}

impl AlloyDelayedBridge {
    /// Creates a reader for the bridge deployed at `address`.
    pub const fn new(provider: RootProvider, address: Address) -> Self {
        Self { provider, address }
    }

    /// Address of the bridge contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    fn call_request(&self, pos: u64) -> TransactionRequest {
        let input = delayedInboxAccsCall { index: U256::from(pos) }.abi_encode();
        TransactionRequest::default().to(self.address).input(TransactionInput::new(input.into()))
    }
}

#[async_trait]
impl DelayedBridge for AlloyDelayedBridge {
    async fn accumulator(&self, pos: u64, l1_block_number: u64) -> Result<B256, BridgeError> {
        let output = self
            .provider
            .call(self.call_request(pos))
            .block(BlockId::number(l1_block_number))
            .await?;
        Ok(delayedInboxAccsCall::abi_decode_returns(&output)?)
    }
}
