//! Execution environment seam.
//!
//! The step runner and plan builders speak to the chain through the
//! [`Environment`] trait: one read-only accessor call, one state-changing
//! submission that waits for confirmation. Production uses the alloy-backed
//! [`evm::EvmEnvironment`]; tests substitute in-memory fakes.

use crate::error::EnvironmentError;
use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;

pub mod evm;

pub use evm::EvmEnvironment;

/// Proof that a write landed: the mined transaction and its receipt facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: B256,
    pub block_number: u64,
    pub gas_used: u128,
}

#[async_trait]
pub trait Environment: Send + Sync {
    /// Read-only accessor invocation (`eth_call`). Empty return data is
    /// passed through untouched; callers decide what absence means.
    async fn call(
        &self,
        target: Address,
        data: Bytes,
    ) -> std::result::Result<Bytes, EnvironmentError>;

    /// State-changing invocation. Resolves once the transaction is mined at
    /// the configured confirmation depth, distinguishing submission
    /// rejection from an on-chain revert.
    async fn submit(
        &self,
        target: Address,
        data: Bytes,
        gas_limit: Option<u64>,
    ) -> std::result::Result<Confirmation, EnvironmentError>;

    /// The account writes are sent from.
    fn operator(&self) -> Address;
}
