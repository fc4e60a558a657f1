use super::{Confirmation, Environment};
use crate::config::chains::ChainProfile;
use crate::error::{ConfigError, EnvironmentError, Result};
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::Http;
use async_trait::async_trait;
use reqwest::Client;
use std::str::FromStr;
use std::sync::Arc;

/// Alloy-backed execution environment over an HTTP provider.
///
/// Nonce, fee, and (absent a per-step limit) gas-limit filling is delegated
/// to the provider's fill stack, so estimation stays on the node.
pub struct EvmEnvironment<P> {
    provider: P,
    operator: Address,
    chain_id: u64,
    confirmations: u64,
    submit_enabled: bool,
}

/// Connects a signing environment. `confirmations` is the receipt depth
/// every write waits for.
pub fn connect(
    rpc_url: &str,
    private_key: &str,
    chain: &ChainProfile,
    confirmations: u64,
) -> Result<Arc<dyn Environment>> {
    let signer = PrivateKeySigner::from_str(private_key.trim()).map_err(|err| {
        ConfigError::InvalidConfig(format!("ETH_PRIVATE_KEY could not be parsed: {err}"))
    })?;
    let operator = signer.address();
    let wallet = EthereumWallet::from(signer);
    let url = rpc_url.parse::<reqwest::Url>().map_err(|err| {
        ConfigError::InvalidConfig(format!("invalid RPC url `{rpc_url}`: {err}"))
    })?;
    let provider = ProviderBuilder::new().wallet(wallet).on_http(url);
    Ok(Arc::new(EvmEnvironment {
        provider,
        operator,
        chain_id: chain.chain_id,
        confirmations: confirmations.max(1),
        submit_enabled: true,
    }))
}

/// Connects a read-only environment for audits. Any write fails with
/// [`EnvironmentError::ReadOnly`].
pub fn connect_read_only(rpc_url: &str, chain: &ChainProfile) -> Result<Arc<dyn Environment>> {
    let url = rpc_url.parse::<reqwest::Url>().map_err(|err| {
        ConfigError::InvalidConfig(format!("invalid RPC url `{rpc_url}`: {err}"))
    })?;
    let provider = ProviderBuilder::new().on_http(url);
    Ok(Arc::new(EvmEnvironment {
        provider,
        operator: Address::ZERO,
        chain_id: chain.chain_id,
        confirmations: 1,
        submit_enabled: false,
    }))
}

#[async_trait]
impl<P> Environment for EvmEnvironment<P>
where
    P: Provider<Http<Client>> + Send + Sync + 'static,
{
    async fn call(
        &self,
        target: Address,
        data: Bytes,
    ) -> std::result::Result<Bytes, EnvironmentError> {
        let request = TransactionRequest::default().with_to(target).with_input(data);
        self.provider
            .call(&request)
            .await
            .map_err(|err| EnvironmentError::Call {
                target,
                reason: err.to_string(),
            })
    }

    async fn submit(
        &self,
        target: Address,
        data: Bytes,
        gas_limit: Option<u64>,
    ) -> std::result::Result<Confirmation, EnvironmentError> {
        if !self.submit_enabled {
            return Err(EnvironmentError::ReadOnly { target });
        }

        let mut request = TransactionRequest::default()
            .with_to(target)
            .with_input(data)
            .with_chain_id(self.chain_id);
        request.from = Some(self.operator);
        if let Some(limit) = gas_limit {
            request = request.with_gas_limit(limit);
        }

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|err| EnvironmentError::Rejected {
                target,
                reason: err.to_string(),
            })?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(
            "[ENVIRONMENT] tx {tx_hash:#x} to {target:#x} submitted, awaiting {} confirmation(s)",
            self.confirmations
        );

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|err| EnvironmentError::Transport(format!(
                "receipt wait for {tx_hash:#x} failed: {err}"
            )))?;
        if !receipt.status() {
            return Err(EnvironmentError::Reverted {
                target,
                tx_hash: receipt.transaction_hash,
            });
        }

        Ok(Confirmation {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: u128::from(receipt.gas_used),
        })
    }

    fn operator(&self) -> Address {
        self.operator
    }
}
