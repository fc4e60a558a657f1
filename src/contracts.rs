//! Typed call bindings for the protocol contracts the publisher reconciles.

use crate::error::{ConfigError, EnvironmentError, Result};
use alloy::primitives::{Address, FixedBytes};
use alloy::sol_types::SolCall;

alloy::sol! {
    interface IAddressRegistry {
        function resolve(bytes32 key) external view returns (address entry);
        function importEntries(bytes32[] calldata keys, address[] calldata entries) external;
    }

    interface IResolverConsumer {
        function isCacheFresh() external view returns (bool fresh);
        function rebuildCache() external;
    }

    interface IIssuer {
        function synthByKey(bytes32 key) external view returns (address synth);
        function addSynth(address synth) external;
    }

    interface IRatesOracle {
        function aggregatorFor(bytes32 key) external view returns (address aggregator);
        function setAggregator(bytes32 key, address aggregator) external;
    }

    interface ISystemPause {
        function suspensionState() external view returns (bool suspended, uint256 reason);
        function resume() external;
    }

    interface IProtocolSettings {
        function issuanceRatio() external view returns (uint256 ratio);
        function setIssuanceRatio(uint256 ratio) external;
        function rateStalePeriod() external view returns (uint256 period);
        function setRateStalePeriod(uint256 period) external;
        function feePeriodDuration() external view returns (uint256 duration);
        function setFeePeriodDuration(uint256 duration) external;
        function exchangeFeeRate(bytes32 key) external view returns (uint256 rate);
        function setExchangeFeeRate(bytes32 key, uint256 rate) external;
    }

    interface IOwned {
        function owner() external view returns (address owner);
        function nominatedOwner() external view returns (address nominated);
        function nominateNewOwner(address ownerCandidate) external;
    }
}

/// Encodes an ASCII name as the right-padded bytes32 key the registry and
/// issuer index by.
pub fn symbol_key(symbol: &str) -> Result<FixedBytes<32>> {
    let bytes = symbol.as_bytes();
    if bytes.is_empty() || bytes.len() > 32 || !symbol.is_ascii() {
        return Err(ConfigError::InvalidConfig(format!(
            "`{symbol}` does not fit a bytes32 key (ascii, 1..=32 bytes)"
        ))
        .into());
    }
    let mut key = [0u8; 32];
    key[..bytes.len()].copy_from_slice(bytes);
    Ok(FixedBytes::from(key))
}

pub fn decode_return<C: SolCall>(
    target: Address,
    raw: &[u8],
) -> std::result::Result<C::Return, EnvironmentError> {
    C::abi_decode_returns(raw, true).map_err(|err| EnvironmentError::Decode {
        target,
        reason: err.to_string(),
    })
}
