/// Static per-chain operating profile.
///
/// `slug` names the deployment record under `DEPLOYMENT_DIR`
/// (`deployments/<slug>.json`); `confirmations` is the receipt depth a write
/// waits for before the next step runs.
#[derive(Debug, Clone)]
pub struct ChainProfile {
    pub chain_id: u64,
    pub name: String,
    pub slug: String,
    pub block_time_ms: u64,
    pub confirmations: u64,
    pub max_tx_gas: u64,
}

impl ChainProfile {
    pub fn get(chain_id: u64) -> Self {
        match chain_id {
            1 => Self::mainnet(),
            10 => Self::optimism(),
            8453 => Self::base(),
            11155111 => Self::sepolia(),
            31337 => Self::local(),
            other => Self::custom(other),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            slug: "mainnet".to_string(),
            block_time_ms: 12_000,
            confirmations: 2,
            max_tx_gas: 12_000_000,
        }
    }

    pub fn optimism() -> Self {
        Self {
            chain_id: 10,
            name: "Optimism".to_string(),
            slug: "optimism".to_string(),
            block_time_ms: 2_000,
            confirmations: 4,
            max_tx_gas: 15_000_000,
        }
    }

    pub fn base() -> Self {
        Self {
            chain_id: 8453,
            name: "Base".to_string(),
            slug: "base".to_string(),
            block_time_ms: 2_000,
            confirmations: 4,
            max_tx_gas: 15_000_000,
        }
    }

    pub fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            name: "Sepolia".to_string(),
            slug: "sepolia".to_string(),
            block_time_ms: 12_000,
            confirmations: 1,
            max_tx_gas: 12_000_000,
        }
    }

    pub fn local() -> Self {
        Self {
            chain_id: 31337,
            name: "Local Devnet".to_string(),
            slug: "local".to_string(),
            block_time_ms: 1_000,
            confirmations: 1,
            max_tx_gas: 30_000_000,
        }
    }

    // Unknown chains get a conservative profile keyed by their id.
    pub fn custom(chain_id: u64) -> Self {
        Self {
            chain_id,
            name: format!("Chain {chain_id}"),
            slug: format!("chain-{chain_id}"),
            block_time_ms: 12_000,
            confirmations: 2,
            max_tx_gas: 12_000_000,
        }
    }
}
