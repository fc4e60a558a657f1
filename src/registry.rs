//! Off-chain deployment record: the name-to-address book for one network.
//!
//! One JSON artifact per network (`deployments/<slug>.json`), produced by the
//! deploy tooling and read-only here. Step targets all originate from this
//! book; the on-chain registry contract is reconciled against it by the
//! import section of the plan.

use crate::contracts::symbol_key;
use crate::error::{ConfigError, Result};
use alloy::primitives::Address;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct AddressBookFile {
    network: String,
    chain_id: u64,
    contracts: BTreeMap<String, Address>,
}

#[derive(Debug, Clone)]
pub struct AddressBook {
    network: String,
    chain_id: u64,
    contracts: BTreeMap<String, Address>,
}

impl AddressBook {
    /// Loads `deployments/<slug>.json` and validates it against the
    /// configured chain. Zero addresses and names that cannot key the
    /// on-chain registry are load errors.
    pub fn load(dir: &str, slug: &str, expected_chain_id: u64) -> Result<Self> {
        let path = Path::new(dir).join(format!("{slug}.json"));
        let shown = path.display().to_string();

        let raw = std::fs::read_to_string(&path).map_err(|err| ConfigError::AddressBook {
            path: shown.clone(),
            reason: err.to_string(),
        })?;
        let parsed: AddressBookFile =
            serde_json::from_str(&raw).map_err(|err| ConfigError::AddressBook {
                path: shown.clone(),
                reason: err.to_string(),
            })?;

        if parsed.network != slug {
            return Err(ConfigError::AddressBook {
                path: shown,
                reason: format!(
                    "record is for network `{}`, expected `{slug}`",
                    parsed.network
                ),
            }
            .into());
        }
        if parsed.chain_id != expected_chain_id {
            return Err(ConfigError::AddressBook {
                path: shown,
                reason: format!(
                    "record is for chain_id {}, expected {expected_chain_id}",
                    parsed.chain_id
                ),
            }
            .into());
        }
        for (name, addr) in &parsed.contracts {
            if addr.is_zero() {
                return Err(ConfigError::AddressBook {
                    path: shown,
                    reason: format!("contract `{name}` has a zero address"),
                }
                .into());
            }
            if symbol_key(name).is_err() {
                return Err(ConfigError::AddressBook {
                    path: shown,
                    reason: format!("contract name `{name}` does not fit a bytes32 registry key"),
                }
                .into());
            }
        }

        Ok(Self {
            network: parsed.network,
            chain_id: parsed.chain_id,
            contracts: parsed.contracts,
        })
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The recorded address for `name`, or a missing-contract error naming it.
    pub fn require(&self, name: &str) -> Result<Address> {
        self.contracts
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::MissingContract(name.to_string()).into())
    }

    pub fn get(&self, name: &str) -> Option<Address> {
        self.contracts.get(name).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Address)> {
        self.contracts.iter().map(|(name, addr)| (name.as_str(), *addr))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
