//! Desired-state input: which synths exist, how the protocol is tuned, and
//! who owns the contracts. Static data, validated once at load.

use crate::contracts::symbol_key;
use crate::error::{ConfigError, Result};
use alloy::primitives::{Address, U256};
use serde::Deserialize;
use std::collections::BTreeSet;

const MIN_RATE_STALE_PERIOD_SECS: u64 = 60;
const MAX_RATE_STALE_PERIOD_SECS: u64 = 30 * 86_400;
const MIN_FEE_PERIOD_SECS: u64 = 3_600;
const MAX_FEE_PERIOD_SECS: u64 = 60 * 86_400;

fn wad() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthSpec {
    /// Currency key, for example `sUSD`. Also names the token contract in
    /// the address book (`Synth` + symbol).
    pub symbol: String,
    /// Price feed aggregator; absent for synths priced elsewhere.
    #[serde(default)]
    pub feed: Option<Address>,
    /// Per-synth exchange fee override in wad, when it departs from the
    /// protocol default.
    #[serde(default)]
    pub exchange_fee_wei: Option<U256>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Collateralization setting in wad (2e17 = 20% issuance ratio).
    pub issuance_ratio_wei: U256,
    pub rate_stale_period_secs: u64,
    pub fee_period_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub synths: Vec<SynthSpec>,
    pub settings: Settings,
    /// Expected owner of every core contract; when set, drifted contracts
    /// get an ownership nomination step.
    #[serde(default)]
    pub owner: Option<Address>,
}

impl Manifest {
    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Manifest {
            path: path.to_string(),
            reason: err.to_string(),
        })?;
        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|err| ConfigError::Manifest {
                path: path.to_string(),
                reason: err.to_string(),
            })?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    pub fn validate(&self, path: &str) -> Result<()> {
        let fail = |reason: String| -> Result<()> {
            Err(ConfigError::Manifest {
                path: path.to_string(),
                reason,
            }
            .into())
        };

        let mut seen = BTreeSet::new();
        for synth in &self.synths {
            if symbol_key(&synth.symbol).is_err() {
                return fail(format!(
                    "synth symbol `{}` does not fit a bytes32 currency key",
                    synth.symbol
                ));
            }
            if !seen.insert(synth.symbol.as_str()) {
                return fail(format!("duplicate synth symbol `{}`", synth.symbol));
            }
            if synth.feed == Some(Address::ZERO) {
                return fail(format!("synth `{}` has a zero feed address", synth.symbol));
            }
            if let Some(fee) = synth.exchange_fee_wei {
                if fee > wad() {
                    return fail(format!(
                        "synth `{}` exchange fee {fee} exceeds 1e18 (100%)",
                        synth.symbol
                    ));
                }
            }
        }

        let settings = &self.settings;
        if settings.issuance_ratio_wei.is_zero() || settings.issuance_ratio_wei > wad() {
            return fail(format!(
                "issuance ratio {} must be within (0, 1e18]",
                settings.issuance_ratio_wei
            ));
        }
        if !(MIN_RATE_STALE_PERIOD_SECS..=MAX_RATE_STALE_PERIOD_SECS)
            .contains(&settings.rate_stale_period_secs)
        {
            return fail(format!(
                "rate stale period {}s must be within {}..={}s",
                settings.rate_stale_period_secs,
                MIN_RATE_STALE_PERIOD_SECS,
                MAX_RATE_STALE_PERIOD_SECS
            ));
        }
        if !(MIN_FEE_PERIOD_SECS..=MAX_FEE_PERIOD_SECS)
            .contains(&settings.fee_period_duration_secs)
        {
            return fail(format!(
                "fee period duration {}s must be within {}..={}s",
                settings.fee_period_duration_secs, MIN_FEE_PERIOD_SECS, MAX_FEE_PERIOD_SECS
            ));
        }

        if self.owner == Some(Address::ZERO) {
            return fail("owner must not be the zero address".to_string());
        }

        Ok(())
    }
}
