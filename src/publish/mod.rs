//! Plan builders: the ordered configuration sections assembled from the
//! address book and the manifest.
//!
//! Section order is fixed here because later sections read through state the
//! earlier ones establish: registry entries land before consumer caches
//! rebuild, synths and settings land before the system resumes.

mod import;
mod ownership;
mod settings;
mod status;
mod synths;

pub mod hydrate;

pub use hydrate::{hydrate_registry, RegistrySnapshot};

use crate::environment::Environment;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::registry::AddressBook;
use crate::runner::ConfigStep;
use std::sync::Arc;

pub const REGISTRY: &str = "AddressRegistry";
pub const ISSUER: &str = "Issuer";
pub const RATES_ORACLE: &str = "RatesOracle";
pub const SYSTEM_PAUSE: &str = "SystemPause";
pub const PROTOCOL_SETTINGS: &str = "ProtocolSettings";

/// Contracts that keep a local cache of registry lookups.
pub const RESOLVER_CONSUMERS: &[&str] = &[ISSUER, RATES_ORACLE, PROTOCOL_SETTINGS];

/// Core contracts under protocol ownership.
pub const OWNED_CONTRACTS: &[&str] = &[
    REGISTRY,
    ISSUER,
    RATES_ORACLE,
    SYSTEM_PAUSE,
    PROTOCOL_SETTINGS,
];

/// Address-book name of a synth token contract.
pub fn synth_contract_name(symbol: &str) -> String {
    format!("Synth{symbol}")
}

/// Builds the full configuration plan. Pure assembly: nothing touches the
/// chain until the runner executes the steps.
pub fn assemble_plan(
    env: &Arc<dyn Environment>,
    book: &AddressBook,
    manifest: &Manifest,
) -> Result<Vec<ConfigStep>> {
    let mut steps = Vec::new();
    steps.extend(import::registry_steps(env, book)?);
    steps.extend(import::cache_steps(env, book)?);
    steps.extend(synths::steps(env, book, manifest)?);
    steps.extend(settings::steps(env, book, manifest)?);
    steps.extend(status::steps(env, book)?);
    steps.extend(ownership::steps(env, book, manifest)?);
    tracing::debug!("[PLAN] assembled {} configuration steps", steps.len());
    Ok(steps)
}
