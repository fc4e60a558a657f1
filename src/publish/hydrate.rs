//! Concurrent read-only prefetch of the on-chain registry, surfaced as a
//! drift preview before the plan writes anything.

use super::REGISTRY;
use crate::contracts::{decode_return, symbol_key, IAddressRegistry};
use crate::environment::Environment;
use crate::error::{EnvironmentError, Result};
use crate::registry::AddressBook;
use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// What the on-chain registry currently maps each book entry to. `None`
/// means unset: zero entry or empty return data.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    pub entries: BTreeMap<String, Option<Address>>,
}

impl RegistrySnapshot {
    /// Book entries the on-chain registry does not currently match.
    pub fn stale(&self, book: &AddressBook) -> Vec<String> {
        let mut stale = Vec::new();
        for (name, recorded) in book.entries() {
            if name == REGISTRY {
                continue;
            }
            match self.entries.get(name) {
                Some(Some(entry)) if *entry == recorded => {}
                _ => stale.push(name.to_string()),
            }
        }
        stale
    }
}

/// Resolves every book entry against the on-chain registry, one task per
/// entry. Every read completes (or the first failure aborts the rest)
/// before the caller moves on to writes.
pub async fn hydrate_registry(
    env: Arc<dyn Environment>,
    book: &AddressBook,
) -> Result<RegistrySnapshot> {
    let registry = book.require(REGISTRY)?;
    let mut join_set = JoinSet::new();
    for (name, _) in book.entries() {
        if name == REGISTRY {
            continue;
        }
        let env = Arc::clone(&env);
        let name = name.to_string();
        let key = symbol_key(&name)?;
        join_set.spawn(async move {
            let data = IAddressRegistry::resolveCall { key }.abi_encode();
            let raw = env.call(registry, data.into()).await?;
            if raw.is_empty() {
                return Ok((name, None));
            }
            let entry =
                decode_return::<IAddressRegistry::resolveCall>(registry, raw.as_ref())?.entry;
            let entry = (entry != Address::ZERO).then_some(entry);
            Ok::<(String, Option<Address>), EnvironmentError>((name, entry))
        });
    }

    let mut entries = BTreeMap::new();
    while let Some(joined) = join_set.join_next().await {
        let (name, entry) = joined.map_err(|err| {
            EnvironmentError::Transport(format!("hydration task failed: {err}"))
        })??;
        entries.insert(name, entry);
    }
    tracing::debug!("[PLAN] hydrated {} registry entries", entries.len());
    Ok(RegistrySnapshot { entries })
}
