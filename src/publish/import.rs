use super::{REGISTRY, RESOLVER_CONSUMERS};
use crate::contracts::{decode_return, symbol_key, IAddressRegistry, IResolverConsumer};
use crate::environment::Environment;
use crate::error::Result;
use crate::registry::AddressBook;
use crate::runner::{ConfigStep, Expectation, ReadOp, StepValue, WriteOp};
use alloy::sol_types::SolCall;
use std::sync::Arc;

/// One reconcile step per book entry: the on-chain registry must map the
/// entry's key to the recorded address.
pub fn registry_steps(env: &Arc<dyn Environment>, book: &AddressBook) -> Result<Vec<ConfigStep>> {
    let registry = book.require(REGISTRY)?;
    let mut steps = Vec::with_capacity(book.len().saturating_sub(1));
    for (name, recorded) in book.entries() {
        if name == REGISTRY {
            // The registry does not resolve itself.
            continue;
        }
        let key = symbol_key(name)?;
        let read = ReadOp::contract(
            Arc::clone(env),
            registry,
            format!("AddressRegistry.resolve({name})"),
            IAddressRegistry::resolveCall { key }.abi_encode().into(),
            move |raw| {
                decode_return::<IAddressRegistry::resolveCall>(registry, raw)
                    .map(|ret| StepValue::Address(ret.entry))
            },
        );
        let write = WriteOp::contract(
            Arc::clone(env),
            registry,
            format!("AddressRegistry.importEntries([{name}])"),
            IAddressRegistry::importEntriesCall {
                keys: vec![key],
                entries: vec![recorded],
            }
            .abi_encode()
            .into(),
        );
        steps.push(ConfigStep::reconcile(
            REGISTRY,
            read,
            Expectation::equals(StepValue::Address(recorded)),
            write,
            format!("registry entry for {name} matches the deployment record"),
        ));
    }
    Ok(steps)
}

/// Consumers rebuild their lookup cache when it no longer reflects the
/// registry.
pub fn cache_steps(env: &Arc<dyn Environment>, book: &AddressBook) -> Result<Vec<ConfigStep>> {
    let mut steps = Vec::with_capacity(RESOLVER_CONSUMERS.len());
    for name in RESOLVER_CONSUMERS {
        let target = book.require(name)?;
        let read = ReadOp::contract(
            Arc::clone(env),
            target,
            format!("{name}.isCacheFresh()"),
            IResolverConsumer::isCacheFreshCall {}.abi_encode().into(),
            move |raw| {
                decode_return::<IResolverConsumer::isCacheFreshCall>(target, raw)
                    .map(|ret| StepValue::Bool(ret.fresh))
            },
        );
        let write = WriteOp::contract(
            Arc::clone(env),
            target,
            format!("{name}.rebuildCache()"),
            IResolverConsumer::rebuildCacheCall {}.abi_encode().into(),
        );
        steps.push(ConfigStep::reconcile(
            *name,
            read,
            Expectation::is_true(),
            write,
            format!("{name} resolver cache reflects the registry"),
        ));
    }
    Ok(steps)
}
