use super::OWNED_CONTRACTS;
use crate::contracts::{decode_return, IOwned};
use crate::environment::Environment;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::registry::AddressBook;
use crate::runner::{ConfigStep, Expectation, ReadOp, StepValue, WriteOp};
use alloy::sol_types::SolCall;
use std::sync::Arc;

/// Ownership nomination for every core contract, when the manifest names an
/// owner. Nomination is one-sided: the nominee accepts from its own key,
/// outside this plan.
pub fn steps(
    env: &Arc<dyn Environment>,
    book: &AddressBook,
    manifest: &Manifest,
) -> Result<Vec<ConfigStep>> {
    let Some(owner) = manifest.owner else {
        return Ok(Vec::new());
    };

    let mut steps = Vec::with_capacity(OWNED_CONTRACTS.len());
    for name in OWNED_CONTRACTS {
        let target = book.require(name)?;
        let env_for_read = Arc::clone(env);
        // The effective controller: the current owner, unless the desired
        // owner is already nominated. Re-running after a nomination must not
        // nominate again.
        let read = ReadOp::new(format!("{name}.owner()|nominatedOwner()"), move || {
            let env = Arc::clone(&env_for_read);
            async move {
                let raw = env
                    .call(target, IOwned::ownerCall {}.abi_encode().into())
                    .await?;
                if raw.is_empty() {
                    return Ok(None);
                }
                let current = decode_return::<IOwned::ownerCall>(target, raw.as_ref())?.owner;
                if current == owner {
                    return Ok(Some(StepValue::Address(current)));
                }
                let raw = env
                    .call(target, IOwned::nominatedOwnerCall {}.abi_encode().into())
                    .await?;
                if raw.is_empty() {
                    return Ok(Some(StepValue::Address(current)));
                }
                let nominated =
                    decode_return::<IOwned::nominatedOwnerCall>(target, raw.as_ref())?.nominated;
                if nominated == owner {
                    Ok(Some(StepValue::Address(nominated)))
                } else {
                    Ok(Some(StepValue::Address(current)))
                }
            }
        });
        let write = WriteOp::contract(
            Arc::clone(env),
            target,
            format!("{name}.nominateNewOwner({owner:#x})"),
            IOwned::nominateNewOwnerCall {
                ownerCandidate: owner,
            }
            .abi_encode()
            .into(),
        );
        steps.push(ConfigStep::reconcile(
            *name,
            read,
            Expectation::equals(StepValue::Address(owner)),
            write,
            format!("{name} is owned by (or nominated to) {owner:#x}"),
        ));
    }
    Ok(steps)
}
