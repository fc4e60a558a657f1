use super::SYSTEM_PAUSE;
use crate::contracts::{decode_return, ISystemPause};
use crate::environment::Environment;
use crate::error::Result;
use crate::registry::AddressBook;
use crate::runner::{ConfigStep, Expectation, ReadOp, StepValue, WriteOp};
use alloy::sol_types::SolCall;
use std::sync::Arc;

/// The system resumes once every earlier section has landed. Runs last
/// among the state-changing sections for that reason.
pub fn steps(env: &Arc<dyn Environment>, book: &AddressBook) -> Result<Vec<ConfigStep>> {
    let pause = book.require(SYSTEM_PAUSE)?;
    let read = ReadOp::contract(
        Arc::clone(env),
        pause,
        "SystemPause.suspensionState()",
        ISystemPause::suspensionStateCall {}.abi_encode().into(),
        move |raw| {
            decode_return::<ISystemPause::suspensionStateCall>(pause, raw)
                .map(|ret| StepValue::Bool(ret.suspended))
        },
    );
    let write = WriteOp::contract(
        Arc::clone(env),
        pause,
        "SystemPause.resume()",
        ISystemPause::resumeCall {}.abi_encode().into(),
    );
    Ok(vec![ConfigStep::reconcile(
        SYSTEM_PAUSE,
        read,
        Expectation::is_false(),
        write,
        "system is live once configuration has been published",
    )])
}
