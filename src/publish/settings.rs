use super::PROTOCOL_SETTINGS;
use crate::contracts::{decode_return, IProtocolSettings};
use crate::environment::Environment;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::registry::AddressBook;
use crate::runner::{ConfigStep, Expectation, ReadOp, StepValue, WriteOp};
use alloy::primitives::U256;
use alloy::sol_types::SolCall;
use std::sync::Arc;

/// Protocol-level tuning: one reconcile step per setting.
pub fn steps(
    env: &Arc<dyn Environment>,
    book: &AddressBook,
    manifest: &Manifest,
) -> Result<Vec<ConfigStep>> {
    let target = book.require(PROTOCOL_SETTINGS)?;
    let desired = &manifest.settings;
    let mut steps = Vec::with_capacity(3);

    let ratio = desired.issuance_ratio_wei;
    let read = ReadOp::contract(
        Arc::clone(env),
        target,
        "ProtocolSettings.issuanceRatio()",
        IProtocolSettings::issuanceRatioCall {}.abi_encode().into(),
        move |raw| {
            decode_return::<IProtocolSettings::issuanceRatioCall>(target, raw)
                .map(|ret| StepValue::Uint(ret.ratio))
        },
    );
    let write = WriteOp::contract(
        Arc::clone(env),
        target,
        format!("ProtocolSettings.setIssuanceRatio({ratio})"),
        IProtocolSettings::setIssuanceRatioCall { ratio }.abi_encode().into(),
    );
    steps.push(ConfigStep::reconcile(
        PROTOCOL_SETTINGS,
        read,
        Expectation::equals(StepValue::Uint(ratio)),
        write,
        format!("issuance ratio pinned at {ratio} wei"),
    ));

    let period = U256::from(desired.rate_stale_period_secs);
    let read = ReadOp::contract(
        Arc::clone(env),
        target,
        "ProtocolSettings.rateStalePeriod()",
        IProtocolSettings::rateStalePeriodCall {}.abi_encode().into(),
        move |raw| {
            decode_return::<IProtocolSettings::rateStalePeriodCall>(target, raw)
                .map(|ret| StepValue::Uint(ret.period))
        },
    );
    let write = WriteOp::contract(
        Arc::clone(env),
        target,
        format!("ProtocolSettings.setRateStalePeriod({period})"),
        IProtocolSettings::setRateStalePeriodCall { period }
            .abi_encode()
            .into(),
    );
    steps.push(ConfigStep::reconcile(
        PROTOCOL_SETTINGS,
        read,
        Expectation::equals(StepValue::Uint(period)),
        write,
        format!(
            "rates older than {}s count as stale",
            desired.rate_stale_period_secs
        ),
    ));

    let duration = U256::from(desired.fee_period_duration_secs);
    let read = ReadOp::contract(
        Arc::clone(env),
        target,
        "ProtocolSettings.feePeriodDuration()",
        IProtocolSettings::feePeriodDurationCall {}.abi_encode().into(),
        move |raw| {
            decode_return::<IProtocolSettings::feePeriodDurationCall>(target, raw)
                .map(|ret| StepValue::Uint(ret.duration))
        },
    );
    let write = WriteOp::contract(
        Arc::clone(env),
        target,
        format!("ProtocolSettings.setFeePeriodDuration({duration})"),
        IProtocolSettings::setFeePeriodDurationCall { duration }
            .abi_encode()
            .into(),
    );
    steps.push(ConfigStep::reconcile(
        PROTOCOL_SETTINGS,
        read,
        Expectation::equals(StepValue::Uint(duration)),
        write,
        format!(
            "fee periods close every {}s",
            desired.fee_period_duration_secs
        ),
    ));

    Ok(steps)
}
