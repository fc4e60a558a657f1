use super::{synth_contract_name, ISSUER, PROTOCOL_SETTINGS, RATES_ORACLE};
use crate::contracts::{decode_return, symbol_key, IIssuer, IProtocolSettings, IRatesOracle};
use crate::environment::Environment;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::registry::AddressBook;
use crate::runner::{ConfigStep, Expectation, ReadOp, StepValue, WriteOp};
use alloy::sol_types::SolCall;
use std::sync::Arc;

/// Per-synth wiring: issuer registration, price feed, optional fee override.
pub fn steps(
    env: &Arc<dyn Environment>,
    book: &AddressBook,
    manifest: &Manifest,
) -> Result<Vec<ConfigStep>> {
    let issuer = book.require(ISSUER)?;
    let oracle = book.require(RATES_ORACLE)?;
    let settings = book.require(PROTOCOL_SETTINGS)?;
    let mut steps = Vec::new();

    for synth in &manifest.synths {
        let key = symbol_key(&synth.symbol)?;
        let token = book.require(&synth_contract_name(&synth.symbol))?;

        let read = ReadOp::contract(
            Arc::clone(env),
            issuer,
            format!("Issuer.synthByKey({})", synth.symbol),
            IIssuer::synthByKeyCall { key }.abi_encode().into(),
            move |raw| {
                decode_return::<IIssuer::synthByKeyCall>(issuer, raw)
                    .map(|ret| StepValue::Address(ret.synth))
            },
        );
        let write = WriteOp::contract(
            Arc::clone(env),
            issuer,
            format!("Issuer.addSynth(Synth{})", synth.symbol),
            IIssuer::addSynthCall { synth: token }.abi_encode().into(),
        );
        steps.push(ConfigStep::reconcile(
            ISSUER,
            read,
            Expectation::equals(StepValue::Address(token)),
            write,
            format!("issuer lists Synth{} under {}", synth.symbol, synth.symbol),
        ));

        if let Some(feed) = synth.feed {
            let read = ReadOp::contract(
                Arc::clone(env),
                oracle,
                format!("RatesOracle.aggregatorFor({})", synth.symbol),
                IRatesOracle::aggregatorForCall { key }.abi_encode().into(),
                move |raw| {
                    decode_return::<IRatesOracle::aggregatorForCall>(oracle, raw)
                        .map(|ret| StepValue::Address(ret.aggregator))
                },
            );
            let write = WriteOp::contract(
                Arc::clone(env),
                oracle,
                format!("RatesOracle.setAggregator({}, {feed:#x})", synth.symbol),
                IRatesOracle::setAggregatorCall {
                    key,
                    aggregator: feed,
                }
                .abi_encode()
                .into(),
            );
            steps.push(ConfigStep::reconcile(
                RATES_ORACLE,
                read,
                Expectation::equals(StepValue::Address(feed)),
                write,
                format!("price feed for {} is {feed:#x}", synth.symbol),
            ));
        }

        if let Some(fee) = synth.exchange_fee_wei {
            let read = ReadOp::contract(
                Arc::clone(env),
                settings,
                format!("ProtocolSettings.exchangeFeeRate({})", synth.symbol),
                IProtocolSettings::exchangeFeeRateCall { key }.abi_encode().into(),
                move |raw| {
                    decode_return::<IProtocolSettings::exchangeFeeRateCall>(settings, raw)
                        .map(|ret| StepValue::Uint(ret.rate))
                },
            );
            let write = WriteOp::contract(
                Arc::clone(env),
                settings,
                format!("ProtocolSettings.setExchangeFeeRate({}, {fee})", synth.symbol),
                IProtocolSettings::setExchangeFeeRateCall { key, rate: fee }
                    .abi_encode()
                    .into(),
            );
            steps.push(ConfigStep::reconcile(
                PROTOCOL_SETTINGS,
                read,
                Expectation::equals(StepValue::Uint(fee)),
                write,
                format!("exchange fee for {} is {fee} wei", synth.symbol),
            ));
        }
    }

    Ok(steps)
}
