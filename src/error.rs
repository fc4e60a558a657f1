use alloy::primitives::{Address, B256};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublishError>;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("environment error: {0}")]
    Environment(#[from] EnvironmentError),
    #[error("step error: {0}")]
    Step(#[from] StepError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingConfig(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("malformed manifest `{path}`: {reason}")]
    Manifest { path: String, reason: String },
    #[error("malformed address book `{path}`: {reason}")]
    AddressBook { path: String, reason: String },
    #[error("address book has no entry for `{0}`")]
    MissingContract(String),
}

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("call to {target:#x} failed: {reason}")]
    Call { target: Address, reason: String },
    #[error("return data from {target:#x} did not decode: {reason}")]
    Decode { target: Address, reason: String },
    #[error("submission to {target:#x} rejected: {reason}")]
    Rejected { target: Address, reason: String },
    #[error("transaction {tx_hash:#x} to {target:#x} reverted on chain")]
    Reverted { target: Address, tx_hash: B256 },
    #[error("environment is read-only, refusing write to {target:#x}")]
    ReadOnly { target: Address },
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("step {index} ({contract}) read failed: {source}")]
    Read {
        index: usize,
        contract: String,
        source: EnvironmentError,
    },
    #[error("step {index} ({contract}) write failed: {source}")]
    Write {
        index: usize,
        contract: String,
        source: EnvironmentError,
    },
    #[error("step {index} ({contract}) gas limit {gas_limit} exceeds the per-transaction cap {cap}")]
    GasLimitExceedsCap {
        index: usize,
        contract: String,
        gas_limit: u64,
        cap: u64,
    },
}
