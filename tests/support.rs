//! Shared fixtures for plan-level tests: an in-memory chain fake plus the
//! standard six-contract deployment record.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, Bytes, B256};
use async_trait::async_trait;
use synth_publisher::environment::{Confirmation, Environment};
use synth_publisher::error::EnvironmentError;
use synth_publisher::manifest::Manifest;
use synth_publisher::registry::AddressBook;

pub const REGISTRY_ADDR: Address = address!("00000000000000000000000000000000000000a1");
pub const ISSUER_ADDR: Address = address!("00000000000000000000000000000000000000a2");
pub const ORACLE_ADDR: Address = address!("00000000000000000000000000000000000000a3");
pub const PAUSE_ADDR: Address = address!("00000000000000000000000000000000000000a4");
pub const SETTINGS_ADDR: Address = address!("00000000000000000000000000000000000000a5");
pub const SUSD_ADDR: Address = address!("00000000000000000000000000000000000000b1");
pub const FEED_ADDR: Address = address!("00000000000000000000000000000000000000f1");
pub const OWNER_ADDR: Address = address!("00000000000000000000000000000000000000e1");
pub const DEPLOYER_ADDR: Address = address!("00000000000000000000000000000000000000d1");

pub type Slot = (Address, Vec<u8>);

/// In-memory chain: accessor calls answer from a calldata-keyed map, and
/// writes apply registered effects to that same map. A write wired to
/// establish its own read value behaves like its on-chain counterpart, so
/// convergence tests exercise the real plan builders end to end.
pub struct FakeChain {
    reads: Mutex<HashMap<Slot, Bytes>>,
    effects: Mutex<HashMap<Slot, Vec<(Slot, Bytes)>>>,
    read_calls: AtomicU64,
    write_calls: AtomicU64,
    reject_writes_to: Mutex<Option<Address>>,
    height: AtomicU64,
}

impl FakeChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            reads: Mutex::new(HashMap::new()),
            effects: Mutex::new(HashMap::new()),
            read_calls: AtomicU64::new(0),
            write_calls: AtomicU64::new(0),
            reject_writes_to: Mutex::new(None),
            height: AtomicU64::new(1),
        })
    }

    pub fn set_read(&self, target: Address, calldata: Vec<u8>, ret: impl Into<Bytes>) {
        self.reads
            .lock()
            .unwrap()
            .insert((target, calldata), ret.into());
    }

    /// Registers what a write changes: once `submit(target, calldata)` lands,
    /// each `(slot, value)` pair becomes visible to subsequent reads.
    pub fn on_write(&self, target: Address, calldata: Vec<u8>, effects: Vec<(Slot, Bytes)>) {
        self.effects
            .lock()
            .unwrap()
            .insert((target, calldata), effects);
    }

    /// Every submission to `target` fails as rejected from here on.
    pub fn reject_writes_to(&self, target: Address) {
        *self.reject_writes_to.lock().unwrap() = Some(target);
    }

    pub fn read_calls(&self) -> u64 {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Environment for FakeChain {
    async fn call(
        &self,
        target: Address,
        data: Bytes,
    ) -> std::result::Result<Bytes, EnvironmentError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let ret = self
            .reads
            .lock()
            .unwrap()
            .get(&(target, data.to_vec()))
            .cloned()
            .unwrap_or_default();
        Ok(ret)
    }

    async fn submit(
        &self,
        target: Address,
        data: Bytes,
        _gas_limit: Option<u64>,
    ) -> std::result::Result<Confirmation, EnvironmentError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if *self.reject_writes_to.lock().unwrap() == Some(target) {
            return Err(EnvironmentError::Rejected {
                target,
                reason: "injected rejection".to_string(),
            });
        }
        let slot = (target, data.to_vec());
        if let Some(effects) = self.effects.lock().unwrap().get(&slot).cloned() {
            let mut reads = self.reads.lock().unwrap();
            for (read_slot, value) in effects {
                reads.insert(read_slot, value);
            }
        }
        let block = self.height.fetch_add(1, Ordering::SeqCst);
        Ok(Confirmation {
            tx_hash: B256::with_last_byte(block as u8),
            block_number: block,
            gas_used: 40_000,
        })
    }

    fn operator(&self) -> Address {
        Address::with_last_byte(0xee)
    }
}

/// Writes and loads the standard deployment record: the five core contracts
/// plus the sUSD token, on the local devnet chain.
pub fn standard_book(dir: &tempfile::TempDir) -> AddressBook {
    let body = format!(
        r#"{{
    "network": "local",
    "chain_id": 31337,
    "contracts": {{
        "AddressRegistry": "{REGISTRY_ADDR:#x}",
        "Issuer": "{ISSUER_ADDR:#x}",
        "RatesOracle": "{ORACLE_ADDR:#x}",
        "SystemPause": "{PAUSE_ADDR:#x}",
        "ProtocolSettings": "{SETTINGS_ADDR:#x}",
        "SynthsUSD": "{SUSD_ADDR:#x}"
    }}
}}"#
    );
    std::fs::write(dir.path().join("local.json"), body).expect("write record");
    AddressBook::load(dir.path().to_str().expect("utf8 path"), "local", 31337)
        .expect("record loads")
}

/// One sUSD synth with a feed and a fee override, the standard settings
/// block, and (optionally) a desired owner.
pub fn standard_manifest(with_owner: bool) -> Manifest {
    let owner_field = if with_owner {
        format!(r#", "owner": "{OWNER_ADDR:#x}""#)
    } else {
        String::new()
    };
    let json = format!(
        r#"{{
        "synths": [
            {{
                "symbol": "sUSD",
                "feed": "{FEED_ADDR:#x}",
                "exchange_fee_wei": "3000000000000000"
            }}
        ],
        "settings": {{
            "issuance_ratio_wei": "200000000000000000",
            "rate_stale_period_secs": 3600,
            "fee_period_duration_secs": 604800
        }}{owner_field}
    }}"#
    );
    serde_json::from_str(&json).expect("manifest parses")
}
