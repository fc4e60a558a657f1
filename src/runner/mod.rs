//! Idempotent configuration-step runner.
//!
//! A [`ConfigStep`] pairs a read-side expectation with the write that
//! establishes it. The runner reads the current value, skips the write when
//! the expectation already holds, and otherwise performs the write and waits
//! for its confirmation. Steps run strictly in order; the first failure
//! aborts the plan with no retry. Because every write makes its own
//! expectation true, re-running a plan converges instead of re-submitting.

use crate::environment::{Confirmation, Environment};
use crate::error::{EnvironmentError, Result, StepError};
use alloy::primitives::{Address, Bytes, U256};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Value vocabulary read results are normalized into before the expectation
/// predicate sees them. Unset on-chain state (zero address, zero value)
/// stays representable so predicates can evaluate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepValue {
    Address(Address),
    Uint(U256),
    Bool(bool),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a:#x}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

pub type ReadFuture =
    Pin<Box<dyn Future<Output = std::result::Result<Option<StepValue>, EnvironmentError>> + Send>>;
pub type WriteFuture =
    Pin<Box<dyn Future<Output = std::result::Result<Confirmation, EnvironmentError>> + Send>>;

/// Read side of a step. `None` means the environment holds no value for
/// this accessor (for example empty return data from a code-less address).
pub struct ReadOp {
    describe: String,
    run: Box<dyn Fn() -> ReadFuture + Send + Sync>,
}

impl ReadOp {
    pub fn new<F, Fut>(describe: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Option<StepValue>, EnvironmentError>>
            + Send
            + 'static,
    {
        Self {
            describe: describe.into(),
            run: Box::new(move || -> ReadFuture { Box::pin(run()) }),
        }
    }

    /// Accessor call against `target`. Empty return data maps to `None`;
    /// anything else goes through `decode`.
    pub fn contract<F>(
        env: Arc<dyn Environment>,
        target: Address,
        describe: impl Into<String>,
        data: Bytes,
        decode: F,
    ) -> Self
    where
        F: Fn(&[u8]) -> std::result::Result<StepValue, EnvironmentError> + Send + Sync + 'static,
    {
        let decode = Arc::new(decode);
        Self {
            describe: describe.into(),
            run: Box::new(move || -> ReadFuture {
                let env = Arc::clone(&env);
                let data = data.clone();
                let decode = Arc::clone(&decode);
                Box::pin(async move {
                    let raw = env.call(target, data).await?;
                    if raw.is_empty() {
                        return Ok(None);
                    }
                    decode(raw.as_ref()).map(Some)
                })
            }),
        }
    }

    pub fn describe(&self) -> &str {
        &self.describe
    }

    fn invoke(&self) -> ReadFuture {
        (self.run)()
    }
}

/// Write side of a step. Receives the step's gas limit at invocation.
pub struct WriteOp {
    describe: String,
    run: Box<dyn Fn(Option<u64>) -> WriteFuture + Send + Sync>,
}

impl WriteOp {
    pub fn new<F, Fut>(describe: impl Into<String>, run: F) -> Self
    where
        F: Fn(Option<u64>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Confirmation, EnvironmentError>> + Send + 'static,
    {
        Self {
            describe: describe.into(),
            run: Box::new(move |gas_limit| -> WriteFuture { Box::pin(run(gas_limit)) }),
        }
    }

    pub fn contract(
        env: Arc<dyn Environment>,
        target: Address,
        describe: impl Into<String>,
        data: Bytes,
    ) -> Self {
        Self {
            describe: describe.into(),
            run: Box::new(move |gas_limit| -> WriteFuture {
                let env = Arc::clone(&env);
                let data = data.clone();
                Box::pin(async move { env.submit(target, data, gas_limit).await })
            }),
        }
    }

    pub fn describe(&self) -> &str {
        &self.describe
    }

    fn invoke(&self, gas_limit: Option<u64>) -> WriteFuture {
        (self.run)(gas_limit)
    }
}

/// Predicate over the read result, with a display form for the audit log.
pub struct Expectation {
    describe: String,
    check: Box<dyn Fn(&StepValue) -> bool + Send + Sync>,
}

impl Expectation {
    pub fn new<F>(describe: impl Into<String>, check: F) -> Self
    where
        F: Fn(&StepValue) -> bool + Send + Sync + 'static,
    {
        Self {
            describe: describe.into(),
            check: Box::new(check),
        }
    }

    pub fn equals(expected: StepValue) -> Self {
        let describe = format!("== {expected}");
        Self {
            describe,
            check: Box::new(move |value| *value == expected),
        }
    }

    pub fn is_true() -> Self {
        Self::equals(StepValue::Bool(true))
    }

    pub fn is_false() -> Self {
        Self::equals(StepValue::Bool(false))
    }

    pub fn satisfied_by(&self, value: &StepValue) -> bool {
        (self.check)(value)
    }

    pub fn describe(&self) -> &str {
        &self.describe
    }
}

/// Whether a step consults the chain before writing. The expectation only
/// exists alongside a read; an unconditional step always writes.
pub enum StepCondition {
    Unconditional,
    Reconcile { read: ReadOp, expected: Expectation },
}

/// One idempotent configuration action.
pub struct ConfigStep {
    /// Symbolic name of the target contract, for the audit trail.
    pub contract: String,
    pub condition: StepCondition,
    pub write: WriteOp,
    /// Optional per-step gas bound, validated against the chain cap and
    /// passed through to the environment.
    pub gas_limit: Option<u64>,
    /// Human-readable justification. Logged, never used for logic.
    pub comment: String,
}

impl ConfigStep {
    pub fn reconcile(
        contract: impl Into<String>,
        read: ReadOp,
        expected: Expectation,
        write: WriteOp,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            condition: StepCondition::Reconcile { read, expected },
            write,
            gas_limit: None,
            comment: comment.into(),
        }
    }

    pub fn unconditional(
        contract: impl Into<String>,
        write: WriteOp,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            condition: StepCondition::Unconditional,
            write,
            gas_limit: None,
            comment: comment.into(),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Expectation already held; no write issued.
    Satisfied,
    /// Write performed and confirmed.
    Written(Confirmation),
    /// Dry-run stand-in for a write that live mode would perform.
    WouldWrite,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub satisfied: usize,
    pub written: usize,
    pub would_write: usize,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Steps whose expectation did not hold when read.
    pub fn drift(&self) -> usize {
        self.written + self.would_write
    }
}

pub struct StepRunner {
    dry_run: bool,
    max_tx_gas: u64,
}

impl StepRunner {
    pub fn new(dry_run: bool, max_tx_gas: u64) -> Self {
        Self {
            dry_run,
            max_tx_gas,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Executes one step.
    ///
    /// Idempotence is the caller's contract: the write must make a later
    /// read satisfy `expected`, so re-running performs the write at most
    /// once. A predicate no write can ever satisfy is an authoring bug and
    /// shows up as a write on every run.
    pub async fn run_step(
        &self,
        index: usize,
        total: usize,
        step: &ConfigStep,
    ) -> Result<StepOutcome> {
        let position = index + 1;

        if let Some(limit) = step.gas_limit {
            if limit > self.max_tx_gas {
                return Err(StepError::GasLimitExceedsCap {
                    index,
                    contract: step.contract.clone(),
                    gas_limit: limit,
                    cap: self.max_tx_gas,
                }
                .into());
            }
        }

        match &step.condition {
            StepCondition::Unconditional => {
                tracing::info!(
                    "[STEP {position}/{total}] {} always runs ({})",
                    step.contract,
                    step.comment
                );
            }
            StepCondition::Reconcile { read, expected } => {
                let current = read.invoke().await.map_err(|source| StepError::Read {
                    index,
                    contract: step.contract.clone(),
                    source,
                })?;
                match current {
                    Some(value) if expected.satisfied_by(&value) => {
                        tracing::info!(
                            "[STEP {position}/{total}] {} ok: {} is {} ({})",
                            step.contract,
                            read.describe(),
                            value,
                            step.comment
                        );
                        return Ok(StepOutcome::Satisfied);
                    }
                    Some(value) => {
                        tracing::info!(
                            "[STEP {position}/{total}] {} drift: {} is {}, want {}",
                            step.contract,
                            read.describe(),
                            value,
                            expected.describe()
                        );
                    }
                    None => {
                        tracing::warn!(
                            "[STEP {position}/{total}] {} read {} returned no value, treating {} as unsatisfied",
                            step.contract,
                            read.describe(),
                            expected.describe()
                        );
                    }
                }
            }
        }

        if self.dry_run {
            tracing::info!(
                "[STEP {position}/{total}] {} dry-run: would invoke {}",
                step.contract,
                step.write.describe()
            );
            return Ok(StepOutcome::WouldWrite);
        }

        let confirmation =
            step.write
                .invoke(step.gas_limit)
                .await
                .map_err(|source| StepError::Write {
                    index,
                    contract: step.contract.clone(),
                    source,
                })?;
        tracing::info!(
            "[STEP {position}/{total}] {} wrote {}: tx {:#x} in block {} ({} gas)",
            step.contract,
            step.write.describe(),
            confirmation.tx_hash,
            confirmation.block_number,
            confirmation.gas_used
        );
        Ok(StepOutcome::Written(confirmation))
    }

    /// Runs a plan top to bottom, stopping at the first failing step.
    pub async fn run_plan(&self, plan: &[ConfigStep]) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary {
            total: plan.len(),
            ..RunSummary::default()
        };
        for (index, step) in plan.iter().enumerate() {
            match self.run_step(index, plan.len(), step).await? {
                StepOutcome::Satisfied => summary.satisfied += 1,
                StepOutcome::Written(_) => summary.written += 1,
                StepOutcome::WouldWrite => summary.would_write += 1,
            }
        }
        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigStep, Expectation, ReadOp, RunSummary, StepRunner, StepValue, WriteOp};
    use crate::environment::Confirmation;
    use crate::error::{EnvironmentError, PublishError, StepError};
    use alloy::primitives::{Address, B256, U256};

    fn noop_write() -> WriteOp {
        WriteOp::new("noop()", |_gas| async {
            Ok(Confirmation {
                tx_hash: B256::ZERO,
                block_number: 1,
                gas_used: 21_000,
            })
        })
    }

    #[test]
    fn step_values_display_for_the_audit_log() {
        assert_eq!(
            StepValue::Address(Address::ZERO).to_string(),
            format!("{:#x}", Address::ZERO)
        );
        assert_eq!(StepValue::Uint(U256::from(7u64)).to_string(), "7");
        assert_eq!(StepValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn equals_expectation_matches_only_the_same_value() {
        let expected = Expectation::equals(StepValue::Uint(U256::from(5u64)));
        assert!(expected.satisfied_by(&StepValue::Uint(U256::from(5u64))));
        assert!(!expected.satisfied_by(&StepValue::Uint(U256::from(6u64))));
        assert!(!expected.satisfied_by(&StepValue::Bool(true)));
        assert_eq!(expected.describe(), "== 5");
    }

    #[test]
    fn run_summary_drift_counts_unsatisfied_steps() {
        let summary = RunSummary {
            total: 5,
            satisfied: 2,
            written: 2,
            would_write: 1,
            elapsed_ms: 0,
        };
        assert_eq!(summary.drift(), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn gas_limit_above_cap_fails_before_any_call() {
        let read = ReadOp::new("value()", || async {
            Err(EnvironmentError::Transport(
                "read should never run".to_string(),
            ))
        });
        let step = ConfigStep::reconcile(
            "Issuer",
            read,
            Expectation::is_true(),
            noop_write(),
            "cap check happens first",
        )
        .with_gas_limit(50_000_000);

        let runner = StepRunner::new(false, 12_000_000);
        let err = runner
            .run_step(0, 1, &step)
            .await
            .expect_err("cap violation should fail");
        match err {
            PublishError::Step(StepError::GasLimitExceedsCap { gas_limit, cap, .. }) => {
                assert_eq!(gas_limit, 50_000_000);
                assert_eq!(cap, 12_000_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn dry_run_reports_would_write_for_unconditional_steps() {
        let step = ConfigStep::unconditional("FeePool", noop_write(), "always republished");
        let runner = StepRunner::new(true, 12_000_000);
        let outcome = runner
            .run_step(0, 1, &step)
            .await
            .expect("dry-run should succeed");
        assert_eq!(outcome, super::StepOutcome::WouldWrite);
    }
}
