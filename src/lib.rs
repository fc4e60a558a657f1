//! Idempotent on-chain configuration publisher for a synthetic-asset
//! protocol.
//!
//! The core mechanism is the configuration-step runner (`runner`): each step
//! reads current state, checks it against an expectation, and performs its
//! write only when the expectation fails. Plans are assembled from a static
//! manifest and a per-network deployment record (`publish`), so re-running
//! converges to zero writes instead of re-submitting transactions.

pub mod contracts;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod publish;
pub mod registry;
pub mod runner;
pub mod utils;

// Operator-surface plumbing used by the binaries.
#[doc(hidden)]
pub mod runtime;

pub mod config {
    pub mod chains;
}
