//! Remote synchronization: fetch, server-wins merge and periodic scheduling.
//!
//! # Responsibility
//! - Abstract the remote quote provider behind `RemoteSource`.
//! - Merge fetched batches into the repository with a deterministic policy.
//! - Drive the fetch/merge cycle on a fixed period.
//!
//! # Invariants
//! - Remote failures never halt the process; they degrade to an empty round.
//! - Remote data wins every identity-key conflict.

pub mod config;
pub mod notifier;
pub mod reconcile;
pub mod remote;
pub mod scheduler;
