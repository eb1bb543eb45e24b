//! Core primitives for provisioning least-privilege Vault access to
//! Kubernetes workloads.
//!
//! Two independent pieces live here: validation of the options that select
//! how unseal secrets are stored ([`kv::aws_kms::Options`]), and idempotent
//! creation of a policy plus its kubernetes auth role binding
//! ([`vault::policy::ensure_policy_and_binding`]). Orchestration, CLI wiring,
//! and the Kubernetes API side are the caller's concern.

pub mod errors;
pub mod kv;
pub(crate) mod rt;
pub mod vault;

pub use errors::{AggregateError, Error, Result};
pub use kv::{KvStore, MemoryKv};
pub use vault::policy::{ensure_policy_and_binding, GrantConfig, ADMIN_POLICY};
pub use vault::{HttpVaultClient, VaultWriter};
