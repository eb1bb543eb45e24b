//! Provisioning seam against a Vault-style backend.

use reqwest::Method;
use serde_json::Value;

use crate::errors::Result;

pub mod client;
pub mod policy;

pub use client::HttpVaultClient;

/// Write capabilities the provisioner needs from a connected client.
///
/// Both calls block until the backend answers and surface the transport's
/// native failure untouched. Connection pooling and thread-safety are the
/// implementor's concern.
pub trait VaultWriter: Send + Sync {
    /// Create or replace a named ACL policy.
    fn put_policy(&self, name: &str, rules: &str) -> Result<()>;
    /// Issue a raw write against an API path with a JSON body.
    fn write(&self, method: Method, path: &str, body: &Value) -> Result<Value>;
}
