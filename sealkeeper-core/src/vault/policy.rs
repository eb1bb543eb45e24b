//! Policy and kubernetes auth role provisioning.
//!
//! Every provisioned identity gets the same administrative policy body;
//! only the policy name varies. The matching auth role binds a kubernetes
//! service account to that policy with fixed 24h token lifetimes.

use reqwest::Method;
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::vault::VaultWriter;

/// Administrative policy attached to every provisioned identity.
pub const ADMIN_POLICY: &str = r#"
path "sys/mounts" {
  capabilities = ["read", "list"]
}

path "sys/mounts/*" {
  capabilities = ["create", "read", "update", "delete"]
}

path "sys/leases/revoke/*" {
    capabilities = ["update"]
}

path "sys/policy/*" {
	capabilities = ["create", "update", "read", "delete", "list"]
}

path "sys/policy" {
	capabilities = ["read", "list"]
}

path "sys/policies" {
	capabilities = ["read", "list"]
}

path "sys/policies/*" {
	capabilities = ["create", "update", "read", "delete", "list"]
}

path "auth/kubernetes/role" {
	capabilities = ["read", "list"]
}

path "auth/kubernetes/role/*" {
	capabilities = ["create", "update", "read", "delete", "list"]
}
"#;

/// One identity to grant access: a policy and a kubernetes auth role, both
/// named `name`.
///
/// `name` must be unique within the backend and safe to embed in an API
/// path; no escaping is applied. Re-provisioning with the same `name`
/// overwrites the previous objects, the backend is the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantConfig {
    pub name: String,
    pub service_account_name: String,
    pub service_account_namespace: String,
}

/// Wire shape of the kubernetes auth role write.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KubernetesRoleRequest {
    pub bound_service_account_names: String,
    pub bound_service_account_namespaces: String,
    pub policies: Vec<String>,
    pub ttl: String,
    pub max_ttl: String,
    pub period: String,
}

impl KubernetesRoleRequest {
    /// Binding payload for `config`: the grant's own policy plus `default`,
    /// all token lifetimes fixed at 24 hours.
    pub fn for_grant(config: &GrantConfig) -> Self {
        Self {
            bound_service_account_names: config.service_account_name.clone(),
            bound_service_account_namespaces: config.service_account_namespace.clone(),
            policies: vec![config.name.clone(), "default".to_string()],
            ttl: "24h".to_string(),
            max_ttl: "24h".to_string(),
            period: "24h".to_string(),
        }
    }
}

/// Create or replace the admin policy and the kubernetes auth role for
/// `config`. Both objects are named `config.name`.
///
/// The two writes run in order and are not transactional: if the role write
/// fails the policy stays created, and neither step is retried here. Each
/// failure aborts the remainder and carries the underlying backend error as
/// its source.
pub fn ensure_policy_and_binding(vault: &dyn VaultWriter, config: &GrantConfig) -> Result<()> {
    if config.name.is_empty() {
        return Err(Error::InvalidArgument("grant name must not be empty"));
    }
    if config.service_account_name.is_empty() || config.service_account_namespace.is_empty() {
        return Err(Error::InvalidArgument(
            "service account name and namespace must not be empty",
        ));
    }

    vault
        .put_policy(&config.name, ADMIN_POLICY)
        .map_err(|err| Error::PolicyWrite {
            name: config.name.clone(),
            source: err.into(),
        })?;

    let path = format!("/v1/auth/kubernetes/role/{}", config.name);
    let body = serde_json::to_value(KubernetesRoleRequest::for_grant(config))?;
    vault
        .write(Method::POST, &path, &body)
        .map_err(move |err| Error::RoleWrite {
            path,
            source: err.into(),
        })?;

    Ok(())
}
